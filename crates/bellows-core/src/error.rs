use crate::topology::JointTopology;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown joint topology: {name}")]
    UnknownTopology { name: String },

    #[error("Joint topology has no catalog entry: {topology}")]
    MissingCatalogEntry { topology: JointTopology },

    #[error("Invalid visualizer config: {message}")]
    InvalidConfig { message: String },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
