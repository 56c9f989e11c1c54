#![forbid(unsafe_code)]

//! Expansion-joint domain model (headless).
//!
//! This crate holds the vocabulary shared by the geometry engine and its front ends:
//! - the live [`DeformationState`] produced by control surfaces (sliders, files, the CLI)
//! - the closed set of [`JointTopology`] variants and their capability sets
//! - the static joint catalog ([`JOINT_CATALOG`])
//! - the tunable drawing constants ([`VisualizerConfig`])
//! - an external animation clock ([`animation::Oscillator`]) that feeds new states per tick
//!
//! Nothing here performs geometry; see `bellows-render` for the solver and path generators.

pub mod animation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geom;
pub mod state;
pub mod topology;

pub use catalog::{JOINT_CATALOG, JointConfig};
pub use config::{MAX_CONVOLUTIONS, VisualizerConfig};
pub use error::{Error, Result};
pub use state::{DeformationState, LoadStatus};
pub use topology::{AllowedDeformation, JointTopology};

#[cfg(test)]
mod tests;
