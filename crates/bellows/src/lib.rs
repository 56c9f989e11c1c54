#![forbid(unsafe_code)]

//! `bellows` is a headless visualizer for pipe expansion joints.
//!
//! It maps a joint topology and a deformation state (axial stretch, lateral offset, angular
//! rotation) to the 2-D vector geometry of the deformed corrugated assembly.
//!
//! # Features
//!
//! - `render`: enable kinematics, geometry and SVG output (`bellows::render`)
//! - `raster`: enable PNG/JPG/PDF output via pure-Rust SVG rasterization/conversion

pub use bellows_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use bellows_render::compose::{compose, pressure_overlay_opacity};
    pub use bellows_render::kinematics::solve;
    pub use bellows_render::model::SolvedAssembly;
    pub use bellows_render::scene::Scene;
    pub use bellows_render::svg::{SvgRenderOptions, render_scene_svg};
    pub use bellows_render::Error as RenderError;
    pub use bellows_render::{arc, convolution, kinematics, model, ribs, scene};

    use bellows_core::{DeformationState, JointTopology, VisualizerConfig};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Config(#[from] bellows_core::Error),
        #[error(transparent)]
        Render(#[from] bellows_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token suitable for embedding
    /// several drawings in the same page.
    ///
    /// The root id prefixes every gradient, pattern and marker id under `<defs>`; inlining two
    /// SVGs with the same id makes those collide.
    pub fn sanitize_svg_id(raw: &str) -> String {
        const UNTITLED: &str = "b-untitled";

        let mut token = String::with_capacity(raw.len() + 2);
        for ch in raw.trim().chars() {
            let keep = ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.');
            if keep {
                token.push(ch);
            } else if !token.is_empty() && !token.ends_with('-') {
                token.push('-');
            }
        }
        let token = token.trim_end_matches('-');

        match token.chars().next() {
            None => UNTITLED.to_string(),
            Some(c) if c.is_ascii_alphabetic() => token.to_string(),
            Some(_) => format!("b-{token}"),
        }
    }

    /// Bundles the configuration and SVG options used for every drawing.
    ///
    /// All work is CPU-bound, performs no I/O and keeps no state between calls.
    #[derive(Debug, Clone, Default)]
    pub struct Visualizer {
        pub config: VisualizerConfig,
        pub svg: SvgRenderOptions,
    }

    impl Visualizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: VisualizerConfig) -> Self {
            self.config = config;
            self
        }

        /// Deep-merges `overrides` (JSON object) over the current configuration.
        pub fn with_config_overrides(mut self, overrides: &serde_json::Value) -> Result<Self> {
            self.config = self.config.with_overrides(overrides)?;
            Ok(self)
        }

        pub fn with_svg_options(mut self, svg: SvgRenderOptions) -> Self {
            self.svg = svg;
            self
        }

        pub fn solve(
            &self,
            topology: JointTopology,
            state: &DeformationState,
        ) -> Result<SolvedAssembly> {
            Ok(solve(topology, state, &self.config)?)
        }

        pub fn scene(&self, topology: JointTopology, state: &DeformationState) -> Result<Scene> {
            let solved = self.solve(topology, state)?;
            Ok(compose(&solved, &self.config))
        }

        pub fn render_svg(&self, topology: JointTopology, state: &DeformationState) -> Result<String> {
            self.render_svg_with(topology, state, &self.svg)
        }

        pub fn render_svg_with(
            &self,
            topology: JointTopology,
            state: &DeformationState,
            svg: &SvgRenderOptions,
        ) -> Result<String> {
            let scene = self.scene(topology, state)?;
            Ok(render_scene_svg(&scene, svg))
        }

        pub fn render_svg_with_diagram_id(
            &self,
            topology: JointTopology,
            state: &DeformationState,
            diagram_id: &str,
        ) -> Result<String> {
            let mut svg = self.svg.clone();
            svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self.render_svg_with(topology, state, &svg)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            topology: JointTopology,
            state: &DeformationState,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(topology, state)?;
            raster::svg_to_png(&svg, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(
            &self,
            topology: JointTopology,
            state: &DeformationState,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(topology, state)?;
            raster::svg_to_jpeg(&svg, raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_pdf(
            &self,
            topology: JointTopology,
            state: &DeformationState,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(topology, state)?;
            raster::svg_to_pdf(&svg)
        }
    }
}
