#![forbid(unsafe_code)]

//! Headless geometry engine for bellows expansion joints.
//!
//! Pipeline: [`kinematics::solve`] places the segments of a joint topology, the
//! [`convolution`] and [`ribs`] generators draw each bellows segment through the [`arc`]
//! transform, [`compose::compose`] assembles the layered [`scene::Scene`], and
//! [`svg::render_scene_svg`] serializes it.

pub mod arc;
pub mod compose;
pub mod convolution;
pub mod kinematics;
pub mod model;
pub mod ribs;
pub mod scene;
pub mod svg;

use bellows_core::{DeformationState, JointTopology, VisualizerConfig};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("joint topology has no kinematic solver: {topology}")]
    UnsupportedTopology { topology: JointTopology },
    #[error(transparent)]
    Core(#[from] bellows_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Solves and composes in one step.
pub fn render_scene(
    topology: JointTopology,
    state: &DeformationState,
    config: &VisualizerConfig,
) -> Result<scene::Scene> {
    let solved = kinematics::solve(topology, state, config)?;
    Ok(compose::compose(&solved, config))
}

pub fn render_svg(
    topology: JointTopology,
    state: &DeformationState,
    config: &VisualizerConfig,
    options: &svg::SvgRenderOptions,
) -> Result<String> {
    let scene = render_scene(topology, state, config)?;
    Ok(svg::render_scene_svg(&scene, options))
}
