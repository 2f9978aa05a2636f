//! WebGPU rendering module
//!
//! Snapshots are tessellated into flat-colored triangles on the CPU and
//! drawn in a single pass.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, pixel_to_ndc};
pub use shapes::build_scene;
pub use vertex::Vertex;
