//! CPU triangle rasterizer
//!
//! Pipeline per triangle:
//! - Homogeneous transform with one combined matrix
//! - Perspective divide and viewport mapping (Y flipped)
//! - Winding test, culling, degenerate rejection
//! - Half-space coverage with screen-space vertex color interpolation

mod attribute;
mod math;
mod mesh;
mod pipeline;
mod render;
mod simd;
mod types;

pub use attribute::*;
pub use math::*;
pub use mesh::*;
pub use pipeline::*;
pub use render::*;
pub use simd::*;
pub use types::*;

/// Default window dimensions
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
