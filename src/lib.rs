//! softraster: CPU triangle rasterizer
//!
//! Renders vertex-colored triangle meshes entirely in software:
//! - Homogeneous transforms with row-major 4x4 matrices
//! - Half-space triangle coverage with barycentric color interpolation
//! - Winding-based culling
//! - TGA and PNG capture of the framebuffer
//!
//! The core only needs a target size and a frame time. Windowing and
//! presentation live in the binary.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod config;
pub mod export;
pub mod logging;
pub mod rasterizer;
pub mod scene;

#[cfg(test)]
mod tests {
    use crate::app::RenderContext;
    use crate::config::RenderConfig;
    use crate::export::{encode_tga, TGA_HEADER_LEN};
    use crate::rasterizer::{multiply, multiply_simd, Mat4};

    #[test]
    fn test_frame_to_tga_through_public_api() {
        let mut ctx = RenderContext::new(RenderConfig::default(), 80, 60);
        ctx.update(0.5);
        let stats = ctx.render();
        assert!(stats.drawn > 0);

        let tga = encode_tga(&ctx.framebuffer).unwrap();
        assert_eq!(tga.len(), TGA_HEADER_LEN + 80 * 60 * 4);
    }

    #[test]
    fn test_simd_compose_is_exported() {
        let a = Mat4::rotate_yz(0.3);
        let b = Mat4::translate(crate::rasterizer::Vec3::new(1.0, 2.0, 3.0));
        assert!(multiply(&a, &b).max_abs_diff(&multiply_simd(&a, &b)) < 1e-5);
    }
}
