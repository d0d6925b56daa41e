//! Vertex stage: object space -> clip space -> NDC -> pixels

use super::math::{Mat4, Vec3, Vec4};
use super::simd::transform_simd;
use super::types::Viewport;

/// Divide x, y, z by w. A zero `w` produces inf/NaN, which the rasterizer
/// rejects as degenerate.
#[inline]
pub fn perspective_divide(v: Vec4) -> Vec4 {
    Vec4 {
        x: v.x / v.w,
        y: v.y / v.w,
        z: v.z / v.w,
        w: v.w,
    }
}

/// Run one position through the full vertex stage
#[inline]
pub fn project_vertex(transform: &Mat4, position: Vec3, viewport: &Viewport) -> Vec4 {
    let clip = transform_simd(transform, Vec4::point(position));
    viewport.apply(perspective_divide(clip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_identity_maps_ndc_corners() {
        let vp = Viewport::full(800, 600);
        let m = Mat4::identity();

        let bl = project_vertex(&m, Vec3::new(-1.0, -1.0, 0.0), &vp);
        let tr = project_vertex(&m, Vec3::new(1.0, 1.0, 0.0), &vp);
        assert_eq!((bl.x, bl.y), (0.0, 600.0));
        assert_eq!((tr.x, tr.y), (800.0, 0.0));
    }

    #[test]
    fn test_perspective_shrinks_distant_points() {
        let vp = Viewport::full(400, 400);
        let proj = Mat4::perspective(0.1, 100.0, PI / 2.0, 1.0);

        let near = project_vertex(&Mat4::translate(Vec3::new(0.0, 0.0, -2.0)).then(&proj), Vec3::new(1.0, 0.0, 0.0), &vp);
        let far = project_vertex(&Mat4::translate(Vec3::new(0.0, 0.0, -8.0)).then(&proj), Vec3::new(1.0, 0.0, 0.0), &vp);

        // 90 degree fov: x/(-z) lands at 0.5 and 0.125 in NDC
        assert!((near.x - 300.0).abs() < 1e-3);
        assert!((far.x - 225.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_w_is_not_finite() {
        let v = perspective_divide(Vec4::new(1.0, 1.0, 1.0, 0.0));
        assert!(!v.x.is_finite());
    }
}
