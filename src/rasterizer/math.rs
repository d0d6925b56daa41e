//! Vector and matrix math for the transform stack
//!
//! Matrices are row-major and multiply column vectors: `v' = M * v`.

use std::ops::{Add, Sub, Mul};
use bytemuck::{Pod, Zeroable};

/// 3D Vector
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(s: f32) -> Self {
        Self { x: s, y: s, z: s }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        Vec3 {
            x: self.x * s,
            y: self.y * s,
            z: self.z * s,
        }
    }
}

/// Homogeneous 4D vector (`w` is the projective weight)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Position in space (`w = 1`), affected by translation
    pub fn point(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 1.0 }
    }

    /// Direction (`w = 0`), ignores translation
    pub fn direction(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: 0.0 }
    }

    /// Signed area of the parallelogram spanned by the xy parts of two vectors
    pub fn det2d(self, other: Vec4) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    fn sub(self, other: Vec4) -> Vec4 {
        Vec4 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
            w: self.w - other.w,
        }
    }
}

/// 4x4 row-major matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub values: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn from_rows(values: [f32; 16]) -> Self {
        Self { values }
    }

    pub const fn identity() -> Self {
        Self::from_rows([
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale(s: Vec3) -> Self {
        Self::from_rows([
            s.x, 0.0, 0.0, 0.0,
            0.0, s.y, 0.0, 0.0,
            0.0, 0.0, s.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn scale_uniform(s: f32) -> Self {
        Self::scale(Vec3::splat(s))
    }

    pub fn translate(t: Vec3) -> Self {
        Self::from_rows([
            1.0, 0.0, 0.0, t.x,
            0.0, 1.0, 0.0, t.y,
            0.0, 0.0, 1.0, t.z,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Rotation in the XY plane (about Z)
    pub fn rotate_xy(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows([
            cos, -sin, 0.0, 0.0,
            sin,  cos, 0.0, 0.0,
            0.0,  0.0, 1.0, 0.0,
            0.0,  0.0, 0.0, 1.0,
        ])
    }

    /// Rotation in the YZ plane (about X)
    pub fn rotate_yz(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows([
            1.0, 0.0,  0.0, 0.0,
            0.0, cos, -sin, 0.0,
            0.0, sin,  cos, 0.0,
            0.0, 0.0,  0.0, 1.0,
        ])
    }

    /// Rotation in the ZX plane (about Y)
    pub fn rotate_zx(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_rows([
             cos, 0.0, sin, 0.0,
             0.0, 1.0, 0.0, 0.0,
            -sin, 0.0, cos, 0.0,
             0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed perspective projection.
    ///
    /// View-space z in [-near, -far] maps to [-1, 1] after the divide, and the
    /// last row puts `-z` into `w`. Expects `far > near > 0` and `fov_y` in (0, pi);
    /// anything else yields a meaningless matrix rather than an error.
    pub fn perspective(near: f32, far: f32, fov_y: f32, aspect: f32) -> Self {
        let top = near * (fov_y / 2.0).tan();
        let right = top * aspect;

        Self::from_rows([
            near / right, 0.0,        0.0,                          0.0,
            0.0,          near / top, 0.0,                          0.0,
            0.0,          0.0,        -(far + near) / (far - near), -2.0 * far * near / (far - near),
            0.0,          0.0,        -1.0,                         0.0,
        ])
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.values[row * 4 + col]
    }

    /// Compose with `next`: the result applies `self` first, then `next`
    pub fn then(&self, next: &Mat4) -> Mat4 {
        multiply(self, next)
    }

    /// Matrix-vector product `M * v`
    #[inline]
    pub fn transform(&self, v: Vec4) -> Vec4 {
        let m = &self.values;
        Vec4 {
            x: m[0] * v.x + m[1] * v.y + m[2] * v.z + m[3] * v.w,
            y: m[4] * v.x + m[5] * v.y + m[6] * v.z + m[7] * v.w,
            z: m[8] * v.x + m[9] * v.y + m[10] * v.z + m[11] * v.w,
            w: m[12] * v.x + m[13] * v.y + m[14] * v.z + m[15] * v.w,
        }
    }

    /// General inverse via cofactor expansion. `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let m = &self.values;
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15]
            + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15]
            - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15]
            + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14]
            - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15]
            - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15]
            + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15]
            - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14]
            + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15]
            + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15]
            - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15]
            + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14]
            - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11]
            - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11]
            + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11]
            - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10]
            + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det.abs() < f32::EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        for v in inv.iter_mut() {
            *v *= inv_det;
        }
        Some(Mat4::from_rows(inv))
    }

    /// Largest absolute element-wise difference, for tolerance checks
    pub fn max_abs_diff(&self, other: &Mat4) -> f32 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

/// Compose two transforms: the result applies `a` first, then `b`.
///
/// In row-major terms this is the product `b * a`.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0f32; 16];
    for row in 0..4 {
        for col in 0..4 {
            out[row * 4 + col] = b.at(row, 0) * a.at(0, col)
                + b.at(row, 1) * a.at(1, col)
                + b.at(row, 2) * a.at(2, col)
                + b.at(row, 3) * a.at(3, col);
        }
    }
    Mat4::from_rows(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_identity_diagonal() {
        let m = Mat4::identity();
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_eq!(m.at(row, col), expected);
            }
        }
    }

    #[test]
    fn test_rotation_zero_is_identity() {
        for m in [Mat4::rotate_xy(0.0), Mat4::rotate_yz(0.0), Mat4::rotate_zx(0.0)] {
            assert!(m.max_abs_diff(&Mat4::identity()) < EPS);
        }
    }

    #[test]
    fn test_rotation_inverse_angle_cancels() {
        let angle = 0.83;
        let pairs = [
            (Mat4::rotate_xy(angle), Mat4::rotate_xy(-angle)),
            (Mat4::rotate_yz(angle), Mat4::rotate_yz(-angle)),
            (Mat4::rotate_zx(angle), Mat4::rotate_zx(-angle)),
        ];
        for (forward, back) in pairs {
            assert!(forward.then(&back).max_abs_diff(&Mat4::identity()) < EPS);
        }
    }

    #[test]
    fn test_multiply_with_inverse() {
        let m = Mat4::scale(Vec3::new(2.0, 0.5, 3.0))
            .then(&Mat4::rotate_zx(0.4))
            .then(&Mat4::rotate_xy(1.1))
            .then(&Mat4::translate(Vec3::new(1.0, -2.0, -5.0)))
            .then(&Mat4::perspective(0.1, 100.0, PI / 3.0, 4.0 / 3.0));
        let inv = m.inverse().expect("composite transform is invertible");
        assert!(multiply(&m, &inv).max_abs_diff(&Mat4::identity()) < EPS);
        assert!(multiply(&inv, &m).max_abs_diff(&Mat4::identity()) < EPS);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        assert!(Mat4::scale(Vec3::new(1.0, 0.0, 1.0)).inverse().is_none());
    }

    #[test]
    fn test_then_applies_left_operand_first() {
        // Scale first, then translate: the translation must not be scaled
        let m = Mat4::scale_uniform(2.0).then(&Mat4::translate(Vec3::new(1.0, 0.0, 0.0)));
        let p = m.transform(Vec4::point(Vec3::new(1.0, 1.0, 1.0)));
        assert!((p.x - 3.0).abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert!((p.z - 2.0).abs() < EPS);
    }

    #[test]
    fn test_translate_ignores_directions() {
        let m = Mat4::translate(Vec3::new(4.0, 5.0, 6.0));
        let d = m.transform(Vec4::direction(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(d, Vec4::new(1.0, 2.0, 3.0, 0.0));
    }

    #[test]
    fn test_rotate_xy_quarter_turn() {
        let p = Mat4::rotate_xy(PI / 2.0).transform(Vec4::point(Vec3::new(1.0, 0.0, 0.0)));
        assert!(p.x.abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_perspective_maps_near_and_far() {
        let (near, far) = (0.5, 20.0);
        let m = Mat4::perspective(near, far, PI / 2.0, 1.0);

        let n = m.transform(Vec4::point(Vec3::new(0.0, 0.0, -near)));
        let f = m.transform(Vec4::point(Vec3::new(0.0, 0.0, -far)));
        assert!((n.z / n.w + 1.0).abs() < EPS);
        assert!((f.z / f.w - 1.0).abs() < EPS);
        assert!((n.w - near).abs() < EPS);
    }

    #[test]
    fn test_det2d_sign() {
        let a = Vec4::new(1.0, 0.0, 0.0, 0.0);
        let b = Vec4::new(0.0, 1.0, 0.0, 0.0);
        assert!((a.det2d(b) - 1.0).abs() < EPS);
        assert!((b.det2d(a) + 1.0).abs() < EPS);
    }
}
