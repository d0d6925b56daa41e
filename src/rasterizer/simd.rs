//! SSE versions of the hot matrix routines
//!
//! Same contract as `Mat4::transform` and `multiply`; on targets without SSE
//! these forward to the scalar code.

use super::math::{Mat4, Vec4};
#[cfg(not(target_arch = "x86_64"))]
use super::math::multiply;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{
    __m128, _mm_add_ps, _mm_loadu_ps, _mm_mul_ps, _mm_set1_ps, _mm_setr_ps, _mm_storeu_ps,
};

/// `M * v`, accumulated column by column
#[cfg(target_arch = "x86_64")]
pub fn transform_simd(m: &Mat4, v: Vec4) -> Vec4 {
    let c = &m.values;
    let mut out = [0.0f32; 4];

    // SAFETY: SSE is part of the x86_64 baseline, and every load/store goes
    // through unaligned intrinsics on arrays of exactly four f32.
    unsafe {
        let col0 = _mm_setr_ps(c[0], c[4], c[8], c[12]);
        let col1 = _mm_setr_ps(c[1], c[5], c[9], c[13]);
        let col2 = _mm_setr_ps(c[2], c[6], c[10], c[14]);
        let col3 = _mm_setr_ps(c[3], c[7], c[11], c[15]);

        let mut acc = _mm_mul_ps(col0, _mm_set1_ps(v.x));
        acc = _mm_add_ps(acc, _mm_mul_ps(col1, _mm_set1_ps(v.y)));
        acc = _mm_add_ps(acc, _mm_mul_ps(col2, _mm_set1_ps(v.z)));
        acc = _mm_add_ps(acc, _mm_mul_ps(col3, _mm_set1_ps(v.w)));

        _mm_storeu_ps(out.as_mut_ptr(), acc);
    }

    Vec4::new(out[0], out[1], out[2], out[3])
}

/// Compose `a` then `b` (row-major `b * a`): each output row is a linear
/// combination of the rows of `a` weighted by the matching row of `b`.
#[cfg(target_arch = "x86_64")]
pub fn multiply_simd(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [0.0f32; 16];

    // SAFETY: see transform_simd; all pointers cover four in-bounds f32.
    unsafe {
        let rows: [__m128; 4] = [
            _mm_loadu_ps(a.values[0..4].as_ptr()),
            _mm_loadu_ps(a.values[4..8].as_ptr()),
            _mm_loadu_ps(a.values[8..12].as_ptr()),
            _mm_loadu_ps(a.values[12..16].as_ptr()),
        ];

        for (i, chunk) in out.chunks_exact_mut(4).enumerate() {
            let mut acc = _mm_mul_ps(rows[0], _mm_set1_ps(b.values[i * 4]));
            acc = _mm_add_ps(acc, _mm_mul_ps(rows[1], _mm_set1_ps(b.values[i * 4 + 1])));
            acc = _mm_add_ps(acc, _mm_mul_ps(rows[2], _mm_set1_ps(b.values[i * 4 + 2])));
            acc = _mm_add_ps(acc, _mm_mul_ps(rows[3], _mm_set1_ps(b.values[i * 4 + 3])));
            _mm_storeu_ps(chunk.as_mut_ptr(), acc);
        }
    }

    Mat4::from_rows(out)
}

#[cfg(not(target_arch = "x86_64"))]
pub fn transform_simd(m: &Mat4, v: Vec4) -> Vec4 {
    m.transform(v)
}

#[cfg(not(target_arch = "x86_64"))]
pub fn multiply_simd(a: &Mat4, b: &Mat4) -> Mat4 {
    multiply(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{multiply, Vec3};

    fn sample_matrices() -> Vec<Mat4> {
        vec![
            Mat4::identity(),
            Mat4::rotate_zx(0.7).then(&Mat4::rotate_xy(1.3)),
            Mat4::translate(Vec3::new(3.0, -1.0, -5.0)).then(&Mat4::perspective(0.01, 10.0, 1.0, 1.5)),
            Mat4::from_rows([
                1.0, 2.0, 3.0, 4.0,
                5.0, 6.0, 7.0, 8.0,
                -9.0, 10.0, -11.0, 12.0,
                13.0, -14.0, 15.0, 16.0,
            ]),
        ]
    }

    #[test]
    fn test_transform_matches_scalar() {
        let v = Vec4::new(0.25, -1.5, 2.0, 1.0);
        for m in sample_matrices() {
            let scalar = m.transform(v);
            let simd = transform_simd(&m, v);
            assert!((scalar.x - simd.x).abs() < 1e-4);
            assert!((scalar.y - simd.y).abs() < 1e-4);
            assert!((scalar.z - simd.z).abs() < 1e-4);
            assert!((scalar.w - simd.w).abs() < 1e-4);
        }
    }

    #[test]
    fn test_multiply_matches_scalar() {
        let mats = sample_matrices();
        for a in &mats {
            for b in &mats {
                let scalar = multiply(a, b);
                let simd = multiply_simd(a, b);
                assert!(scalar.max_abs_diff(&simd) < 1e-4, "{:?} vs {:?}", scalar, simd);
            }
        }
    }
}
