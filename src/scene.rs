//! The demo scene: one vertex-colored cube spinning in front of the camera

use std::f32::consts::PI;

use crate::config::SceneConfig;
use crate::rasterizer::{AttributeView, Color, DrawCommand, Mat4, Mesh, Vec3};

/// Four corners per face, faces ordered -X, +X, -Y, +Y, -Z, +Z
pub const CUBE_POSITIONS: [Vec3; 24] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),

    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),

    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),

    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),

    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),

    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

pub const CUBE_COLORS: [Color; 24] = [
    Color::new(147, 51, 239),
    Color::new(255, 191, 0),
    Color::new(147, 51, 239),
    Color::new(255, 0, 128),

    Color::new(255, 128, 0),
    Color::new(224, 64, 208),
    Color::new(255, 128, 0),
    Color::new(255, 214, 0),

    Color::new(0, 108, 255),
    Color::new(64, 224, 208),
    Color::new(50, 205, 50),
    Color::new(0, 128, 255),

    Color::new(0, 191, 255),
    Color::new(0, 128, 0),
    Color::new(199, 21, 133),
    Color::new(46, 139, 87),

    Color::new(184, 115, 51),
    Color::new(218, 165, 32),
    Color::new(220, 20, 60),
    Color::new(148, 0, 211),

    Color::new(255, 0, 0),
    Color::new(255, 215, 0),
    Color::new(205, 127, 50),
    Color::new(124, 252, 0),
];

/// Two triangles per face, wound counter-clockwise as seen from outside
pub const CUBE_INDICES: [u32; 36] = [
    0, 2, 1, 1, 2, 3,
    4, 5, 6, 6, 5, 7,
    8, 9, 10, 10, 9, 11,
    12, 14, 13, 14, 15, 13,
    16, 18, 17, 17, 18, 19,
    20, 21, 22, 21, 23, 22,
];

/// Indexed mesh over the static cube data
pub fn cube_mesh() -> Mesh<'static> {
    Mesh::indexed(
        AttributeView::new(&CUBE_POSITIONS),
        AttributeView::new(&CUBE_COLORS),
        &CUBE_INDICES,
    )
}

/// Animation state advanced by the frame clock
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneState {
    /// Accumulated rotation in radians
    pub angle: f32,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, config: &SceneConfig) {
        // Negative frame times would run the animation backwards
        self.angle += dt.max(0.0) * config.rotation_rate;
    }
}

/// Model-to-clip transform for the cube at `angle` on a `width` x `height` target.
///
/// The projection itself is square; the final scale squeezes the longer axis so
/// the cube keeps its proportions on non-square targets.
pub fn scene_transform(config: &SceneConfig, angle: f32, width: usize, height: usize) -> Mat4 {
    let w = width.max(1) as f32;
    let h = height.max(1) as f32;
    let fov_y = config.fov_y_degrees * PI / 180.0;

    Mat4::scale_uniform(config.scale)
        .then(&Mat4::rotate_zx(angle))
        .then(&Mat4::rotate_xy(angle * config.secondary_rate))
        .then(&Mat4::translate(Vec3::new(0.0, 0.0, -config.distance)))
        .then(&Mat4::perspective(config.near, config.far, fov_y, 1.0))
        .then(&Mat4::scale(Vec3::new((h / w).min(1.0), (w / h).min(1.0), 1.0)))
}

/// Draw command for the cube in its current pose
pub fn cube_command(config: &SceneConfig, state: &SceneState, width: usize, height: usize) -> DrawCommand<'static> {
    DrawCommand::new(cube_mesh(), scene_transform(config, state.angle, width, height))
        .with_cull_mode(config.cull_mode)
}
