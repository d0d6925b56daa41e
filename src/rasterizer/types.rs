//! Core types for the rasterizer

use bytemuck::{Pod, Zeroable};
use serde::{Serialize, Deserialize};

use super::math::Vec4;

/// RGBA color (0-255 per channel)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    /// Default clear color of the demo scene
    pub const BACKGROUND: Color = Color::new(40, 42, 54);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(((hex >> 16) & 0xFF) as u8, ((hex >> 8) & 0xFF) as u8, (hex & 0xFF) as u8)
    }

    /// Convert a normalized (0.0-1.0 per channel) color, clamping out-of-range values
    pub fn from_normalized(c: Vec4) -> Self {
        let channel = |v: f32| (v * 255.0).clamp(0.0, 255.0) as u8;
        Self {
            r: channel(c.x),
            g: channel(c.y),
            b: channel(c.z),
            a: channel(c.w),
        }
    }

    /// Convert to [u8; 4] in RGBA order
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert to [u8; 4] in BGRA order (TGA pixel layout)
    pub fn to_bgra(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

/// Which screen-space winding to discard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CullMode {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

impl CullMode {
    /// Whether a triangle with the given winding is discarded
    pub fn culls(self, counter_clockwise: bool) -> bool {
        match self {
            CullMode::None => false,
            CullMode::Clockwise => !counter_clockwise,
            CullMode::CounterClockwise => counter_clockwise,
        }
    }
}

/// Pixel rectangle that normalized device coordinates map onto.
/// Covers columns `xmin..xmax` and rows `ymin..ymax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Viewport {
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        debug_assert!(xmin <= xmax && ymin <= ymax, "inverted viewport {xmin},{ymin} {xmax},{ymax}");
        Self { xmin, ymin, xmax, ymax }
    }

    /// Viewport covering a whole `width` x `height` target
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    /// Map NDC x/y into pixel space. Y is flipped: NDC grows up, rows grow down.
    pub fn apply(&self, v: Vec4) -> Vec4 {
        Vec4 {
            x: self.xmin as f32 + self.width() as f32 * (0.5 + 0.5 * v.x),
            y: self.ymin as f32 + self.height() as f32 * (0.5 - 0.5 * v.y),
            z: v.z,
            w: v.w,
        }
    }
}
