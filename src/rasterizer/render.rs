//! Core rendering functions
//! Half-space triangle rasterization with Gouraud vertex colors

use super::math::Vec4;
use super::mesh::DrawCommand;
use super::pipeline::project_vertex;
use super::types::{Color, CullMode, Viewport};

/// Triangles with less screen area than this (in pixels squared, doubled)
/// produce no coverage.
pub const DEGENERATE_AREA: f32 = 1e-6;

/// Pixels stepped incrementally before edge values are re-evaluated directly
const STEP_SPAN: i32 = 16;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<Color>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK; width * height],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Pixel at (x, y). Coordinates must be inside the buffer.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height, "pixel ({}, {}) outside {}x{}", x, y, self.width, self.height);
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn at_mut(&mut self, x: usize, y: usize) -> &mut Color {
        debug_assert!(x < self.width && y < self.height, "pixel ({}, {}) outside {}x{}", x, y, self.width, self.height);
        &mut self.pixels[y * self.width + x]
    }

    /// Write a pixel, ignoring coordinates outside the buffer
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            *self.at_mut(x as usize, y as usize) = color;
        }
    }

    /// Viewport covering the whole buffer
    pub fn viewport(&self) -> Viewport {
        Viewport::full(self.width, self.height)
    }

    /// Raw RGBA bytes, row-major, top row first
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Flat debug fill using the sign-based point-in-triangle test.
    ///
    /// Samples integer pixel corners and accepts either winding. Independent of
    /// the main rasterizer, useful as a reference when debugging coverage.
    pub fn fill_triangle_flat(&mut self, v1: (f32, f32), v2: (f32, f32), v3: (f32, f32), color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let min_x = (v1.0.min(v2.0).min(v3.0) as i32).max(0);
        let min_y = (v1.1.min(v2.1).min(v3.1) as i32).max(0);
        let max_x = (v1.0.max(v2.0).max(v3.0) as i32).min(self.width as i32 - 1);
        let max_y = (v1.1.max(v2.1).max(v3.1) as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if point_in_triangle((x as f32, y as f32), v1, v2, v3) {
                    *self.at_mut(x as usize, y as usize) = color;
                }
            }
        }
    }
}

fn sign(p1: (f32, f32), p2: (f32, f32), p3: (f32, f32)) -> f32 {
    (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
}

/// A point is inside when it lies on the same side of all three edges
pub fn point_in_triangle(p: (f32, f32), v1: (f32, f32), v2: (f32, f32), v3: (f32, f32)) -> bool {
    let b1 = sign(p, v1, v2) < 0.0;
    let b2 = sign(p, v2, v3) < 0.0;
    let b3 = sign(p, v3, v1) < 0.0;
    b1 == b2 && b2 == b3
}

/// Vertex after the vertex stage: pixel-space position and its color
#[derive(Debug, Clone, Copy)]
pub struct ScreenVertex {
    pub pos: Vec4,
    pub color: Color,
}

impl ScreenVertex {
    pub fn new(x: f32, y: f32, color: Color) -> Self {
        Self { pos: Vec4::new(x, y, 0.0, 1.0), color }
    }
}

/// Counters for one rasterization call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub triangles: usize,
    pub culled: usize,
    pub degenerate: usize,
    pub drawn: usize,
    pub pixels: usize,
}

/// Why a triangle produced no coverage before reaching the pixel loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Culled,
    Degenerate,
}

/// Directed edge a -> b as an affine function of the sample point
#[derive(Debug, Clone, Copy)]
struct Edge {
    ax: f32,
    ay: f32,
    dx: f32,
    dy: f32,
}

impl Edge {
    fn new(a: Vec4, b: Vec4) -> Self {
        Self { ax: a.x, ay: a.y, dx: b.x - a.x, dy: b.y - a.y }
    }

    /// det2d(b - a, p - a); non-negative on the inside of a clockwise-normalized triangle
    #[inline]
    fn eval(&self, px: f32, py: f32) -> f32 {
        self.dx * (py - self.ay) - self.dy * (px - self.ax)
    }

    /// Change in `eval` per pixel step in +x
    #[inline]
    fn step_x(&self) -> f32 {
        -self.dy
    }
}

/// A triangle that passed culling and the degenerate check, wound so that all
/// three edge functions are non-negative inside.
#[derive(Debug, Clone, Copy)]
pub struct TriangleSetup {
    verts: [Vec4; 3],
    colors: [Color; 3],
    /// Edge opposite each vertex: 1->2, 2->0, 0->1
    edges: [Edge; 3],
    det: f32,
}

impl TriangleSetup {
    pub fn new(tri: [ScreenVertex; 3], cull_mode: CullMode) -> Result<Self, Rejection> {
        let [v0, mut v1, mut v2] = tri;

        let mut det = (v1.pos - v0.pos).det2d(v2.pos - v0.pos);
        let ccw = det < 0.0;

        if cull_mode.culls(ccw) {
            return Err(Rejection::Culled);
        }

        if ccw {
            std::mem::swap(&mut v1, &mut v2);
            det = -det;
        }

        // Also catches NaN/inf from a vertex with w == 0
        if !det.is_finite() || !(det > DEGENERATE_AREA) {
            return Err(Rejection::Degenerate);
        }

        let verts = [v0.pos, v1.pos, v2.pos];
        Ok(Self {
            verts,
            colors: [v0.color, v1.color, v2.color],
            edges: [
                Edge::new(verts[1], verts[2]),
                Edge::new(verts[2], verts[0]),
                Edge::new(verts[0], verts[1]),
            ],
            det,
        })
    }

    fn edge_values(&self, px: f32, py: f32) -> [f32; 3] {
        [
            self.edges[0].eval(px, py),
            self.edges[1].eval(px, py),
            self.edges[2].eval(px, py),
        ]
    }

    /// Barycentric weights of a sample point, or `None` if it is outside
    pub fn weights_at(&self, px: f32, py: f32) -> Option<[f32; 3]> {
        let e = self.edge_values(px, py);
        if e.iter().all(|&v| v >= 0.0) {
            Some([e[0] / self.det, e[1] / self.det, e[2] / self.det])
        } else {
            None
        }
    }

    /// Color for raw edge values at a covered sample; alpha is always opaque
    #[inline]
    fn shade(&self, e: [f32; 3]) -> Color {
        let inv = 1.0 / self.det;
        let (l0, l1, l2) = (e[0] * inv, e[1] * inv, e[2] * inv);
        let [c0, c1, c2] = self.colors;
        let mix = |a: u8, b: u8, c: u8| {
            (a as f32 * l0 + b as f32 * l1 + c as f32 * l2).round().clamp(0.0, 255.0) as u8
        };
        Color::new(mix(c0.r, c1.r, c2.r), mix(c0.g, c1.g, c2.g), mix(c0.b, c1.b, c2.b))
    }

    /// Color at a sample point, or `None` if it is outside
    pub fn color_at(&self, px: f32, py: f32) -> Option<Color> {
        let e = self.edge_values(px, py);
        e.iter().all(|&v| v >= 0.0).then(|| self.shade(e))
    }

    /// Half-open pixel rectangle `(xmin, ymin, xmax, ymax)` to scan: the
    /// triangle's bounds clamped to the viewport and the buffer. `None` if empty.
    pub fn pixel_bounds(&self, viewport: &Viewport, width: usize, height: usize) -> Option<(i32, i32, i32, i32)> {
        let [v0, v1, v2] = self.verts;

        let xmin = viewport.xmin.max(0).max(v0.x.min(v1.x).min(v2.x).floor() as i32);
        let ymin = viewport.ymin.max(0).max(v0.y.min(v1.y).min(v2.y).floor() as i32);
        let xmax = viewport.xmax.min(width as i32).min(v0.x.max(v1.x).max(v2.x).ceil() as i32);
        let ymax = viewport.ymax.min(height as i32).min(v0.y.max(v1.y).max(v2.y).ceil() as i32);

        (xmin < xmax && ymin < ymax).then_some((xmin, ymin, xmax, ymax))
    }
}

/// Fill one screen-space triangle. Returns the number of pixels written.
pub fn rasterize_triangle(
    fb: &mut Framebuffer,
    viewport: &Viewport,
    tri: [ScreenVertex; 3],
    cull_mode: CullMode,
) -> Result<usize, Rejection> {
    let setup = TriangleSetup::new(tri, cull_mode)?;
    Ok(fill_setup(fb, viewport, &setup))
}

fn fill_setup(fb: &mut Framebuffer, viewport: &Viewport, setup: &TriangleSetup) -> usize {
    let Some((xmin, ymin, xmax, ymax)) = setup.pixel_bounds(viewport, fb.width, fb.height) else {
        return 0;
    };

    let steps = [setup.edges[0].step_x(), setup.edges[1].step_x(), setup.edges[2].step_x()];
    let mut written = 0;

    for y in ymin..ymax {
        let py = y as f32 + 0.5;
        let row = y as usize * fb.width;

        let mut span_start = xmin;
        while span_start < xmax {
            let span_end = (span_start + STEP_SPAN).min(xmax);

            // Re-anchor at the span start so f32 stepping error stays bounded
            let mut e = setup.edge_values(span_start as f32 + 0.5, py);
            for x in span_start..span_end {
                if e[0] >= 0.0 && e[1] >= 0.0 && e[2] >= 0.0 {
                    fb.pixels[row + x as usize] = setup.shade(e);
                    written += 1;
                }
                e[0] += steps[0];
                e[1] += steps[1];
                e[2] += steps[2];
            }
            span_start = span_end;
        }
    }

    written
}

fn screen_triangle(cmd: &DrawCommand, viewport: &Viewport, ids: [usize; 3]) -> [ScreenVertex; 3] {
    ids.map(|i| ScreenVertex {
        pos: project_vertex(&cmd.transform, cmd.mesh.positions.get(i), viewport),
        color: cmd.mesh.colors.get(i),
    })
}

/// Transform and fill every triangle of a draw command, in order.
///
/// Shared vertices are transformed once per triangle that uses them.
pub fn draw_mesh(fb: &mut Framebuffer, cmd: &DrawCommand, viewport: &Viewport) -> RasterStats {
    let mut stats = RasterStats::default();

    for ids in cmd.mesh.triangles() {
        stats.triangles += 1;
        let tri = screen_triangle(cmd, viewport, ids);

        match rasterize_triangle(fb, viewport, tri, cmd.cull_mode) {
            Ok(pixels) => {
                stats.drawn += 1;
                stats.pixels += pixels;
            }
            Err(Rejection::Culled) => stats.culled += 1,
            Err(Rejection::Degenerate) => stats.degenerate += 1,
        }
    }

    log::trace!("draw_mesh: {:?}", stats);
    stats
}

/// Outline every triangle that survives culling
pub fn draw_mesh_wireframe(fb: &mut Framebuffer, cmd: &DrawCommand, viewport: &Viewport, color: Color) {
    // Keep Bresenham's loop bounded for vertices projected far off screen
    let guard_x = (fb.width as f32 * 4.0).max(1.0);
    let guard_y = (fb.height as f32 * 4.0).max(1.0);
    let in_guard = |v: &ScreenVertex| v.pos.x.abs() <= guard_x && v.pos.y.abs() <= guard_y;

    for ids in cmd.mesh.triangles() {
        let tri = screen_triangle(cmd, viewport, ids);
        if !tri.iter().all(in_guard) || TriangleSetup::new(tri, cmd.cull_mode).is_err() {
            continue;
        }

        for i in 0..3 {
            let a = tri[i].pos;
            let b = tri[(i + 1) % 3].pos;
            fb.draw_line(a.x as i32, a.y as i32, b.x as i32, b.y as i32, color);
        }
    }
}
