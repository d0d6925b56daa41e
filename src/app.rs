//! Render context
//!
//! Owns everything one frame needs: the framebuffer, the cube's animation
//! state, the loaded config and the flags the window loop toggles. The
//! window loop only feeds it sizes, frame times and key presses.

use crate::config::RenderConfig;
use crate::export::{export_png, export_tga};
use crate::rasterizer::{draw_mesh, draw_mesh_wireframe, Framebuffer, RasterStats};
use crate::scene::{cube_command, SceneState};

pub struct RenderContext {
    pub framebuffer: Framebuffer,
    pub scene: SceneState,
    pub config: RenderConfig,

    /// Cleared when the user asks to quit
    pub running: bool,
    /// TGA capture of the next rendered frame
    pub capture_requested: bool,
    /// PNG screenshot of the next rendered frame
    pub screenshot_requested: bool,
    pub wireframe: bool,

    /// Counters from the most recent `render` call
    pub last_stats: RasterStats,
}

impl RenderContext {
    pub fn new(config: RenderConfig, width: usize, height: usize) -> Self {
        log::info!("render target {}x{}", width, height);
        Self {
            framebuffer: Framebuffer::new(width, height),
            scene: SceneState::new(),
            wireframe: config.scene.wireframe,
            config,
            running: true,
            capture_requested: false,
            screenshot_requested: false,
            last_stats: RasterStats::default(),
        }
    }

    /// Recreate the framebuffer when the target size changed.
    /// Returns true if a new buffer was allocated.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width == self.framebuffer.width && height == self.framebuffer.height {
            return false;
        }
        log::info!(
            "resize {}x{} -> {}x{}",
            self.framebuffer.width, self.framebuffer.height, width, height
        );
        self.framebuffer = Framebuffer::new(width, height);
        true
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.scene.update(dt, &self.config.scene);
    }

    /// Clear, draw the cube and the optional wireframe overlay
    pub fn render(&mut self) -> RasterStats {
        let scene = &self.config.scene;
        let fb = &mut self.framebuffer;
        fb.clear(scene.clear_color);

        let viewport = fb.viewport();
        let cmd = cube_command(scene, &self.scene, fb.width, fb.height);
        let stats = draw_mesh(fb, &cmd, &viewport);

        if self.wireframe {
            draw_mesh_wireframe(fb, &cmd, &viewport, scene.wireframe_color);
        }

        self.last_stats = stats;
        stats
    }

    pub fn request_capture(&mut self) {
        self.capture_requested = true;
    }

    pub fn request_screenshot(&mut self) {
        self.screenshot_requested = true;
    }

    pub fn toggle_wireframe(&mut self) {
        self.wireframe = !self.wireframe;
        log::debug!("wireframe {}", if self.wireframe { "on" } else { "off" });
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write any pending capture of the current framebuffer.
    ///
    /// Failures are logged and dropped; the request is cleared either way.
    /// Returns how many files were written.
    pub fn flush_exports(&mut self) -> usize {
        let mut written = 0;

        if std::mem::take(&mut self.capture_requested) {
            let path = &self.config.capture.tga_path;
            match export_tga(&self.framebuffer, path) {
                Ok(()) => {
                    log::info!("saved {}", path.display());
                    written += 1;
                }
                Err(e) => log::error!("capture to {} failed: {}", path.display(), e),
            }
        }

        if std::mem::take(&mut self.screenshot_requested) {
            let path = &self.config.capture.png_path;
            match export_png(&self.framebuffer, path) {
                Ok(()) => {
                    log::info!("saved {}", path.display());
                    written += 1;
                }
                Err(e) => log::error!("screenshot to {} failed: {}", path.display(), e),
            }
        }

        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::TGA_HEADER_LEN;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("softraster-{}-app-{}", std::process::id(), name))
    }

    #[test]
    fn test_render_draws_cube() {
        let mut ctx = RenderContext::new(RenderConfig::default(), 800, 600);
        let stats = ctx.render();

        assert_eq!(stats.triangles, 12);
        assert!(stats.drawn > 0);
        assert_eq!(ctx.last_stats, stats);
        assert_ne!(ctx.framebuffer.at(400, 300), ctx.config.scene.clear_color);
        assert_eq!(ctx.framebuffer.at(0, 0), ctx.config.scene.clear_color);
    }

    #[test]
    fn test_update_then_render_still_covers_center() {
        let mut ctx = RenderContext::new(RenderConfig::default(), 320, 240);
        for _ in 0..10 {
            ctx.update(0.1);
            ctx.render();
            assert_ne!(ctx.framebuffer.at(160, 120), ctx.config.scene.clear_color);
        }
        assert!((ctx.scene.angle - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize() {
        let mut ctx = RenderContext::new(RenderConfig::default(), 800, 600);
        assert!(!ctx.resize(800, 600));
        assert!(ctx.resize(640, 480));
        assert_eq!(ctx.framebuffer.pixels.len(), 640 * 480);

        ctx.render();
        assert_ne!(ctx.framebuffer.at(320, 240), ctx.config.scene.clear_color);
    }

    #[test]
    fn test_wireframe_overlay() {
        let mut ctx = RenderContext::new(RenderConfig::default(), 200, 200);
        ctx.render();
        let filled = ctx.framebuffer.pixels.clone();

        ctx.toggle_wireframe();
        ctx.render();
        let outline = ctx.config.scene.wireframe_color;
        let changed = ctx.framebuffer.pixels.iter().zip(&filled).filter(|(a, b)| a != b).count();
        assert!(changed > 0);
        assert!(ctx.framebuffer.pixels.iter().any(|p| *p == outline));
    }

    #[test]
    fn test_capture_writes_tga() {
        let mut config = RenderConfig::default();
        config.capture.tga_path = temp_path("capture.tga");
        let mut ctx = RenderContext::new(config, 64, 48);
        ctx.render();

        ctx.request_capture();
        assert_eq!(ctx.flush_exports(), 1);
        assert!(!ctx.capture_requested);

        let bytes = std::fs::read(&ctx.config.capture.tga_path).unwrap();
        let _ = std::fs::remove_file(&ctx.config.capture.tga_path);
        assert_eq!(bytes.len(), TGA_HEADER_LEN + 64 * 48 * 4);

        // Nothing pending, nothing written
        assert_eq!(ctx.flush_exports(), 0);
    }

    #[test]
    fn test_failed_capture_is_dropped() {
        let mut config = RenderConfig::default();
        config.capture.tga_path = temp_path("no-such-dir").join("capture.tga");
        config.capture.png_path = temp_path("no-such-dir").join("shot.png");
        let mut ctx = RenderContext::new(config, 32, 32);
        ctx.render();

        ctx.request_capture();
        ctx.request_screenshot();
        assert_eq!(ctx.flush_exports(), 0);
        assert!(!ctx.capture_requested);
        assert!(!ctx.screenshot_requested);

        // Later frames are unaffected
        ctx.update(0.016);
        let stats = ctx.render();
        assert!(stats.drawn > 0);
        assert!(ctx.running);
    }

    #[test]
    fn test_quit() {
        let mut ctx = RenderContext::new(RenderConfig::default(), 16, 16);
        ctx.quit();
        assert!(!ctx.running);
    }
}
