//! Window collaborator for softraster
//!
//! macroquad only supplies the window, the clock and the final blit; every
//! pixel comes from the software rasterizer.

use macroquad::prelude::*;
use softraster::app::RenderContext;
use softraster::config::{load_or_default, CONFIG_PATH};
use softraster::logging::{init_logging, LoggingConfig};
use softraster::{scene, VERSION};

fn window_conf() -> Conf {
    // Parse errors are reported again from main once logging is up
    let (config, _) = load_or_default(CONFIG_PATH);
    Conf {
        window_title: format!("{} v{}", config.window.title, VERSION),
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        window_resizable: config.window.resizable,
        ..Default::default()
    }
}

/// Current window size in whole pixels
fn screen_size() -> (usize, usize) {
    (screen_width().max(1.0) as usize, screen_height().max(1.0) as usize)
}

fn handle_input(ctx: &mut RenderContext) {
    let ctrl = is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl);

    if is_key_pressed(KeyCode::Escape) || (ctrl && is_key_pressed(KeyCode::Q)) {
        ctx.quit();
    }
    if is_key_pressed(KeyCode::F11) {
        ctx.request_capture();
    }
    if is_key_pressed(KeyCode::F12) {
        ctx.request_screenshot();
    }
    if is_key_pressed(KeyCode::W) {
        ctx.toggle_wireframe();
    }
}

fn present(ctx: &RenderContext) {
    let fb = &ctx.framebuffer;

    // Window dimensions are far below the u16 limit of the texture API
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, fb.as_bytes());
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

#[macroquad::main(window_conf)]
async fn main() {
    let (config, config_error) = load_or_default(CONFIG_PATH);

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..Default::default()
    });
    log::info!("softraster v{}", VERSION);

    if let Some(e) = config_error {
        log::warn!("ignoring {}: {}", CONFIG_PATH, e);
    }

    if let Err(e) = scene::cube_mesh().validate() {
        log::error!("cube mesh is invalid: {}", e);
        return;
    }

    let (width, height) = screen_size();
    let mut ctx = RenderContext::new(config, width, height);

    while ctx.running {
        let (width, height) = screen_size();
        ctx.resize(width, height);

        handle_input(&mut ctx);
        if !ctx.running {
            break;
        }

        ctx.update(get_frame_time());
        ctx.render();
        ctx.flush_exports();

        clear_background(BLACK);
        present(&ctx);

        next_frame().await
    }

    log::info!("shutting down");
}
