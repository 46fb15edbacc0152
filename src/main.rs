//! TRILIGHT viewer
//!
//! Loads a baked asset (see the `texconv` binary), renders the demo scene
//! into a 256x192 software framebuffer and blits it to the window as one
//! nearest-filtered texture per frame. With enhanced lighting on, the floor
//! is composited from three per-vertex-lit passes through the asset's baked
//! per-texel blend alphas.

use std::path::{Path, PathBuf};
use std::process;

use macroquad::prelude::*;

use trilight::app::App;
use trilight::asset::LoadedAsset;
use trilight::config::{ViewerConfig, CONFIG_PATH};
use trilight::rasterizer::{Framebuffer, HEIGHT, WIDTH};
use trilight::scene::render_scene;
use trilight::VERSION;

/// Asset shown when no path is given on the command line
const DEFAULT_ASSET: &str = "assets/demo/output.bin";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("TRILIGHT v{}", VERSION),
        window_width: (WIDTH * 3) as i32,
        window_height: (HEIGHT * 3) as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let asset_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET));

    // The viewer cannot run without a valid asset; a readable error beats
    // a blank window
    let asset = match LoadedAsset::load(&asset_path) {
        Ok(asset) => asset,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Bake the demo asset first: cargo run -p xtask -- gen-assets");
            process::exit(1);
        }
    };

    let config = ViewerConfig::load_or_default(Path::new(CONFIG_PATH));
    let mut app = App::new(config.rig);
    let mut fb = Framebuffer::new(WIDTH, HEIGHT);

    println!("=== TRILIGHT v{} ===", VERSION);
    println!(
        "Showing {} ({}x{} texels)",
        asset_path.display(),
        asset.width(),
        asset.height()
    );
    println!("  Arrow keys    move the white light (hold LeftShift for height)");
    println!("  I/J/K/L U/O   move the red light");
    println!("  Space         toggle enhanced lighting");
    println!("  Escape        quit");

    loop {
        if !app.handle_input() {
            break;
        }

        render_scene(&mut fb, &app.camera, &asset, &app.basis, &app.rig, app.enhanced);

        // Blit the framebuffer, letterboxed to keep the 4:3 aspect
        clear_background(Color::from_rgba(10, 10, 12, 255));
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        let fb_aspect = fb.width as f32 / fb.height as f32;
        let (screen_w, screen_h) = (screen_width(), screen_height());
        let (draw_w, draw_h, draw_x, draw_y) = if fb_aspect > screen_w / screen_h {
            let h = screen_w / fb_aspect;
            (screen_w, h, 0.0, (screen_h - h) * 0.5)
        } else {
            let w = screen_h * fb_aspect;
            (w, screen_h, (screen_w - w) * 0.5, 0.0)
        };
        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        draw_text(
            app.status_line(),
            draw_x + 12.0,
            draw_y + draw_h - 30.0,
            16.0,
            Color::from_rgba(150, 150, 160, 200),
        );
        draw_text(
            App::HINT,
            draw_x + 12.0,
            draw_y + draw_h - 12.0,
            16.0,
            Color::from_rgba(100, 100, 110, 180),
        );

        next_frame().await;
    }
}
