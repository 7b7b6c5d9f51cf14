//! Ninja Dash: a side-scrolling ninja platformer
//!
//! The world is simulated at a fixed 60 FPS step and drawn into a 320x240
//! software framebuffer that is stretched to the window:
//! - Dash through enemies to clear a level
//! - Falling or getting shot restarts the level at a score penalty
//! - Levels are RON maps loaded from `data/maps/`
//!
//! Only the maps ship with the crate. Images and sounds are dropped into the
//! data directory before the first run; startup exits if any is missing:
//!
//! ```text
//! data/
//! ├── maps/0.ron, 1.ron, ...
//! ├── images/                    # layout listed in `asset`
//! ├── sfx/jump.wav, dash.wav, hit.wav, shoot.wav
//! └── music/8BitMenu.wav, ElectromanAdventures.wav
//! ```

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod asset;
mod audio;
mod config;
mod game;
mod input;
mod menu;
mod rasterizer;
mod world;

use macroquad::prelude::*;
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;

use app::{AppMode, AppState};
use asset::Assets;
use audio::Audio;
use config::{GameConfig, CONFIG_FILE};
use game::renderer::{self, SceneLayers};
use menu::{Menu, MenuChoice};
use world::LevelSet;

fn window_conf() -> Conf {
    // Errors are reported once logging is up in `main`
    let config = GameConfig::load_or_default(CONFIG_FILE).unwrap_or_default();
    Conf {
        window_title: format!("{} v{}", config.window_title, VERSION),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn fatal(what: &str, err: impl std::fmt::Display) -> ! {
    log::error!("{}: {}", what, err);
    std::process::exit(1)
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load_or_default(CONFIG_FILE).unwrap_or_else(|e| fatal(CONFIG_FILE, e));
    let levels = LevelSet::from_dir(&config.maps_dir)
        .unwrap_or_else(|e| fatal(&config.maps_dir.display().to_string(), e));
    let assets = Assets::load(&config.data_dir).unwrap_or_else(|e| fatal("images", e));
    let mut audio = Audio::load(&config.data_dir, config.volumes.clone())
        .await
        .unwrap_or_else(|e| fatal("sounds", e));

    let seed = config
        .seed
        .unwrap_or_else(|| (macroquad::miniquad::date::now() * 1000.0) as u64);
    log::info!("starting with seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut menu = Menu::new(&assets, &mut rng);
    let mut app = AppState::new(levels, rng, assets.clouds.len());
    let mut layers = SceneLayers::new();

    prevent_quit();

    loop {
        let frame_start = get_time();

        if is_quit_requested() {
            log::info!("quit requested");
            break;
        }

        audio.play_music(app.mode().music());
        clear_background(BLACK);

        match app.mode() {
            AppMode::Menu => match menu.frame(&assets) {
                Some(MenuChoice::Play) => app.start_run(),
                Some(MenuChoice::Quit) => break,
                None => {}
            },
            AppMode::Run | AppMode::Paused => {
                for command in app.input.poll() {
                    app.handle_command(command);
                }
                for cue in app.update() {
                    audio.play(cue);
                }

                let paused = app.mode() == AppMode::Paused;
                if let Some(session) = app.session_mut() {
                    renderer::compose_frame(&mut layers, session, &assets);
                    let shake = if paused {
                        renderer::draw_pause_overlay(&mut layers.backdrop);
                        Vec2::ZERO
                    } else {
                        session.shake_offset()
                    };
                    renderer::present(&layers.backdrop, shake);
                }
            }
        }

        // FPS limiting
        if let Some(target_frame_time) = config.frame_time() {
            let elapsed = get_time() - frame_start;
            let remaining = target_frame_time - elapsed;

            if remaining > 0.0 {
                // Native: use sleep for bulk, then spin-wait for precision
                #[cfg(not(target_arch = "wasm32"))]
                {
                    let spin_margin = 0.002; // 2ms
                    while get_time() - frame_start + spin_margin < target_frame_time {
                        std::thread::sleep(std::time::Duration::from_millis(1));
                    }
                    while get_time() - frame_start < target_frame_time {
                        std::hint::spin_loop();
                    }
                }
                // WASM: just spin-wait (no thread::sleep available)
                #[cfg(target_arch = "wasm32")]
                {
                    while get_time() - frame_start < target_frame_time {}
                }
            }
        }

        next_frame().await;
    }
}
