//! Endless Forest main entry point.
//!
//! A small side-scrolling avoider written in Rust using:
//! - **raylib** for windowing, graphics, input and audio
//! - **bevy_ecs** for the level's entity-component-system world
//!
//! # Main Loop
//!
//! 1. Read `config.ini` and the command line, open the window
//! 2. Build the shared store, start the audio thread and relay audio cues
//! 3. Create the game controller with a threaded asset loader and call `setup`
//! 4. Each frame: sample the flap input, update the game, draw the stage and
//!    the imgui settings panel, then apply the panel's edits
//! 5. Tear the game down and stop the audio thread on exit
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --assets ./assets
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use log::{info, warn};
use raylib::prelude::*;

use endlessforest::display::RaylibMeasure;
use endlessforest::game::Game;
use endlessforest::gui::PanelFrame;
use endlessforest::levels::endlessforest::EndlessForest;
use endlessforest::levels::{Level, LevelFactory};
use endlessforest::resources::audio::{
    drain_audio_messages, relay_audio_cues, setup_audio, shutdown_audio,
};
use endlessforest::resources::gameconfig::GameConfig;
use endlessforest::resources::loader::ThreadedLoader;
use endlessforest::resources::store::Store;
use endlessforest::resources::texturestore::TextureStore;
use endlessforest::systems::render::{preload_textures, render_panel, render_stage};

/// Endless Forest: flap through a forest that never ends.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Asset directory, overriding the configuration file.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Start with the autopilot on.
    #[arg(long)]
    auto_bird: bool,

    /// Start with the "make it fast" preset.
    #[arg(long)]
    fast: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(assets) = cli.assets {
        config.asset_root = assets;
    }
    if cli.auto_bird {
        config.settings.auto_bird = true;
    }
    if cli.fast {
        config.settings = config.settings.fast();
    }

    let (mut rl, thread) = raylib::init()
        .size(config.world_width as i32, config.world_height as i32)
        .title("Endless Forest")
        .build();
    rl.set_target_fps(config.target_fps);

    let (world_width, world_height) = config.world_size();
    let store = Store::new(world_width, world_height).shared();

    let audio = setup_audio();
    relay_audio_cues(&store.borrow().message_bus, audio.tx_cmd.clone());

    let factory: LevelFactory =
        Box::new(|settings, store| Box::new(EndlessForest::new(settings, store)) as Box<dyn Level>);
    let mut game = Game::new(
        &config,
        store.clone(),
        Box::new(ThreadedLoader::new()),
        factory,
        Rc::new(RaylibMeasure),
    );
    game.setup();

    let mut textures = TextureStore::new();
    let mut textures_ready = false;
    // imgui reports mouse capture while drawing, so clicks use last frame's answer
    let mut panel_wants_mouse = false;

    while !rl.window_should_close() {
        let flap = rl.is_key_pressed(KeyboardKey::KEY_SPACE)
            || rl.is_key_pressed(KeyboardKey::KEY_UP)
            || (rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) && !panel_wants_mouse);
        store.borrow_mut().input.flap = flap;

        // raylib frame time is in seconds; the game runs in 60 Hz frames
        let delta = rl.get_frame_time() * 60.0;
        game.update(delta);
        drain_audio_messages(&audio);

        if !textures_ready && !store.borrow().texture_map.is_empty() {
            preload_textures(&mut rl, &thread, &store.borrow(), &mut textures);
            textures_ready = true;
        }

        let values = game.panel_values();
        let stage = game.stage();
        let panel_frame = {
            let mut d = rl.begin_drawing(&thread);
            render_stage(
                &mut d,
                &stage.borrow(),
                game.level_mut(),
                &store.borrow(),
                &textures,
            );
            match game.panel() {
                Some(panel) => render_panel(&mut d, &panel.borrow(), &values),
                None => PanelFrame::default(),
            }
        };
        panel_wants_mouse = panel_frame.wants_mouse;
        for change in panel_frame.changes {
            game.apply_panel_change(change);
        }
    }

    game.destroy();
    shutdown_audio(audio);
    info!("Bye!");
}
