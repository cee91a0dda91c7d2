//! Resources shared by the game and its level.
//!
//! Some of these are injected into the level's ECS world and read by its
//! systems; others are owned by the game controller or the main loop.
//!
//! Overview
//! - `audio` – bridge and channels for the background audio thread
//! - `flapinput` – flap request latched for the current tick
//! - `gameconfig` – window size, asset root and initial tunables from `config.ini`
//! - `levelphase` – waiting, playing or dying
//! - `loader` – asset loading on a worker thread
//! - `playfield` – world size, ground line and bird column
//! - `settings` – gameplay tunables and volumes with their ranges
//! - `spritesheet` – texture packer atlases
//! - `store` – world size, volumes and asset maps shared across the game
//! - `texturestore` – GPU textures keyed by atlas image path
//! - `tiled` – tree colliders read from a Tiled tileset
//! - `treecatalog` – tree kinds and the spawn distance counter
//! - `worldtime` – simulation time and delta
pub mod audio;
pub mod flapinput;
pub mod gameconfig;
pub mod levelphase;
pub mod loader;
pub mod playfield;
pub mod settings;
pub mod spritesheet;
pub mod store;
pub mod texturestore;
pub mod tiled;
pub mod treecatalog;
pub mod worldtime;
