//! Playable levels.
//!
//! A level owns its gameplay world and a [`ListenerRegistry`] through which
//! it reports lifecycle events (`entity.passed`, `entity.firstflap`,
//! `entity.die`). The game controller creates one from the current
//! [`Settings`] and the shared store, subscribes to those events, attaches
//! its [`Container`] to the stage and then drives it with `update`.
//!
//! - [`endlessforest`] – the forest avoider level

pub mod endlessforest;

use crate::display::Container;
use crate::events::emitter::ListenerRegistry;
use crate::events::level::EventData;
use crate::resources::settings::Settings;
use crate::resources::store::SharedStore;

/// One textured quad, in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub tex_key: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub z: i32,
}

pub trait Level {
    /// Build the level's world. Called once, after construction.
    fn setup(&mut self);
    /// Advance by `delta` 60 Hz frames.
    fn update(&mut self, delta: f32);
    /// Replace every tunable at once.
    fn update_settings(&mut self, settings: &Settings);
    /// Music volume, 0..=1.
    fn set_music_volume(&mut self, volume: f32);
    /// Stage node standing in for this level's sprites.
    fn container(&self) -> Container;
    /// Sprites to draw this frame, sorted by z.
    fn draw_list(&mut self) -> Vec<SpriteDraw>;
    /// The level's own listener registry.
    fn events(&mut self) -> &mut ListenerRegistry<EventData>;
    /// Tear down the world and the registry. Terminal.
    fn destroy(&mut self);
}

/// Builds the active level.
pub type LevelFactory = Box<dyn Fn(&Settings, SharedStore) -> Box<dyn Level>>;
