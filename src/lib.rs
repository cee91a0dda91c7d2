//! Endless Forest library.
//!
//! This module exposes the game's ECS components, resources, systems and
//! events, the display tree, the settings panel and the level controller
//! for use in integration tests and by the binary.

pub mod components;
pub mod display;
pub mod events;
pub mod game;
pub mod gui;
pub mod levels;
pub mod resources;
pub mod systems;
