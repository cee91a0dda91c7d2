//! Event types and dispatch used by the game.
//!
//! Submodules:
//! - [`emitter`] – local/global event emission with tracked listeners
//! - [`level`] – level lifecycle event names, payloads and ECS messages
//! - [`audio`] – commands and messages for the background audio thread
pub mod audio;
pub mod emitter;
pub mod level;
