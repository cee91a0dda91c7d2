//! Game systems.
//!
//! Most of these advance the Endless Forest world once per tick, in the
//! order the level chains them. `audio` and `render` run outside the world.
//!
//! Submodules overview
//! - [`animation`] – cycle the bird's wing frames
//! - [`audio`] – the audio thread and its command loop
//! - [`collision`] – bird against trees and ground
//! - [`flap`] – flap input, autopilot and the waiting hover
//! - [`movement`] – integrate velocities and forces, clamp at the ceiling
//! - [`phase`] – the dying sequence and level reset
//! - [`render`] – draw the stage and the settings panel using Raylib
//! - [`scoring`] – trees passed by the bird
//! - [`scroll`] – scroll trees, wrap parallax layers, spawn new trees
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod audio;
pub mod collision;
pub mod flap;
pub mod movement;
pub mod phase;
pub mod render;
pub mod scoring;
pub mod scroll;
pub mod time;
