//! ECS components used by the Endless Forest level.
//!
//! Each submodule defines one or more components:
//! - [`bird`] – the player-controlled bird and its animation state
//! - [`boxcollider`] – axis-aligned collision boxes and multi-box sets
//! - [`mapposition`] – world-space top-left position
//! - [`parallax`] – wrapping background layers
//! - [`rigidbody`] – velocity and named acceleration forces
//! - [`sprite`] – texture key and size for drawing
//! - [`tree`] – scrolling obstacles that score when passed
//! - [`zindex`] – draw order
pub mod bird;
pub mod boxcollider;
pub mod mapposition;
pub mod parallax;
pub mod rigidbody;
pub mod sprite;
pub mod tree;
pub mod zindex;
