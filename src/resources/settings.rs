//! Gameplay tunables and audio volumes.
//!
//! [`Settings`] is pushed as a whole into the active level whenever any of
//! its fields changes. Values are expressed in 60 Hz frame units: `speed` is
//! pixels per frame, `gravity` pixels per frame squared, and so on.
//!
//! Ranges are enforced by [`Settings::clamped`]; the settings panel uses the
//! same constants for its sliders.

use bevy_ecs::prelude::Resource;
use std::ops::RangeInclusive;

pub const FLAP_FORCE_RANGE: RangeInclusive<f32> = 0.0..=50.0;
pub const GRAVITY_RANGE: RangeInclusive<f32> = 0.0..=1.5;
pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=30.0;
pub const MAX_SPEED_RANGE: RangeInclusive<f32> = 0.0..=40.0;
pub const VOLUME_RANGE: RangeInclusive<f32> = 0.0..=100.0;

/// Level tunables.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Let the bird fly itself.
    pub auto_bird: bool,
    /// Horizontal scroll speed of the forest.
    pub speed: f32,
    /// Cap on the bird's vertical speed.
    pub max_speed: f32,
    /// Upward velocity given by a flap.
    pub flap_force: f32,
    /// Downward acceleration applied to the bird.
    pub gravity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_bird: false,
            speed: 12.5,
            max_speed: 20.0,
            flap_force: 11.0,
            gravity: 0.7,
        }
    }
}

impl Settings {
    /// The "make it fast" preset: only flap force, gravity and speed change.
    pub fn fast(self) -> Self {
        Settings {
            flap_force: 15.0,
            gravity: 1.3,
            speed: 30.0,
            ..self
        }
    }

    /// Copy with every numeric field clamped into its documented range.
    pub fn clamped(self) -> Self {
        Settings {
            auto_bird: self.auto_bird,
            speed: clamp(self.speed, &SPEED_RANGE),
            max_speed: clamp(self.max_speed, &MAX_SPEED_RANGE),
            flap_force: clamp(self.flap_force, &FLAP_FORCE_RANGE),
            gravity: clamp(self.gravity, &GRAVITY_RANGE),
        }
    }
}

/// Background music and sound effect volumes on a 0..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volumes {
    pub bgm: f32,
    pub sfx: f32,
}

impl Default for Volumes {
    fn default() -> Self {
        Volumes {
            bgm: 25.0,
            sfx: 50.0,
        }
    }
}

impl Volumes {
    /// Music volume normalized to 0..=1.
    pub fn bgm_normalized(&self) -> f32 {
        clamp(self.bgm, &VOLUME_RANGE) / 100.0
    }
    /// Effects volume normalized to 0..=1.
    pub fn sfx_normalized(&self) -> f32 {
        clamp(self.sfx, &VOLUME_RANGE) / 100.0
    }
}

/// Clamp `value` into `range`; NaN maps to the range start.
pub fn clamp(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
