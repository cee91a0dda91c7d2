//! Internal phase of a running level.

use bevy_ecs::prelude::Resource;

/// Frames the level waits after the bird lands before resetting itself.
pub const RESET_DELAY: f32 = 45.0;
/// Pixels per frame a dead bird drops when gravity alone would not land it.
pub const DEATH_FALL_SPEED: f32 = 8.0;

/// Where the level is in its play/death/restart loop.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Default)]
pub enum LevelPhase {
    /// Bird hovers, no obstacles; the next flap starts the run.
    #[default]
    Waiting,
    /// Obstacles scroll and the bird can score.
    Playing,
    /// The bird crashed and is falling; `grounded_for` counts frames spent
    /// on the ground.
    Dying { grounded_for: f32 },
}

impl LevelPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, LevelPhase::Playing)
    }
}
