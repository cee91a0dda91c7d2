//! The player-controlled bird.

use crate::components::boxcollider::BoxCollider;
use bevy_ecs::prelude::Component;

/// Frames each wing animation frame stays on screen.
pub const BIRD_FRAME_TIME: f32 = 5.0;

/// Marks the bird entity and carries its wing animation state.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    /// Index of the current animation frame.
    pub frame: usize,
    /// Frames elapsed on the current animation frame.
    pub frame_time: f32,
    /// Number of animation frames (`bird0..birdN`); 0 disables animation.
    pub frame_count: usize,
    /// Resting height the bird hovers around before the first flap.
    pub home_y: f32,
}

impl Bird {
    pub fn new(home_y: f32) -> Self {
        Bird {
            frame: 0,
            frame_time: 0.0,
            frame_count: 0,
            home_y,
        }
    }

    pub fn with_frames(mut self, frame_count: usize) -> Self {
        self.frame_count = frame_count;
        self
    }

    /// Texture key of the current frame.
    pub fn tex_key(&self) -> String {
        format!("bird{}", self.frame)
    }
}

/// Bird collider, inset from its sprite so grazing contacts do not count.
pub fn bird_collider(width: f32, height: f32) -> BoxCollider {
    BoxCollider::from_rect(width * 0.15, height * 0.2, width * 0.7, height * 0.6)
}
