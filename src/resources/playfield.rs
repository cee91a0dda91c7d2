use bevy_ecs::prelude::Resource;

/// Fixed geometry of the level.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
    /// Y of the ground surface; touching it kills the bird.
    pub ground_y: f32,
    /// Horizontal position of the bird's left edge.
    pub bird_x: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32, ground_height: f32) -> Self {
        Playfield {
            width,
            height,
            ground_y: height - ground_height,
            bird_x: width * 0.25,
        }
    }
}
