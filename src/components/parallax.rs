//! Endlessly wrapping background layers.

use bevy_ecs::prelude::Component;

/// One tile of a background layer.
///
/// The layer scrolls at `factor * speed`. A layer is made of `tiles`
/// copies laid side by side; when one copy leaves the screen on the left it
/// jumps `tiles * tile_width` to the right.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Parallax {
    pub factor: f32,
    pub tile_width: f32,
    pub tiles: usize,
}

impl Parallax {
    /// Total width covered by all copies of the layer.
    pub fn span(&self) -> f32 {
        self.tile_width * self.tiles as f32
    }
}
