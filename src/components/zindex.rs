//! Draw order within the level.
//!
//! Background layers sit at the bottom, trees and the bird in the middle and
//! the ground tile on top, so the bird disappears behind the grass when it
//! crashes.

use bevy_ecs::prelude::Component;

/// Higher values are drawn later (on top).
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const SKY: ZIndex = ZIndex(0);
    pub const FAR_TREES: ZIndex = ZIndex(1);
    pub const NEAR_TREES: ZIndex = ZIndex(2);
    pub const BUSHES: ZIndex = ZIndex(3);
    pub const TREE: ZIndex = ZIndex(5);
    pub const BIRD: ZIndex = ZIndex(10);
    pub const GROUND: ZIndex = ZIndex(20);
}
