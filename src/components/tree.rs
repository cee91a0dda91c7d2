//! Scrolling obstacles.

use bevy_ecs::prelude::Component;

/// A tree the bird must avoid.
///
/// `passed` flips once the tree's right edge moves left of the bird, so
/// each tree scores at most once.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Tree {
    pub passed: bool,
}
