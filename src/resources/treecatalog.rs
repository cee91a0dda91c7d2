//! Tree kinds available to the spawner.

use crate::components::boxcollider::ColliderSet;
use bevy_ecs::prelude::Resource;

/// Horizontal distance, in pixels, between consecutive trees.
pub const TREE_SPACING: f32 = 560.0;

/// One kind of tree: its texture, size and collision boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeKind {
    pub tex_key: String,
    pub width: f32,
    pub height: f32,
    pub colliders: ColliderSet,
}

/// All tree kinds, in `tree1..treeN` order.
#[derive(Resource, Clone, Debug, Default)]
pub struct TreeCatalog {
    pub kinds: Vec<TreeKind>,
}

impl TreeCatalog {
    /// Pick a kind at random; `None` when the catalog is empty.
    pub fn pick(&self) -> Option<&TreeKind> {
        if self.kinds.is_empty() {
            return None;
        }
        self.kinds.get(fastrand::usize(..self.kinds.len()))
    }
}

/// Distance scrolled since the last tree was spawned.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct TreeSpawner {
    pub travelled: f32,
    pub spacing: f32,
}

impl Default for TreeSpawner {
    fn default() -> Self {
        TreeSpawner {
            // the first tree appears as soon as the run starts
            travelled: TREE_SPACING,
            spacing: TREE_SPACING,
        }
    }
}
