//! Bird collisions with trees and the ground.
//!
//! A hit while playing switches the level to [`LevelPhase::Dying`], reports
//! [`LevelMessage::Died`] and queues the matching crash sound. Only the first
//! hit of a run counts.

use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::boxcollider::{BoxCollider, ColliderSet};
use crate::components::mapposition::MapPosition;
use crate::components::tree::Tree;
use crate::events::level::LevelMessage;
use crate::resources::levelphase::LevelPhase;
use crate::resources::playfield::Playfield;

pub const CRASH_TREE: &str = "crashTree";
pub const CRASH_GROUND: &str = "crashGround";

pub fn collision_system(
    mut phase: ResMut<LevelPhase>,
    playfield: Res<Playfield>,
    birds: Query<(Entity, &MapPosition, &BoxCollider), With<Bird>>,
    trees: Query<(&MapPosition, &ColliderSet), With<Tree>>,
    mut writer: MessageWriter<LevelMessage>,
) {
    if !phase.is_playing() {
        return;
    }
    let Ok((entity, bird_pos, collider)) = birds.single() else {
        return;
    };

    let hit_tree = trees
        .iter()
        .any(|(tree_pos, colliders)| colliders.overlaps(tree_pos.pos, collider, bird_pos.pos));
    let (_, max) = collider.aabb(bird_pos.pos);
    let hit_ground = max.y >= playfield.ground_y;

    let sound = if hit_tree {
        CRASH_TREE
    } else if hit_ground {
        CRASH_GROUND
    } else {
        return;
    };

    *phase = LevelPhase::Dying { grounded_for: 0.0 };
    writer.write(LevelMessage::Died(entity));
    writer.write(LevelMessage::Sfx(sound.to_string()));
}
