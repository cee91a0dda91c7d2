//! Death and restart.
//!
//! While [`LevelPhase::Dying`], the bird keeps falling until it lands on the
//! ground. When its own gravity and speed cap cannot bring it down, it drops
//! at [`DEATH_FALL_SPEED`] instead. After [`RESET_DELAY`] frames on the
//! ground the level clears its trees, puts the bird back home and waits for
//! the next first flap.

use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::components::tree::Tree;
use crate::resources::levelphase::{DEATH_FALL_SPEED, LevelPhase, RESET_DELAY};
use crate::resources::playfield::Playfield;
use crate::resources::treecatalog::TreeSpawner;
use crate::resources::worldtime::WorldTime;

pub fn dying_system(
    mut commands: Commands,
    mut phase: ResMut<LevelPhase>,
    time: Res<WorldTime>,
    playfield: Res<Playfield>,
    mut spawner: ResMut<TreeSpawner>,
    mut birds: Query<(&mut Bird, &mut MapPosition, &mut RigidBody, &Sprite), Without<Tree>>,
    trees: Query<Entity, With<Tree>>,
) {
    let LevelPhase::Dying { grounded_for } = *phase else {
        return;
    };
    let Ok((mut bird, mut position, mut rigidbody, sprite)) = birds.single_mut() else {
        return;
    };

    let floor = playfield.ground_y - sprite.height;
    if position.pos.y < floor {
        if !rigidbody.falls() {
            rigidbody.velocity.y = 0.0;
            rigidbody.freeze();
            position.pos.y = (position.pos.y + DEATH_FALL_SPEED * time.delta).min(floor);
        }
        if position.pos.y < floor {
            return;
        }
    }
    position.pos.y = floor;
    rigidbody.velocity.y = 0.0;
    rigidbody.freeze();

    let grounded_for = grounded_for + time.delta;
    if grounded_for < RESET_DELAY {
        *phase = LevelPhase::Dying { grounded_for };
        return;
    }

    for tree in trees.iter() {
        commands.entity(tree).despawn();
    }
    *spawner = TreeSpawner::default();
    position.pos.x = playfield.bird_x;
    position.pos.y = bird.home_y;
    bird.frame = 0;
    bird.frame_time = 0.0;
    *phase = LevelPhase::Waiting;
}
