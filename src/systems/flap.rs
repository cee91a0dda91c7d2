//! Flapping: the autopilot, the flap itself and the pre-game hover.
//!
//! Run order within a tick: [`autobird_system`] may raise [`FlapInput`],
//! [`flap_system`] consumes it, [`hover_system`] bobs the bird while the
//! level waits for the first flap.

use bevy_ecs::prelude::*;

use crate::components::bird::Bird;
use crate::components::boxcollider::ColliderSet;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::components::tree::Tree;
use crate::events::level::LevelMessage;
use crate::resources::flapinput::FlapInput;
use crate::resources::levelphase::LevelPhase;
use crate::resources::playfield::Playfield;
use crate::resources::settings::Settings;
use crate::resources::worldtime::WorldTime;

/// Vertical clearance the autopilot keeps above the next obstacle.
pub const AUTOBIRD_CLEARANCE: f32 = 40.0;
/// Amplitude of the pre-game hover, in pixels.
pub const HOVER_AMPLITUDE: f32 = 10.0;
/// Hover angular speed, radians per frame.
pub const HOVER_RATE: f32 = 0.1;

/// Names of the flap sounds; one is picked at random per flap.
pub const SWOOSH_SOUNDS: [&str; 3] = ["swoosh1", "swoosh2", "swoosh3"];

fn swoosh() -> String {
    SWOOSH_SOUNDS[fastrand::usize(..SWOOSH_SOUNDS.len())].to_string()
}

/// Height the autopilot tries to stay above.
///
/// Follows the highest collider of the nearest tree still ahead of the
/// bird, or the bird's home height when there is none.
pub fn autobird_target(
    bird_x: f32,
    home_y: f32,
    bird_height: f32,
    trees: impl IntoIterator<Item = (f32, f32, f32, Option<f32>)>,
) -> f32 {
    trees
        .into_iter()
        .filter(|(x, width, _, _)| x + width > bird_x)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .and_then(|(_, _, y, top)| top.map(|top| y + top - bird_height - AUTOBIRD_CLEARANCE))
        .unwrap_or(home_y)
}

/// Flap for the player when `auto_bird` is on.
pub fn autobird_system(
    settings: Res<Settings>,
    phase: Res<LevelPhase>,
    playfield: Res<Playfield>,
    mut input: ResMut<FlapInput>,
    birds: Query<(&Bird, &MapPosition, &RigidBody, &Sprite)>,
    trees: Query<(&Tree, &MapPosition, &Sprite, &ColliderSet)>,
) {
    if !settings.auto_bird || matches!(*phase, LevelPhase::Dying { .. }) {
        return;
    }
    let Ok((bird, position, rigidbody, sprite)) = birds.single() else {
        return;
    };
    if matches!(*phase, LevelPhase::Waiting) {
        input.pressed = true;
        return;
    }
    let ahead = trees
        .iter()
        .filter(|(tree, ..)| !tree.passed)
        .map(|(_, pos, tree_sprite, colliders)| {
            (pos.pos.x, tree_sprite.width, pos.pos.y, colliders.top())
        });
    let target = autobird_target(playfield.bird_x, bird.home_y, sprite.height, ahead);
    if position.pos.y > target && rigidbody.velocity.y >= 0.0 {
        input.pressed = true;
    }
}

/// Apply a requested flap.
///
/// The first flap while waiting starts the run and reports
/// [`LevelMessage::FirstFlap`]. Flaps are ignored while the bird is dying.
pub fn flap_system(
    settings: Res<Settings>,
    mut phase: ResMut<LevelPhase>,
    mut input: ResMut<FlapInput>,
    mut birds: Query<(Entity, &mut RigidBody), With<Bird>>,
    mut writer: MessageWriter<LevelMessage>,
) {
    if !input.pressed {
        return;
    }
    input.pressed = false;
    let Ok((entity, mut rigidbody)) = birds.single_mut() else {
        return;
    };
    match *phase {
        LevelPhase::Waiting => {
            *phase = LevelPhase::Playing;
            rigidbody.unfreeze();
            writer.write(LevelMessage::FirstFlap(entity));
        }
        LevelPhase::Playing => {}
        LevelPhase::Dying { .. } => return,
    }
    rigidbody.velocity.y = -settings.flap_force;
    writer.write(LevelMessage::Sfx(swoosh()));
}

/// Bob the bird around its home height until the first flap.
pub fn hover_system(
    phase: Res<LevelPhase>,
    time: Res<WorldTime>,
    mut birds: Query<(&Bird, &mut MapPosition), Without<Tree>>,
) {
    if !matches!(*phase, LevelPhase::Waiting) {
        return;
    }
    for (bird, mut position) in birds.iter_mut() {
        position.pos.y = bird.home_y + (time.elapsed * HOVER_RATE).sin() * HOVER_AMPLITUDE;
    }
}
