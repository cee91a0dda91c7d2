//! Wing animation of the bird.
//!
//! Cycles `bird0..birdN` every [`BIRD_FRAME_TIME`] frames and points the
//! sprite at the current frame. The wings stop once the bird crashes.

use bevy_ecs::prelude::*;

use crate::components::bird::{BIRD_FRAME_TIME, Bird};
use crate::components::sprite::Sprite;
use crate::resources::levelphase::LevelPhase;
use crate::resources::worldtime::WorldTime;

pub fn bird_animation_system(
    phase: Res<LevelPhase>,
    time: Res<WorldTime>,
    mut birds: Query<(&mut Bird, &mut Sprite)>,
) {
    if matches!(*phase, LevelPhase::Dying { .. }) {
        return;
    }
    for (mut bird, mut sprite) in birds.iter_mut() {
        if bird.frame_count == 0 {
            continue;
        }
        bird.frame_time += time.delta;
        while bird.frame_time >= BIRD_FRAME_TIME {
            bird.frame_time -= BIRD_FRAME_TIME;
            bird.frame = (bird.frame + 1) % bird.frame_count;
        }
        let key = bird.tex_key();
        if sprite.tex_key != key {
            sprite.tex_key = key;
        }
    }
}
