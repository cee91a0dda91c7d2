//! Report trees the bird has flown past.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::sprite::Sprite;
use crate::components::tree::Tree;
use crate::events::level::LevelMessage;
use crate::resources::levelphase::LevelPhase;
use crate::resources::playfield::Playfield;

/// A tree counts once its right edge is left of the bird.
pub fn passed_system(
    phase: Res<LevelPhase>,
    playfield: Res<Playfield>,
    mut trees: Query<(Entity, &mut Tree, &MapPosition, &Sprite)>,
    mut writer: MessageWriter<LevelMessage>,
) {
    if !phase.is_playing() {
        return;
    }
    for (entity, mut tree, position, sprite) in trees.iter_mut() {
        if !tree.passed && position.pos.x + sprite.width < playfield.bird_x {
            tree.passed = true;
            writer.write(LevelMessage::Passed(entity));
        }
    }
}
