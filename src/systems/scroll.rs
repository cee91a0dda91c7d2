//! Horizontal scrolling: trees, background layers and the tree spawner.

use bevy_ecs::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::parallax::Parallax;
use crate::components::sprite::Sprite;
use crate::components::tree::Tree;
use crate::components::zindex::ZIndex;
use crate::resources::levelphase::LevelPhase;
use crate::resources::playfield::Playfield;
use crate::resources::settings::Settings;
use crate::resources::treecatalog::{TreeCatalog, TreeSpawner};
use crate::resources::worldtime::WorldTime;

/// Move trees left at `speed` and despawn those fully off-screen.
pub fn scroll_trees_system(
    mut commands: Commands,
    settings: Res<Settings>,
    phase: Res<LevelPhase>,
    time: Res<WorldTime>,
    mut trees: Query<(Entity, &mut MapPosition, &Sprite), With<Tree>>,
) {
    if !phase.is_playing() {
        return;
    }
    let dx = settings.speed * time.delta;
    for (entity, mut position, sprite) in trees.iter_mut() {
        position.pos.x -= dx;
        if position.pos.x + sprite.width < 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

/// Scroll background layers and wrap tiles that left the screen.
///
/// Layers keep moving while waiting for the first flap and stop once the
/// bird crashes.
pub fn parallax_system(
    settings: Res<Settings>,
    phase: Res<LevelPhase>,
    time: Res<WorldTime>,
    mut layers: Query<(&Parallax, &mut MapPosition)>,
) {
    if matches!(*phase, LevelPhase::Dying { .. }) {
        return;
    }
    for (parallax, mut position) in layers.iter_mut() {
        position.pos.x -= settings.speed * parallax.factor * time.delta;
        position.pos.x = wrap(position.pos.x, parallax);
    }
}

/// Jump a tile that is fully off-screen on the left back to the far right.
pub fn wrap(x: f32, parallax: &Parallax) -> f32 {
    let span = parallax.span();
    if span <= 0.0 {
        return x;
    }
    let mut x = x;
    while x + parallax.tile_width <= 0.0 {
        x += span;
    }
    x
}

/// Spawn a random tree every `spacing` pixels of travel.
///
/// Trees stand on the ground and enter from the right edge; overshoot past
/// the spacing is carried into the next tree's position so spacing stays
/// exact at any speed.
pub fn tree_spawner_system(
    mut commands: Commands,
    settings: Res<Settings>,
    phase: Res<LevelPhase>,
    time: Res<WorldTime>,
    playfield: Res<Playfield>,
    catalog: Res<TreeCatalog>,
    mut spawner: ResMut<TreeSpawner>,
) {
    if !phase.is_playing() || spawner.spacing <= 0.0 {
        return;
    }
    spawner.travelled += settings.speed * time.delta;
    while spawner.travelled >= spawner.spacing {
        spawner.travelled -= spawner.spacing;
        let Some(kind) = catalog.pick() else {
            continue;
        };
        let x = playfield.width - spawner.travelled;
        let y = playfield.ground_y - kind.height;
        commands.spawn((
            Tree::default(),
            MapPosition::new(x, y),
            Sprite::new(kind.tex_key.clone(), kind.width, kind.height),
            kind.colliders.clone(),
            ZIndex::TREE,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_moves_offscreen_tiles_by_span() {
        let layer = Parallax {
            factor: 0.5,
            tile_width: 100.0,
            tiles: 3,
        };
        assert_eq!(wrap(-20.0, &layer), -20.0);
        assert_eq!(wrap(-100.0, &layer), 200.0);
        assert_eq!(wrap(-130.0, &layer), 170.0);
    }

    #[test]
    fn wrap_ignores_empty_layers() {
        let layer = Parallax {
            factor: 1.0,
            tile_width: 0.0,
            tiles: 0,
        };
        assert_eq!(wrap(-50.0, &layer), -50.0);
    }
}
