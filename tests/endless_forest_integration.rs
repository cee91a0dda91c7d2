//! Endless Forest level integration tests: the real level ticking its
//! `bevy_ecs` world headless, observed through its listener registry and
//! the global bus.

use std::cell::RefCell;
use std::rc::Rc;

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use endlessforest::components::bird::Bird;
use endlessforest::components::mapposition::MapPosition;
use endlessforest::components::rigidbody::{GRAVITY, RigidBody};
use endlessforest::components::sprite::Sprite;
use endlessforest::components::tree::Tree;
use endlessforest::components::zindex::ZIndex;
use endlessforest::events::level::{
    AUDIO_MUSIC_PLAY, AUDIO_MUSIC_STOP, AUDIO_SFX, ENTITY_DIE, ENTITY_FIRST_FLAP, ENTITY_PASSED,
    EventData,
};
use endlessforest::levels::Level;
use endlessforest::levels::endlessforest::{BGM, EndlessForest};
use endlessforest::resources::levelphase::LevelPhase;
use endlessforest::resources::settings::Settings;
use endlessforest::resources::store::{SharedStore, Store};
use endlessforest::systems::collision::CRASH_GROUND;
use endlessforest::systems::flap::SWOOSH_SOUNDS;

type Seen = Rc<RefCell<Vec<String>>>;

fn make_level(settings: Settings) -> (EndlessForest, SharedStore, Seen) {
    let store = Store::new(1280.0, 720.0).shared();
    let seen: Seen = Rc::default();
    let bus = store.borrow().message_bus.clone();
    for event in [AUDIO_SFX, AUDIO_MUSIC_PLAY, AUDIO_MUSIC_STOP] {
        let sink = seen.clone();
        bus.on(event, move |data| {
            if let EventData::Sound { id, .. } = data {
                sink.borrow_mut().push(format!("{} {}", event, id));
            }
        });
    }

    let mut level = EndlessForest::new(&settings, store.clone());
    for event in [ENTITY_PASSED, ENTITY_FIRST_FLAP, ENTITY_DIE] {
        let sink = seen.clone();
        level
            .events()
            .on(event, move |_| sink.borrow_mut().push(event.to_string()));
    }
    level.setup();
    (level, store, seen)
}

fn tick(level: &mut EndlessForest, store: &SharedStore, flap: bool) {
    store.borrow_mut().input.flap = flap;
    level.update(1.0);
    store.borrow_mut().input.flap = false;
}

fn count(seen: &Seen, event: &str) -> usize {
    seen.borrow().iter().filter(|e| e.as_str() == event).count()
}

fn bird(level: &mut EndlessForest) -> (MapPosition, RigidBody) {
    let world = level.world_mut();
    let mut query = world.query_filtered::<(&MapPosition, &RigidBody), With<Bird>>();
    let (position, rigidbody) = query.single(world).expect("one bird");
    (*position, rigidbody.clone())
}

fn tree_count(level: &mut EndlessForest) -> usize {
    let world = level.world_mut();
    world.query_filtered::<Entity, With<Tree>>().iter(world).count()
}

#[test]
fn setup_spawns_a_frozen_bird_and_starts_music() {
    let (mut level, _store, seen) = make_level(Settings::default());

    assert_eq!(level.phase(), LevelPhase::Waiting);
    let (_, rigidbody) = bird(&mut level);
    assert!(rigidbody.frozen);
    assert_eq!(tree_count(&mut level), 0);
    assert_eq!(*seen.borrow(), vec![format!("{} {}", AUDIO_MUSIC_PLAY, BGM)]);
}

#[test]
fn bird_hovers_until_the_first_flap() {
    let (mut level, store, seen) = make_level(Settings::default());
    for _ in 0..30 {
        tick(&mut level, &store, false);
    }
    assert_eq!(level.phase(), LevelPhase::Waiting);
    assert_eq!(tree_count(&mut level), 0);
    assert_eq!(count(&seen, ENTITY_FIRST_FLAP), 0);
    let (position, _) = bird(&mut level);
    let home = level.playfield().height * 0.4;
    assert!((position.pos.y - home).abs() <= 10.0 + 1e-3);
}

#[test]
fn first_flap_starts_the_run() {
    let (mut level, store, seen) = make_level(Settings::default());

    tick(&mut level, &store, true);

    assert_eq!(level.phase(), LevelPhase::Playing);
    assert_eq!(count(&seen, ENTITY_FIRST_FLAP), 1);
    let (_, rigidbody) = bird(&mut level);
    assert!(!rigidbody.frozen);
    assert!(rigidbody.velocity.y < 0.0);
    assert_eq!(tree_count(&mut level), 1);
    let swooshes = seen
        .borrow()
        .iter()
        .filter(|e| SWOOSH_SOUNDS.iter().any(|s| **e == format!("{} {}", AUDIO_SFX, s)))
        .count();
    assert_eq!(swooshes, 1);

    // later flaps do not count as first
    tick(&mut level, &store, true);
    assert_eq!(count(&seen, ENTITY_FIRST_FLAP), 1);
}

#[test]
fn passing_a_tree_emits_once() {
    let (mut level, store, seen) = make_level(Settings::default());
    tick(&mut level, &store, true);

    let bird_x = level.playfield().bird_x;
    level.world_mut().spawn((
        Tree::default(),
        MapPosition::new(bird_x - 210.0, 100.0),
        Sprite::new("tree1", 200.0, 100.0),
        ZIndex::TREE,
    ));
    tick(&mut level, &store, false);
    tick(&mut level, &store, false);

    assert_eq!(count(&seen, ENTITY_PASSED), 1);
}

#[test]
fn falling_to_the_ground_dies_then_resets() {
    let (mut level, store, seen) = make_level(Settings::default());
    tick(&mut level, &store, true);

    let mut ticks = 0;
    while count(&seen, ENTITY_DIE) == 0 && ticks < 120 {
        tick(&mut level, &store, false);
        ticks += 1;
    }
    assert_eq!(count(&seen, ENTITY_DIE), 1);
    assert!(matches!(level.phase(), LevelPhase::Dying { .. }));
    assert_eq!(count(&seen, &format!("{} {}", AUDIO_SFX, CRASH_GROUND)), 1);

    // flaps are ignored while dying
    tick(&mut level, &store, true);
    assert!(matches!(level.phase(), LevelPhase::Dying { .. }));

    for _ in 0..120 {
        tick(&mut level, &store, false);
    }
    assert_eq!(level.phase(), LevelPhase::Waiting);
    assert_eq!(count(&seen, ENTITY_DIE), 1);
    assert_eq!(tree_count(&mut level), 0);
    let (position, _) = bird(&mut level);
    assert_eq!(position.pos.x, level.playfield().bird_x);

    // and a new run can start
    tick(&mut level, &store, true);
    assert_eq!(level.phase(), LevelPhase::Playing);
    assert_eq!(count(&seen, ENTITY_FIRST_FLAP), 2);
}

#[test]
fn weightless_bird_still_lands_and_resets() {
    let settings = Settings {
        gravity: 0.0,
        flap_force: 0.0,
        ..Settings::default()
    };
    let (mut level, store, _seen) = make_level(settings);
    tick(&mut level, &store, true);
    assert_eq!(level.phase(), LevelPhase::Playing);

    // without gravity the bird hangs in the air; crash it there
    let (before, rigidbody) = bird(&mut level);
    assert_eq!(rigidbody.velocity.y, 0.0);
    *level.world_mut().resource_mut::<LevelPhase>() = LevelPhase::Dying { grounded_for: 0.0 };
    tick(&mut level, &store, false);
    let (after, _) = bird(&mut level);
    assert!(after.pos.y > before.pos.y);

    let mut ticks = 0;
    while level.phase() != LevelPhase::Waiting && ticks < 300 {
        tick(&mut level, &store, false);
        ticks += 1;
    }
    assert_eq!(level.phase(), LevelPhase::Waiting);
    assert_eq!(tree_count(&mut level), 0);

    tick(&mut level, &store, true);
    assert_eq!(level.phase(), LevelPhase::Playing);
}

#[test]
fn autopilot_starts_and_keeps_flying() {
    let settings = Settings {
        auto_bird: true,
        ..Settings::default()
    };
    let (mut level, store, seen) = make_level(settings);
    for _ in 0..60 {
        tick(&mut level, &store, false);
    }
    assert_eq!(count(&seen, ENTITY_FIRST_FLAP), 1);
    assert_eq!(level.phase(), LevelPhase::Playing);
    assert_eq!(count(&seen, ENTITY_DIE), 0);
}

#[test]
fn settings_update_the_bird_forces() {
    let (mut level, _store, _seen) = make_level(Settings::default());
    level.update_settings(&Settings {
        gravity: 1.2,
        max_speed: 25.0,
        ..Settings::default()
    });
    let (_, rigidbody) = bird(&mut level);
    assert_eq!(rigidbody.forces[GRAVITY], Vector2::new(0.0, 1.2));
    assert_eq!(rigidbody.max_speed, Some(25.0));
    assert_eq!(level.settings().gravity, 1.2);
}

#[test]
fn destroy_stops_music_and_clears_the_world() {
    let (mut level, store, seen) = make_level(Settings::default());
    level.destroy();

    assert!(level.is_destroyed());
    assert_eq!(
        seen.borrow().last().cloned(),
        Some(format!("{} {}", AUDIO_MUSIC_STOP, BGM))
    );
    let world = level.world_mut();
    assert_eq!(world.query::<Entity>().iter(world).count(), 0);

    tick(&mut level, &store, true);
    assert_eq!(count(&seen, ENTITY_FIRST_FLAP), 0);
}
