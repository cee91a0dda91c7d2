//! The Endless Forest level.
//!
//! Gameplay lives in a private `bevy_ecs` [`World`] advanced by a chained
//! [`Schedule`]. Systems report what happened through [`LevelMessage`]s;
//! after each tick the level drains them and re-emits lifecycle events on
//! its own [`ListenerRegistry`] and sound cues on the global bus.
//!
//! Sizes come from the texture map in the shared store. Anything missing
//! falls back to built-in dimensions so the level also runs headless.

use bevy_ecs::message::Messages;
use bevy_ecs::prelude::*;
use log::{debug, info};
use raylib::prelude::Vector2;

use crate::components::bird::{Bird, bird_collider};
use crate::components::boxcollider::{BoxCollider, ColliderSet};
use crate::components::mapposition::MapPosition;
use crate::components::parallax::Parallax;
use crate::components::rigidbody::{GRAVITY, RigidBody};
use crate::components::sprite::Sprite;
use crate::components::zindex::ZIndex;
use crate::display::Container;
use crate::events::emitter::ListenerRegistry;
use crate::events::level::{
    AUDIO_MUSIC_PLAY, AUDIO_MUSIC_STOP, AUDIO_MUSIC_VOLUME, AUDIO_SFX, EventData, LevelMessage,
};
use crate::levels::{Level, SpriteDraw};
use crate::resources::flapinput::FlapInput;
use crate::resources::levelphase::LevelPhase;
use crate::resources::playfield::Playfield;
use crate::resources::settings::Settings;
use crate::resources::store::SharedStore;
use crate::resources::treecatalog::{TreeCatalog, TreeKind, TreeSpawner};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::bird_animation_system;
use crate::systems::collision::collision_system;
use crate::systems::flap::{autobird_system, flap_system, hover_system};
use crate::systems::movement::{ceiling_system, movement};
use crate::systems::phase::dying_system;
use crate::systems::scoring::passed_system;
use crate::systems::scroll::{parallax_system, scroll_trees_system, tree_spawner_system};
use crate::systems::time::update_world_time;

pub const LEVEL_NAME: &str = "endlessForest";
/// Background music id, as indexed by the controller.
pub const BGM: &str = "endlessForestBGM";
/// Number of tree kinds, `tree1..tree10`.
pub const TREE_KINDS: usize = 10;

const FALLBACK_GROUND_HEIGHT: f32 = 96.0;
const FALLBACK_BIRD: (f32, f32) = (80.0, 60.0);
const FALLBACK_TREE: (f32, f32) = (200.0, 420.0);

/// Background layers: texture key, scroll factor, draw order.
const LAYERS: [(&str, f32, ZIndex); 5] = [
    ("sky", 0.0, ZIndex::SKY),
    ("farTrees", 0.1, ZIndex::FAR_TREES),
    ("nearTrees", 0.25, ZIndex::NEAR_TREES),
    ("backgroundBushes", 0.5, ZIndex::BUSHES),
    ("foregroundTile", 1.0, ZIndex::GROUND),
];

pub struct EndlessForest {
    world: World,
    schedule: Schedule,
    events: ListenerRegistry<EventData>,
    store: SharedStore,
    destroyed: bool,
}

impl EndlessForest {
    pub fn new(settings: &Settings, store: SharedStore) -> Self {
        let (width, height, ground_height, bus) = {
            let s = store.borrow();
            let ground_height = s
                .texture_size("foregroundTile")
                .map(|(_, h)| h)
                .unwrap_or(FALLBACK_GROUND_HEIGHT);
            (
                s.world_width,
                s.world_height,
                ground_height,
                s.message_bus.clone(),
            )
        };

        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(FlapInput::default());
        world.insert_resource(LevelPhase::default());
        world.insert_resource(Playfield::new(width, height, ground_height));
        world.insert_resource(settings.clamped());
        world.insert_resource(TreeCatalog::default());
        world.insert_resource(TreeSpawner::default());
        world.init_resource::<Messages<LevelMessage>>();

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                autobird_system,
                flap_system,
                hover_system,
                movement,
                ceiling_system,
                scroll_trees_system,
                parallax_system,
                tree_spawner_system,
                collision_system,
                passed_system,
                dying_system,
                bird_animation_system,
            )
                .chain(),
        );

        EndlessForest {
            world,
            schedule,
            events: ListenerRegistry::new(bus),
            store,
            destroyed: false,
        }
    }

    pub fn phase(&self) -> LevelPhase {
        *self.world.resource::<LevelPhase>()
    }

    pub fn settings(&self) -> Settings {
        *self.world.resource::<Settings>()
    }

    pub fn playfield(&self) -> Playfield {
        *self.world.resource::<Playfield>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn tree_catalog(&self) -> TreeCatalog {
        let store = self.store.borrow();
        let kinds = (1..=TREE_KINDS)
            .map(|i| {
                let key = format!("tree{}", i);
                let (width, height) = store.texture_size(&key).unwrap_or(FALLBACK_TREE);
                let colliders = match store.tree_collider_map.get(&key) {
                    Some(boxes) => ColliderSet::new(boxes.iter().copied()),
                    None => {
                        debug!("no colliders for '{}', using its trunk", key);
                        ColliderSet::new([BoxCollider::from_rect(
                            width * 0.35,
                            0.0,
                            width * 0.3,
                            height,
                        )])
                    }
                };
                TreeKind {
                    tex_key: key,
                    width,
                    height,
                    colliders,
                }
            })
            .collect();
        TreeCatalog { kinds }
    }

    fn spawn_layers(&mut self) {
        let playfield = self.playfield();
        let sizes: Vec<(&str, f32, ZIndex, Option<(f32, f32)>)> = {
            let store = self.store.borrow();
            LAYERS
                .iter()
                .map(|(key, factor, z)| (*key, *factor, *z, store.texture_size(key)))
                .collect()
        };
        for (key, factor, z, size) in sizes {
            let Some((tile_width, tile_height)) = size else {
                debug!("layer '{}' has no texture, skipped", key);
                continue;
            };
            if tile_width <= 0.0 {
                continue;
            }
            let tiles = if factor == 0.0 {
                1
            } else {
                (playfield.width / tile_width).ceil() as usize + 1
            };
            let y = match key {
                "sky" => 0.0,
                "foregroundTile" => playfield.ground_y,
                _ => playfield.ground_y - tile_height,
            };
            let parallax = Parallax {
                factor,
                tile_width,
                tiles,
            };
            for i in 0..tiles {
                self.world.spawn((
                    parallax,
                    MapPosition::new(i as f32 * tile_width, y),
                    Sprite::new(key, tile_width, tile_height),
                    z,
                ));
            }
        }
    }

    fn spawn_bird(&mut self) {
        let playfield = self.playfield();
        let settings = self.settings();
        let (frames, (width, height)) = {
            let store = self.store.borrow();
            (
                store.bird_frame_count,
                store.texture_size("bird0").unwrap_or(FALLBACK_BIRD),
            )
        };
        let home_y = playfield.height * 0.4;
        let mut rigidbody = RigidBody::with_gravity(settings.gravity, settings.max_speed);
        rigidbody.freeze();
        self.world.spawn((
            Bird::new(home_y).with_frames(frames),
            MapPosition::new(playfield.bird_x, home_y),
            rigidbody,
            bird_collider(width, height),
            Sprite::new("bird0", width, height),
            ZIndex::BIRD,
        ));
    }

    fn music_cue(&self, event: &str, volume: f32) {
        self.events.emit_global(
            event,
            EventData::Sound {
                id: BGM.to_string(),
                volume,
            },
        );
    }
}

impl Level for EndlessForest {
    fn setup(&mut self) {
        if self.destroyed {
            return;
        }
        let catalog = self.tree_catalog();
        self.world.insert_resource(catalog);
        self.spawn_layers();
        self.spawn_bird();
        let volume = self.store.borrow().bgm_volume;
        self.music_cue(AUDIO_MUSIC_PLAY, volume);
        info!("{} ready", LEVEL_NAME);
    }

    fn update(&mut self, delta: f32) {
        if self.destroyed {
            return;
        }
        let (flap, sfx_volume) = {
            let store = self.store.borrow();
            (store.input.flap, store.sfx_volume)
        };
        if flap {
            self.world.resource_mut::<FlapInput>().pressed = true;
        }
        update_world_time(&mut self.world, delta);
        self.schedule.run(&mut self.world);

        let messages: Vec<LevelMessage> = self
            .world
            .resource_mut::<Messages<LevelMessage>>()
            .drain()
            .collect();
        for message in messages {
            let name = message.event_name();
            match message {
                LevelMessage::Sfx(id) => self.events.emit_global(
                    AUDIO_SFX,
                    EventData::Sound {
                        id,
                        volume: sfx_volume,
                    },
                ),
                LevelMessage::Passed(entity)
                | LevelMessage::FirstFlap(entity)
                | LevelMessage::Died(entity) => {
                    if let Some(name) = name {
                        self.events.emit(name, EventData::Entity(entity));
                    }
                }
            }
        }
    }

    fn update_settings(&mut self, settings: &Settings) {
        let settings = settings.clamped();
        self.world.insert_resource(settings);
        let mut birds = self.world.query_filtered::<&mut RigidBody, With<Bird>>();
        for mut rigidbody in birds.iter_mut(&mut self.world) {
            rigidbody.set_force_value(GRAVITY, Vector2::new(0.0, settings.gravity));
            rigidbody.max_speed = Some(settings.max_speed);
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_cue(AUDIO_MUSIC_VOLUME, volume);
    }

    fn container(&self) -> Container {
        Container {
            name: LEVEL_NAME.to_string(),
            z_index: 0,
        }
    }

    fn draw_list(&mut self) -> Vec<SpriteDraw> {
        let mut query = self.world.query::<(&Sprite, &MapPosition, &ZIndex)>();
        let mut list: Vec<SpriteDraw> = query
            .iter(&self.world)
            .map(|(sprite, position, z)| SpriteDraw {
                tex_key: sprite.tex_key.clone(),
                x: position.pos.x,
                y: position.pos.y,
                width: sprite.width,
                height: sprite.height,
                z: z.0,
            })
            .collect();
        list.sort_by_key(|draw| draw.z);
        list
    }

    fn events(&mut self) -> &mut ListenerRegistry<EventData> {
        &mut self.events
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.music_cue(AUDIO_MUSIC_STOP, 0.0);
        self.events.destroy();
        self.world.clear_entities();
        self.destroyed = true;
        info!("{} destroyed", LEVEL_NAME);
    }
}
