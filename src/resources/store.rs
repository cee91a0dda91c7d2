//! Session-wide shared state.
//!
//! A single [`Store`] is built in `main` and handed to the game controller,
//! which passes it on to every level it creates. It holds what several
//! components need to agree on: world size, normalized volumes, the asset
//! lookup maps filled once loading completes, this frame's input and the
//! global [`MessageBus`].
//!
//! The store lives for the whole session and is only ever touched from the
//! main thread.

use crate::components::boxcollider::BoxCollider;
use crate::events::emitter::MessageBus;
use crate::events::level::EventData;
use crate::resources::spritesheet::TextureRegion;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Shared handle to the [`Store`].
pub type SharedStore = Rc<RefCell<Store>>;

/// Player input sampled once per frame by the host loop.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// A flap was requested this frame.
    pub flap: bool,
}

pub struct Store {
    pub world_width: f32,
    pub world_height: f32,
    /// Music volume, 0..=1.
    pub bgm_volume: f32,
    /// Sound effect volume, 0..=1.
    pub sfx_volume: f32,
    /// Texture regions by logical name (`tree3`, `sky`, `bird0`, ...).
    pub texture_map: FxHashMap<String, TextureRegion>,
    /// Number of bird animation frames, stored as `bird0..birdN`.
    pub bird_frame_count: usize,
    /// Sound files by logical name (`swoosh1`, `crashTree`, ...).
    pub sfx_map: FxHashMap<String, PathBuf>,
    /// Tree collision boxes by tree texture name.
    pub tree_collider_map: FxHashMap<String, Vec<BoxCollider>>,
    pub input: FrameInput,
    pub message_bus: MessageBus<EventData>,
}

impl Store {
    pub fn new(world_width: f32, world_height: f32) -> Self {
        Store {
            world_width,
            world_height,
            bgm_volume: 0.0,
            sfx_volume: 0.0,
            texture_map: FxHashMap::default(),
            bird_frame_count: 0,
            sfx_map: FxHashMap::default(),
            tree_collider_map: FxHashMap::default(),
            input: FrameInput::default(),
            message_bus: MessageBus::new(),
        }
    }

    /// Wrap into the shared handle passed to components.
    pub fn shared(self) -> SharedStore {
        Rc::new(RefCell::new(self))
    }

    /// Size of a texture region, if the key is known.
    pub fn texture_size(&self, key: &str) -> Option<(f32, f32)> {
        self.texture_map
            .get(key)
            .map(|region| (region.rect.w, region.rect.h))
    }
}
