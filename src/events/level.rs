//! Level lifecycle events and audio cues.
//!
//! Levels run their gameplay inside a `bevy_ecs` world. Systems write
//! [`LevelMessage`]s; after each tick the level drains them and re-emits them
//! through its [`ListenerRegistry`](crate::events::emitter::ListenerRegistry)
//! under the names below, carrying an [`EventData`] payload.
//!
//! Audio is never called directly: levels and the controller publish audio
//! cues on the global bus and [`relay_audio_cues`] turns them into
//! [`AudioCmd`]s.
//!
//! [`relay_audio_cues`]: crate::resources::audio::relay_audio_cues
//! [`AudioCmd`]: crate::events::audio::AudioCmd

use bevy_ecs::message::Message;
use bevy_ecs::prelude::Entity;
use std::path::PathBuf;

/// An obstacle moved past the bird.
pub const ENTITY_PASSED: &str = "entity.passed";
/// The player flapped for the first time since the level (re)started.
pub const ENTITY_FIRST_FLAP: &str = "entity.firstflap";
/// The bird crashed.
pub const ENTITY_DIE: &str = "entity.die";

/// Global: load a sound file into the audio thread.
pub const AUDIO_LOAD: &str = "audio.load";
/// Global: play a one-shot sound effect.
pub const AUDIO_SFX: &str = "audio.sfx";
/// Global: start a looping music track.
pub const AUDIO_MUSIC_PLAY: &str = "audio.music.play";
/// Global: stop a music track.
pub const AUDIO_MUSIC_STOP: &str = "audio.music.stop";
/// Global: change the volume of a music track.
pub const AUDIO_MUSIC_VOLUME: &str = "audio.music.volume";
/// Global: release every loaded sound and track.
pub const AUDIO_UNLOAD: &str = "audio.unload";

/// Payload carried by every emitted event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    None,
    /// The entity the event is about.
    Entity(Entity),
    /// Sound effect or music cue; `volume` is normalized to 0..=1.
    Sound { id: String, volume: f32 },
    /// Sound file to register with the audio thread.
    SoundFile {
        id: String,
        path: PathBuf,
        music: bool,
    },
}

/// Messages written by level systems during a tick.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum LevelMessage {
    Passed(Entity),
    FirstFlap(Entity),
    Died(Entity),
    Sfx(String),
}

impl LevelMessage {
    /// Event name used when the message is re-emitted locally. Sound effects
    /// go to the global bus instead and return `None`.
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            LevelMessage::Passed(_) => Some(ENTITY_PASSED),
            LevelMessage::FirstFlap(_) => Some(ENTITY_FIRST_FLAP),
            LevelMessage::Died(_) => Some(ENTITY_DIE),
            LevelMessage::Sfx(_) => None,
        }
    }
}
