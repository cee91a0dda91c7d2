//! Bridge between the game and the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread,
//! then [`relay_audio_cues`] to connect it to the global message bus. Call
//! [`shutdown_audio`] during teardown to stop the thread and free audio
//! resources.
//!
//! Game code never talks to the bridge directly: it publishes audio cues
//! (see [`crate::events::level`]) and the relay turns them into
//! [`AudioCmd`]s.

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::events::emitter::MessageBus;
use crate::events::level::{
    AUDIO_LOAD, AUDIO_MUSIC_PLAY, AUDIO_MUSIC_STOP, AUDIO_MUSIC_VOLUME, AUDIO_SFX, AUDIO_UNLOAD,
    EventData,
};
use crate::systems::audio::audio_thread;
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, warn};

/// Channels and join handle of the audio thread.
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (game -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> game).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread running [`audio_thread`].
pub fn setup_audio() -> AudioBridge {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    }
}

/// Gracefully request shutdown of the audio thread and join it.
pub fn shutdown_audio(bridge: AudioBridge) {
    let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
    let _ = bridge.handle.join();
}

/// Log whatever the audio thread reported since the last call.
pub fn drain_audio_messages(bridge: &AudioBridge) {
    for msg in bridge.rx_msg.try_iter() {
        match msg {
            AudioMessage::MusicLoadFailed { id, error } | AudioMessage::FxLoadFailed { id, error } => {
                warn!("audio '{}' failed to load: {}", id, error)
            }
            AudioMessage::FxMissing { id } => warn!("sound effect '{}' is not loaded", id),
            other => debug!("audio: {:?}", other),
        }
    }
}

/// Translate an audio cue into the commands the audio thread understands.
pub fn audio_commands(event: &str, data: &EventData) -> Vec<AudioCmd> {
    match (event, data) {
        (AUDIO_LOAD, EventData::SoundFile { id, path, music }) => {
            let path = path.to_string_lossy().into_owned();
            if *music {
                vec![AudioCmd::LoadMusic { id: id.clone(), path }]
            } else {
                vec![AudioCmd::LoadFx { id: id.clone(), path }]
            }
        }
        (AUDIO_SFX, EventData::Sound { id, volume }) => vec![AudioCmd::PlayFx {
            id: id.clone(),
            vol: *volume,
        }],
        (AUDIO_MUSIC_PLAY, EventData::Sound { id, volume }) => vec![
            AudioCmd::VolumeMusic {
                id: id.clone(),
                vol: *volume,
            },
            AudioCmd::PlayMusic {
                id: id.clone(),
                looped: true,
            },
        ],
        (AUDIO_MUSIC_STOP, EventData::Sound { id, .. }) => {
            vec![AudioCmd::StopMusic { id: id.clone() }]
        }
        (AUDIO_MUSIC_VOLUME, EventData::Sound { id, volume }) => vec![AudioCmd::VolumeMusic {
            id: id.clone(),
            vol: *volume,
        }],
        (AUDIO_UNLOAD, _) => vec![AudioCmd::UnloadAll],
        _ => {
            warn!("audio cue '{}' with unexpected payload {:?}", event, data);
            Vec::new()
        }
    }
}

/// Subscribe to every audio cue on `bus` and forward it to `tx`.
///
/// The subscriptions last as long as the bus.
pub fn relay_audio_cues(bus: &MessageBus<EventData>, tx: Sender<AudioCmd>) {
    for event in [
        AUDIO_LOAD,
        AUDIO_SFX,
        AUDIO_MUSIC_PLAY,
        AUDIO_MUSIC_STOP,
        AUDIO_MUSIC_VOLUME,
        AUDIO_UNLOAD,
    ] {
        let tx = tx.clone();
        bus.on(event, move |data| {
            for cmd in audio_commands(event, data) {
                // Ignore send errors after shutdown
                let _ = tx.send(cmd);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn relay_forwards_cues_as_commands() {
        let bus = MessageBus::new();
        let (tx, rx) = unbounded();
        relay_audio_cues(&bus, tx);

        bus.emit(
            AUDIO_LOAD,
            &EventData::SoundFile {
                id: "swoosh1".into(),
                path: PathBuf::from("sounds/s1.wav"),
                music: false,
            },
        );
        bus.emit(
            AUDIO_SFX,
            &EventData::Sound {
                id: "swoosh1".into(),
                volume: 0.5,
            },
        );
        bus.emit(
            AUDIO_MUSIC_PLAY,
            &EventData::Sound {
                id: "bgm".into(),
                volume: 0.25,
            },
        );

        let cmds: Vec<AudioCmd> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                AudioCmd::LoadFx {
                    id: "swoosh1".into(),
                    path: "sounds/s1.wav".into()
                },
                AudioCmd::PlayFx {
                    id: "swoosh1".into(),
                    vol: 0.5
                },
                AudioCmd::VolumeMusic {
                    id: "bgm".into(),
                    vol: 0.25
                },
                AudioCmd::PlayMusic {
                    id: "bgm".into(),
                    looped: true
                },
            ]
        );
    }

    #[test]
    fn unload_needs_no_payload() {
        assert_eq!(
            audio_commands(AUDIO_UNLOAD, &EventData::None),
            vec![AudioCmd::UnloadAll]
        );
    }

    #[test]
    fn mismatched_payload_produces_nothing() {
        assert!(audio_commands(AUDIO_SFX, &EventData::None).is_empty());
    }
}
