//! Background audio thread backed by Raylib.
//!
//! [`audio_thread`] runs on its own OS thread, owns the Raylib audio device
//! and every `Music`/`Sound` handle, and processes
//! [`AudioCmd`](crate::events::audio::AudioCmd) messages, answering with
//! [`AudioMessage`](crate::events::audio::AudioMessage)s.
//!
//! Notes
//! - The thread is created once via [`crate::resources::audio::setup_audio`]
//!   and joined via [`crate::resources::audio::shutdown_audio`].
//! - Music streaming requires periodic `update_stream()` calls; this loop
//!   takes care of it while tracks are playing, and restarts looped tracks
//!   when they end.

use crate::events::audio::{AudioCmd, AudioMessage};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};

/// Entry point of the dedicated audio thread.
///
/// Blocks until it receives [`AudioCmd::Shutdown`], then unloads everything
/// and exits.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("Failed to initialize audio device: {}", e);
            return;
        }
    };

    info!("audio thread starting (id={:?})", std::thread::current().id());

    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut playing: FxHashSet<String> = FxHashSet::default();
    let mut looped: FxHashSet<String> = FxHashSet::default();
    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();

    'run: loop {
        // 1) Drain commands
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        debug!("music loaded id='{}' path='{}'", id, path);
                        musics.insert(id.clone(), music);
                        let _ = tx_evt.send(AudioMessage::MusicLoaded { id });
                    }
                    Err(e) => {
                        warn!("music load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_evt.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayMusic {
                    id,
                    looped: want_loop,
                } => {
                    if let Some(music) = musics.get(&id) {
                        debug!("music play id='{}' looped={}", id, want_loop);
                        music.seek_stream(0.0);
                        music.play_stream();
                        playing.insert(id.clone());
                        if want_loop {
                            looped.insert(id.clone());
                        } else {
                            looped.remove(&id);
                        }
                        let _ = tx_evt.send(AudioMessage::MusicPlayStarted { id });
                    }
                }
                AudioCmd::StopMusic { id } => {
                    if let Some(music) = musics.get(&id) {
                        debug!("music stop id='{}'", id);
                        music.stop_stream();
                        playing.remove(&id);
                        looped.remove(&id);
                        let _ = tx_evt.send(AudioMessage::MusicStopped { id });
                    }
                }
                AudioCmd::VolumeMusic { id, vol } => {
                    if let Some(music) = musics.get(&id) {
                        music.set_volume(vol);
                    }
                }
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_evt.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        warn!("fx load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_evt.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFx { id, vol } => {
                    if let Some(sound) = sounds.get(&id) {
                        sound.set_volume(vol);
                        sound.play();
                    } else {
                        let _ = tx_evt.send(AudioMessage::FxMissing { id });
                    }
                }
                AudioCmd::UnloadAll => {
                    musics.clear();
                    playing.clear();
                    looped.clear();
                    sounds.clear();
                    let _ = tx_evt.send(AudioMessage::UnloadedAll);
                }
                AudioCmd::Shutdown => {
                    info!("audio shutdown requested");
                    break 'run;
                }
            }
        }

        // 2) Pump streaming and restart looped tracks
        let mut ended: Vec<String> = Vec::new();
        for id in playing.iter() {
            if let Some(music) = musics.get(id) {
                if music.is_stream_playing() {
                    music.update_stream();
                } else if music.get_time_played() >= music.get_time_length() - 0.01 {
                    ended.push(id.clone());
                }
            }
        }
        for id in ended {
            match musics.get(&id) {
                Some(music) if looped.contains(&id) => {
                    music.seek_stream(0.0);
                    music.play_stream();
                }
                _ => {
                    playing.remove(&id);
                    let _ = tx_evt.send(AudioMessage::MusicStopped { id });
                }
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    } // 'run

    musics.clear();
    sounds.clear();
    info!("audio thread exiting (id={:?})", std::thread::current().id());
    // musics and sounds drop before `audio`
}

