//! Asynchronous asset loading.
//!
//! The game registers `(key, path)` pairs with an [`AssetLoader`], starts it
//! once and then polls it every frame. When loading finishes, `poll` yields
//! the [`Resources`] map exactly once; until then it yields `None`.
//!
//! [`ThreadedLoader`] reads and parses files on a background thread and
//! reports back over a `crossbeam_channel`. Only file I/O and parsing happen
//! there; GPU textures are created later on the main thread.
//!
//! File kinds are chosen by extension:
//! - `.json` – TexturePacker sprite sheet ([`SpriteSheet`])
//! - `.tsx` – Tiled XML tileset ([`Tileset`]); `.tsj`, its JSON export
//! - `.wav`, `.ogg`, `.mp3`, `.flac` – sound file (only checked to exist)

use crate::resources::spritesheet::SpriteSheet;
use crate::resources::tiled::Tileset;
use crossbeam_channel::{Receiver, TryRecvError, bounded};
use log::{debug, info};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

/// One loaded asset.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    SpriteSheet(SpriteSheet),
    Sound(PathBuf),
    Tileset(Tileset),
}

/// Loaded assets by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resources {
    map: FxHashMap<String, Resource>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, resource: Resource) {
        self.map.insert(key.into(), resource);
    }

    pub fn get(&self, key: &str) -> Option<&Resource> {
        self.map.get(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Sprite sheet by key; error if missing or of another kind.
    pub fn sprite_sheet(&self, key: &str) -> Result<&SpriteSheet, String> {
        match self.map.get(key) {
            Some(Resource::SpriteSheet(sheet)) => Ok(sheet),
            Some(_) => Err(format!("Resource '{}' is not a sprite sheet", key)),
            None => Err(format!("Missing sprite sheet '{}'", key)),
        }
    }

    /// Sound file path by key; error if missing or of another kind.
    pub fn sound(&self, key: &str) -> Result<&Path, String> {
        match self.map.get(key) {
            Some(Resource::Sound(path)) => Ok(path),
            Some(_) => Err(format!("Resource '{}' is not a sound", key)),
            None => Err(format!("Missing sound '{}'", key)),
        }
    }

    /// Tileset by key; error if missing or of another kind.
    pub fn tileset(&self, key: &str) -> Result<&Tileset, String> {
        match self.map.get(key) {
            Some(Resource::Tileset(tileset)) => Ok(tileset),
            Some(_) => Err(format!("Resource '{}' is not a tileset", key)),
            None => Err(format!("Missing tileset '{}'", key)),
        }
    }
}

/// Something that can load a batch of named assets asynchronously.
pub trait AssetLoader {
    /// Queue an asset. Ignored once loading has started.
    fn add(&mut self, key: &str, path: PathBuf);
    /// Start loading everything queued so far.
    fn load(&mut self);
    /// Non-blocking completion check. Returns the outcome exactly once.
    fn poll(&mut self) -> Option<Result<Resources, String>>;
}

/// Read and parse one asset file.
pub fn load_resource(path: &Path) -> Result<Resource, String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            SpriteSheet::from_json_str(&text, base)
                .map(Resource::SpriteSheet)
                .map_err(|e| format!("{:?}: {}", path, e))
        }
        "tsx" | "tsj" => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;
            let tileset = if extension == "tsx" {
                Tileset::from_tsx_str(&text)
            } else {
                Tileset::from_tsj_str(&text)
            };
            tileset
                .map(Resource::Tileset)
                .map_err(|e| format!("{:?}: {}", path, e))
        }
        "wav" | "ogg" | "mp3" | "flac" => {
            if path.is_file() {
                Ok(Resource::Sound(path.to_path_buf()))
            } else {
                Err(format!("Sound file {:?} not found", path))
            }
        }
        other => Err(format!("Unsupported asset type '{}' for {:?}", other, path)),
    }
}

/// Load every queued entry, stopping at the first failure.
pub fn load_all(entries: &[(String, PathBuf)]) -> Result<Resources, String> {
    let mut resources = Resources::new();
    for (key, path) in entries {
        debug!("loading '{}' from {:?}", key, path);
        let resource = load_resource(path).map_err(|e| format!("Asset '{}': {}", key, e))?;
        resources.insert(key.clone(), resource);
    }
    Ok(resources)
}

/// Loader that does its work on a background thread.
#[derive(Default)]
pub struct ThreadedLoader {
    queue: Vec<(String, PathBuf)>,
    rx: Option<Receiver<Result<Resources, String>>>,
    handle: Option<JoinHandle<()>>,
    started: bool,
}

impl ThreadedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued entries.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl AssetLoader for ThreadedLoader {
    fn add(&mut self, key: &str, path: PathBuf) {
        if self.started {
            log::warn!("Loader already started; '{}' ignored", key);
            return;
        }
        self.queue.push((key.to_string(), path));
    }

    fn load(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let entries = self.queue.clone();
        let (tx, rx) = bounded(1);
        info!("Loading {} assets", entries.len());
        self.handle = Some(std::thread::spawn(move || {
            let _ = tx.send(load_all(&entries));
        }));
        self.rx = Some(rx);
    }

    fn poll(&mut self) -> Option<Result<Resources, String>> {
        let rx = self.rx.as_ref()?;
        let outcome = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err("Loader thread exited without a result".into()),
        };
        self.rx = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "endlessforest-loader-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn wait(loader: &mut ThreadedLoader) -> Result<Resources, String> {
        let start = Instant::now();
        loop {
            if let Some(outcome) = loader.poll() {
                return outcome;
            }
            assert!(start.elapsed() < Duration::from_secs(5), "loader timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn loads_each_kind_by_extension() {
        let dir = scratch_dir("kinds");
        std::fs::write(
            dir.join("trees.json"),
            r#"{"frames": {"completeTree1.png": {"frame": {"x": 0, "y": 0, "w": 10, "h": 20}}}, "meta": {"image": "trees.png"}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("trees.tsx"),
            r#"<tileset name="trees"><tile id="0"><objectgroup><object x="1" y="2" width="3" height="4"/></objectgroup></tile></tileset>"#,
        )
        .unwrap();
        std::fs::write(dir.join("extra.tsj"), r#"{"tiles": [{"id": 0}]}"#).unwrap();
        std::fs::write(dir.join("bgm.wav"), b"RIFF").unwrap();

        let mut loader = ThreadedLoader::new();
        loader.add("treeSheet", dir.join("trees.json"));
        loader.add("tiled", dir.join("trees.tsx"));
        loader.add("tiledJson", dir.join("extra.tsj"));
        loader.add("birdBgm", dir.join("bgm.wav"));
        assert!(loader.poll().is_none());
        loader.load();

        let resources = wait(&mut loader).unwrap();
        assert_eq!(resources.len(), 4);
        assert_eq!(resources.sprite_sheet("treeSheet").unwrap().image, dir.join("trees.png"));
        assert_eq!(resources.tileset("tiled").unwrap().tiles[0].len(), 1);
        assert_eq!(resources.tileset("tiledJson").unwrap().tiles, vec![Vec::new()]);
        assert_eq!(resources.sound("birdBgm").unwrap(), dir.join("bgm.wav"));
        assert!(resources.sound("tiled").is_err());

        // result is handed out once
        assert!(loader.poll().is_none());
    }

    #[test]
    fn missing_file_fails_the_batch() {
        let dir = scratch_dir("missing");
        let mut loader = ThreadedLoader::new();
        loader.add("swoosh1", dir.join("nope.wav"));
        loader.load();
        let err = wait(&mut loader).unwrap_err();
        assert!(err.contains("swoosh1"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_resource(Path::new("level.xml")).is_err());
    }

    #[test]
    fn entries_added_after_start_are_ignored() {
        let mut loader = ThreadedLoader::new();
        loader.load();
        loader.add("late", PathBuf::from("late.wav"));
        assert_eq!(loader.queued(), 0);
    }
}
