//! GPU textures keyed by atlas image path.
//!
//! Sprite sheets are parsed on the loader thread, but textures can only be
//! created on the thread that owns the window. The store uploads each atlas
//! the first time something is drawn from it.

use log::{info, warn};
use raylib::prelude::{RaylibHandle, RaylibThread, Texture2D};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct TextureStore {
    map: FxHashMap<PathBuf, Texture2D>,
    failed: FxHashSet<PathBuf>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `image` if it is not resident yet. Failures are logged once and
    /// not retried.
    pub fn ensure(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, image: &Path) {
        if self.map.contains_key(image) || self.failed.contains(image) {
            return;
        }
        let Some(path) = image.to_str() else {
            warn!("Texture path {:?} is not valid UTF-8", image);
            self.failed.insert(image.to_path_buf());
            return;
        };
        match rl.load_texture(thread, path) {
            Ok(texture) => {
                info!("Loaded texture {:?}", image);
                self.map.insert(image.to_path_buf(), texture);
            }
            Err(e) => {
                warn!("Failed to load texture {:?}: {}", image, e);
                self.failed.insert(image.to_path_buf());
            }
        }
    }

    pub fn get(&self, image: &Path) -> Option<&Texture2D> {
        self.map.get(image)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
