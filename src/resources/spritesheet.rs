//! TexturePacker sprite sheet descriptions.
//!
//! Sheets are JSON files next to their atlas image. Both TexturePacker
//! layouts are accepted: `"frames"` as an object keyed by frame name (hash)
//! or as an array of objects carrying a `"filename"` (array).
//!
//! Only the frame rectangle and the atlas image are kept; trimming data is
//! ignored and rotated frames are logged and used as-is.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Pixel rectangle of a frame inside its atlas.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A frame resolved to the image that contains it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRegion {
    pub image: PathBuf,
    pub rect: FrameRect,
}

#[derive(Deserialize)]
struct RawFrame {
    frame: FrameRect,
    #[serde(default)]
    rotated: bool,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrames {
    Hash(BTreeMap<String, RawFrame>),
    Array(Vec<RawFrame>),
}

#[derive(Deserialize)]
struct RawMeta {
    image: String,
}

#[derive(Deserialize)]
struct RawSheet {
    frames: RawFrames,
    meta: RawMeta,
}

/// Parsed sprite sheet: atlas image path plus named frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub image: PathBuf,
    frames: BTreeMap<String, FrameRect>,
}

impl SpriteSheet {
    /// Parse sheet JSON. The atlas image path is resolved against `base_dir`.
    pub fn from_json_str(text: &str, base_dir: &Path) -> Result<Self, String> {
        let raw: RawSheet =
            serde_json::from_str(text).map_err(|e| format!("Invalid sprite sheet: {}", e))?;

        let entries: Vec<(String, RawFrame)> = match raw.frames {
            RawFrames::Hash(map) => map.into_iter().collect(),
            RawFrames::Array(list) => list
                .into_iter()
                .map(|f| {
                    f.filename
                        .clone()
                        .map(|name| (name, f))
                        .ok_or_else(|| "Sprite sheet frame without filename".to_string())
                })
                .collect::<Result<_, _>>()?,
        };

        let mut frames = BTreeMap::new();
        for (name, frame) in entries {
            if frame.rotated {
                warn!("Frame '{}' is rotated in its atlas; drawing it unrotated", name);
            }
            frames.insert(name, frame.frame);
        }

        Ok(SpriteSheet {
            image: base_dir.join(raw.meta.image),
            frames,
        })
    }

    /// Build a sheet directly from frames.
    pub fn from_frames(
        image: impl Into<PathBuf>,
        frames: impl IntoIterator<Item = (String, FrameRect)>,
    ) -> Self {
        SpriteSheet {
            image: image.into(),
            frames: frames.into_iter().collect(),
        }
    }

    /// Frame rectangle by name.
    pub fn frame(&self, name: &str) -> Option<&FrameRect> {
        self.frames.get(name)
    }

    /// Frame resolved against this sheet's image.
    pub fn region(&self, name: &str) -> Option<TextureRegion> {
        self.frame(name).map(|rect| TextureRegion {
            image: self.image.clone(),
            rect: *rect,
        })
    }

    /// Frame names in lexical order.
    pub fn frame_names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hash_layout() {
        let json = r#"{
            "frames": {
                "sky.png": {"frame": {"x": 0, "y": 0, "w": 1280, "h": 720}, "rotated": false, "trimmed": false},
                "foreground_tile.png": {"frame": {"x": 0, "y": 720, "w": 256, "h": 96}}
            },
            "meta": {"image": "parallax.png", "size": {"w": 2048, "h": 1024}, "scale": "1"}
        }"#;
        let sheet = SpriteSheet::from_json_str(json, Path::new("assets/images/parallax")).unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.image, PathBuf::from("assets/images/parallax/parallax.png"));
        let tile = sheet.frame("foreground_tile.png").unwrap();
        assert_eq!((tile.y, tile.w, tile.h), (720.0, 256.0, 96.0));
        assert_eq!(
            sheet.frame_names().collect::<Vec<_>>(),
            vec!["foreground_tile.png", "sky.png"]
        );
    }

    #[test]
    fn parses_array_layout() {
        let json = r#"{
            "frames": [
                {"filename": "bird_1.png", "frame": {"x": 0, "y": 0, "w": 64, "h": 48}},
                {"filename": "bird_0.png", "frame": {"x": 64, "y": 0, "w": 64, "h": 48}}
            ],
            "meta": {"image": "bird.png"}
        }"#;
        let sheet = SpriteSheet::from_json_str(json, Path::new("")).unwrap();
        assert_eq!(
            sheet.frame_names().collect::<Vec<_>>(),
            vec!["bird_0.png", "bird_1.png"]
        );
        let region = sheet.region("bird_0.png").unwrap();
        assert_eq!(region.image, PathBuf::from("bird.png"));
        assert_eq!(region.rect.x, 64.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(SpriteSheet::from_json_str("{\"frames\": 3}", Path::new("")).is_err());
        let missing_name = r#"{"frames": [{"frame": {"x": 0, "y": 0, "w": 1, "h": 1}}], "meta": {"image": "a.png"}}"#;
        assert!(SpriteSheet::from_json_str(missing_name, Path::new("")).is_err());
    }
}
