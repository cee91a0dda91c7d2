//! Collision boxes authored in the Tiled editor.
//!
//! The tree tileset is a Tiled XML tileset (`.tsx`). Every `tile` element may
//! hold an `objectgroup` whose `object`s are rectangles in tile-local pixels:
//!
//! ```xml
//! <tileset name="trees">
//!   <tile id="0">
//!     <objectgroup>
//!       <object id="1" x="140" y="310" width="40" height="260"/>
//!     </objectgroup>
//!   </tile>
//! </tileset>
//! ```
//!
//! The JSON export (`.tsj`, `tiles → objectgroup → objects`) is read into the
//! same [`Tileset`].
//!
//! Tile `i` (0-based, in file order) maps to the key `tree{i+1}`. A tile with
//! no objects yields an empty list. A missing rectangle attribute reads as 0,
//! as Tiled leaves out zero offsets and sizes. A present attribute that is
//! not a number rejects the whole tileset.

use crate::components::boxcollider::BoxCollider;
use log::debug;
use roxmltree::{Document, Node};
use rustc_hash::FxHashMap;
use serde_json::Value;

const RECT_ATTRIBUTES: [&str; 4] = ["x", "y", "width", "height"];

/// Collider lists of a tileset, one per tile in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tileset {
    pub tiles: Vec<Vec<BoxCollider>>,
}

impl Tileset {
    /// Parse a Tiled XML tileset.
    pub fn from_tsx_str(text: &str) -> Result<Self, String> {
        let document = Document::parse(text).map_err(|e| format!("Invalid tileset XML: {}", e))?;
        let root = document.root_element();
        if !root.has_tag_name("tileset") {
            return Err(format!(
                "Expected a <tileset> root, found <{}>",
                root.tag_name().name()
            ));
        }

        let mut tiles = Vec::new();
        for (index, tile) in root
            .descendants()
            .filter(|node| node.has_tag_name("tile"))
            .enumerate()
        {
            let colliders = tile
                .descendants()
                .filter(|node| node.has_tag_name("object"))
                .map(|object| xml_rect(object, index))
                .collect::<Result<Vec<_>, _>>()?;
            tiles.push(colliders);
        }
        Ok(Tileset { tiles })
    }

    /// Parse a Tiled JSON tileset.
    pub fn from_tsj_str(text: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| format!("Invalid tileset JSON: {}", e))?;
        Self::from_json(&value)
    }

    /// Walk `tiles → objectgroup → objects`.
    pub fn from_json(tileset: &Value) -> Result<Self, String> {
        let tiles = tileset
            .get("tiles")
            .and_then(Value::as_array)
            .ok_or_else(|| "Tileset has no 'tiles' array".to_string())?;

        let mut result = Vec::with_capacity(tiles.len());
        for (index, tile) in tiles.iter().enumerate() {
            let objects = tile
                .get("objectgroup")
                .and_then(|group| group.get("objects"))
                .and_then(Value::as_array);
            let colliders = objects
                .into_iter()
                .flatten()
                .map(|object| json_rect(object, index))
                .collect::<Result<Vec<_>, _>>()?;
            result.push(colliders);
        }
        Ok(Tileset { tiles: result })
    }

    /// Colliders keyed by tree texture name (`tree1`, `tree2`, ...).
    pub fn tree_collider_map(&self) -> FxHashMap<String, Vec<BoxCollider>> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, colliders)| (format!("tree{}", i + 1), colliders.clone()))
            .collect()
    }
}

fn number(text: &str, name: &str, tile: usize) -> Result<f32, String> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v as f32),
        _ => Err(format!(
            "Tile {}: collider attribute '{}' is not a number: {:?}",
            tile, name, text
        )),
    }
}

fn rect(values: [f32; 4]) -> BoxCollider {
    let [x, y, width, height] = values;
    BoxCollider::from_rect(x, y, width, height)
}

fn xml_rect(object: Node, tile: usize) -> Result<BoxCollider, String> {
    let mut values = [0.0; 4];
    for (slot, name) in values.iter_mut().zip(RECT_ATTRIBUTES) {
        match object.attribute(name) {
            Some(text) => *slot = number(text, name, tile)?,
            None => debug!("Tile {}: collider without '{}', using 0", tile, name),
        }
    }
    Ok(rect(values))
}

fn json_rect(object: &Value, tile: usize) -> Result<BoxCollider, String> {
    let mut values = [0.0; 4];
    for (slot, name) in values.iter_mut().zip(RECT_ATTRIBUTES) {
        *slot = match object.get(name) {
            None | Some(Value::Null) => {
                debug!("Tile {}: collider without '{}', using 0", tile, name);
                0.0
            }
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => v as f32,
                _ => return Err(format!("Tile {}: collider attribute '{}' is out of range", tile, name)),
            },
            Some(Value::String(s)) => number(s, name, tile)?,
            Some(other) => {
                return Err(format!(
                    "Tile {}: collider attribute '{}' is not a number: {}",
                    tile, name, other
                ));
            }
        };
    }
    Ok(rect(values))
}
