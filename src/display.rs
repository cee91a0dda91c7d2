//! Minimal scene graph: the stage, its text nodes and level containers.
//!
//! The [`Stage`] is an ordered list of top-level nodes. Text nodes are owned
//! by the stage and edited in place through their [`NodeId`]; containers
//! are placeholders for a level's sprites, which the level itself provides
//! at draw time. Children are drawn in list order, so [`Stage::sort_children`]
//! must run after z-indices change.

use log::warn;
use raylib::ffi;
use raylib::prelude::Vector2;
use std::ffi::CString;

/// Handle to a node added to a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// A line of text in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    /// Top-left corner.
    pub position: Vector2,
    pub visible: bool,
    pub z_index: i32,
    pub font_size: f32,
}

impl Text {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Text {
            text: text.into(),
            position: Vector2 { x: 0.0, y: 0.0 },
            visible: true,
            z_index: 0,
            font_size,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vector2 { x, y };
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Place the text so it is horizontally centred in `width`.
    pub fn center_horizontally(&mut self, width: f32, measure: &dyn TextMeasure) {
        let measured = measure.measure(&self.text, self.font_size);
        self.position.x = (width - measured) / 2.0;
    }
}

/// Placeholder for the drawable content of a level.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub name: String,
    pub z_index: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(Text),
    Container(Container),
}

impl Node {
    pub fn z_index(&self) -> i32 {
        match self {
            Node::Text(text) => text.z_index,
            Node::Container(container) => container.z_index,
        }
    }
}

#[derive(Debug, Default)]
pub struct Stage {
    children: Vec<(NodeId, Node)>,
    next_id: u64,
    destroyed: bool,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. After [`destroy`](Self::destroy) the node is dropped
    /// and the returned id resolves to nothing.
    pub fn add_child(&mut self, node: Node) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        if self.destroyed {
            warn!("Stage destroyed; child ignored");
        } else {
            self.children.push((id, node));
        }
        id
    }

    /// Detach a node and hand it back.
    pub fn remove_child(&mut self, id: NodeId) -> Option<Node> {
        let index = self.children.iter().position(|(child, _)| *child == id)?;
        Some(self.children.remove(index).1)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.children.iter().any(|(child, _)| *child == id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.children
            .iter()
            .find(|(child, _)| *child == id)
            .map(|(_, node)| node)
    }

    pub fn text(&self, id: NodeId) -> Option<&Text> {
        match self.node(id)? {
            Node::Text(text) => Some(text),
            Node::Container(_) => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut Text> {
        self.children
            .iter_mut()
            .find(|(child, _)| *child == id)
            .and_then(|(_, node)| match node {
                Node::Text(text) => Some(text),
                Node::Container(_) => None,
            })
    }

    /// Stable sort by z-index; equal z keeps insertion order.
    pub fn sort_children(&mut self) {
        self.children.sort_by_key(|(_, node)| node.z_index());
    }

    /// Children in draw order.
    pub fn children(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.children.iter().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Drop every child. Terminal.
    pub fn destroy(&mut self) {
        self.children.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Width of a string as it would be drawn.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed advance per character; for headless use.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    /// Advance as a fraction of the font size.
    pub advance: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        MonospaceMeasure { advance: 0.5 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance
    }
}

/// Raylib's default font. Only valid while the window is open.
#[derive(Debug, Clone, Copy, Default)]
pub struct RaylibMeasure;

impl TextMeasure for RaylibMeasure {
    fn measure(&self, text: &str, font_size: f32) -> f32 {
        let Ok(c_text) = CString::new(text.as_bytes()) else {
            return 0.0;
        };
        unsafe { ffi::MeasureText(c_text.as_ptr(), font_size as i32) as f32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_stable_by_z() {
        let mut stage = Stage::new();
        let a = stage.add_child(Node::Text(Text::new("a", 10.0).with_z_index(5)));
        let b = stage.add_child(Node::Container(Container {
            name: "level".into(),
            z_index: 0,
        }));
        let c = stage.add_child(Node::Text(Text::new("c", 10.0).with_z_index(5)));
        stage.sort_children();
        let order: Vec<NodeId> = stage.children().map(|(id, _)| id).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn remove_child_detaches_only_that_node() {
        let mut stage = Stage::new();
        let a = stage.add_child(Node::Text(Text::new("a", 10.0)));
        let b = stage.add_child(Node::Text(Text::new("b", 10.0)));
        assert!(matches!(stage.remove_child(a), Some(Node::Text(_))));
        assert!(stage.remove_child(a).is_none());
        assert!(!stage.contains(a));
        assert_eq!(stage.text(b).unwrap().text, "b");
    }

    #[test]
    fn text_mut_edits_in_place() {
        let mut stage = Stage::new();
        let id = stage.add_child(Node::Text(Text::new("0", 100.0)));
        stage.text_mut(id).unwrap().text = "12".into();
        stage.text_mut(id).unwrap().visible = false;
        let text = stage.text(id).unwrap();
        assert_eq!(text.text, "12");
        assert!(!text.visible);
    }

    #[test]
    fn centering_uses_measured_width() {
        let mut text = Text::new("abcd", 10.0);
        text.center_horizontally(100.0, &MonospaceMeasure::default());
        // 4 chars * 10 * 0.5 = 20
        assert_eq!(text.position.x, 40.0);
    }

    #[test]
    fn destroyed_stage_rejects_children() {
        let mut stage = Stage::new();
        stage.add_child(Node::Text(Text::new("a", 10.0)));
        stage.destroy();
        assert!(stage.is_empty());
        let id = stage.add_child(Node::Text(Text::new("b", 10.0)));
        assert!(stage.text(id).is_none());
        assert!(stage.is_destroyed());
    }
}
