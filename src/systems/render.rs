//! Drawing with Raylib.
//!
//! [`render_stage`] walks the stage in order: text nodes are drawn directly,
//! level containers are replaced by the level's sprites. [`render_panel`]
//! draws the imgui settings panel on top and hands back its edits.

use raylib::prelude::*;

use crate::display::{Node, Stage};
use crate::gui::{PanelFrame, PanelValues, SettingsPanel};
use crate::levels::{Level, SpriteDraw};
use crate::resources::store::Store;
use crate::resources::texturestore::TextureStore;

const BACKGROUND: Color = Color::new(0xdd, 0xdd, 0xdd, 0xff);

/// Upload every atlas image the store references.
pub fn preload_textures(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    store: &Store,
    textures: &mut TextureStore,
) {
    for region in store.texture_map.values() {
        textures.ensure(rl, thread, &region.image);
    }
}

fn draw_sprites(
    d: &mut RaylibDrawHandle,
    sprites: &[SpriteDraw],
    store: &Store,
    textures: &TextureStore,
) {
    for sprite in sprites {
        let Some(region) = store.texture_map.get(&sprite.tex_key) else {
            continue;
        };
        let Some(texture) = textures.get(&region.image) else {
            continue;
        };
        let src = Rectangle {
            x: region.rect.x,
            y: region.rect.y,
            width: region.rect.w,
            height: region.rect.h,
        };
        let dest = Rectangle {
            x: sprite.x,
            y: sprite.y,
            width: sprite.width,
            height: sprite.height,
        };
        d.draw_texture_pro(texture, src, dest, Vector2::zero(), 0.0, Color::WHITE);
    }
}

pub fn render_stage(
    d: &mut RaylibDrawHandle,
    stage: &Stage,
    level: Option<&mut (dyn Level + 'static)>,
    store: &Store,
    textures: &TextureStore,
) {
    d.clear_background(BACKGROUND);
    let sprites = level.map(|level| level.draw_list()).unwrap_or_default();
    for (_, node) in stage.children() {
        match node {
            Node::Container(_) => draw_sprites(d, &sprites, store, textures),
            Node::Text(text) if text.visible => {
                let x = text.position.x as i32;
                let y = text.position.y as i32;
                let size = text.font_size as i32;
                // drop shadow
                d.draw_text(&text.text, x + 4, y + 4, size, Color::new(0, 0, 0, 120));
                d.draw_text(&text.text, x, y, size, Color::WHITE);
            }
            Node::Text(_) => {}
        }
    }
}

/// Draw the settings panel through raylib's imgui bridge.
///
/// imgui skips a frame while its clock is not running yet; nothing is drawn
/// and no edits are reported then.
pub fn render_panel(
    d: &mut RaylibDrawHandle,
    panel: &SettingsPanel,
    values: &PanelValues,
) -> PanelFrame {
    let Some(ui) = d.begin_imgui() else {
        return PanelFrame::default();
    };
    panel.draw(&ui, values)
}
