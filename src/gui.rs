//! Settings panel.
//!
//! A small imgui window in the top-right corner: a (empty) "Module Select"
//! header, a frame-rate readout and a "Settings" header with sliders for the
//! level tunables and the volumes, an auto-bird checkbox and a "make it fast"
//! button.
//!
//! The panel never writes settings itself. [`SettingsPanel::draw`] turns the
//! widget edits of one frame into [`PanelChange`]s that the game controller
//! applies.

use crate::resources::settings::{
    FLAP_FORCE_RANGE, GRAVITY_RANGE, SPEED_RANGE, Settings, VOLUME_RANGE, Volumes,
};
use imgui::{Condition, TreeNodeFlags, Ui};
use log::warn;
use std::ops::RangeInclusive;

pub const PANEL_WIDTH: f32 = 260.0;
pub const PANEL_MARGIN: f32 = 10.0;
pub const PANEL_TITLE: &str = "Endless Forest";

/// What a control reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    FlapForce,
    Gravity,
    Speed,
    BgmVolume,
    SfxVolume,
    AutoBird,
    MakeItFast,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    Slider(RangeInclusive<f32>),
    Checkbox,
    Button,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub label: &'static str,
    pub binding: Binding,
    pub kind: ControlKind,
}

/// A collapsing header and the controls under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    pub name: &'static str,
    pub controls: Vec<Control>,
    /// Open the first time it is shown.
    pub open: bool,
}

/// Current values shown by the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelValues {
    pub settings: Settings,
    pub volumes: Volumes,
}

impl PanelValues {
    /// Slider value of a binding. Non-slider bindings read 0.
    pub fn value(&self, binding: Binding) -> f32 {
        match binding {
            Binding::FlapForce => self.settings.flap_force,
            Binding::Gravity => self.settings.gravity,
            Binding::Speed => self.settings.speed,
            Binding::BgmVolume => self.volumes.bgm,
            Binding::SfxVolume => self.volumes.sfx,
            Binding::AutoBird | Binding::MakeItFast => 0.0,
        }
    }

    pub fn flag(&self, binding: Binding) -> bool {
        match binding {
            Binding::AutoBird => self.settings.auto_bird,
            _ => false,
        }
    }
}

/// A user edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelChange {
    Set(Binding, f32),
    Toggle(Binding, bool),
    Press(Binding),
}

/// Outcome of drawing the panel for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelFrame {
    pub changes: Vec<PanelChange>,
    /// imgui claims the mouse; clicks must not reach the game.
    pub wants_mouse: bool,
}

pub struct SettingsPanel {
    pub folders: Vec<Folder>,
    pub fps_text: String,
    position: [f32; 2],
    destroyed: bool,
}

impl SettingsPanel {
    /// Panel anchored to the top-right corner of a `world_width` wide screen.
    pub fn new(world_width: f32) -> Self {
        let settings = Folder {
            name: "Settings",
            open: true,
            controls: vec![
                slider("flapForce", Binding::FlapForce, FLAP_FORCE_RANGE),
                slider("gravity", Binding::Gravity, GRAVITY_RANGE),
                slider("speed", Binding::Speed, SPEED_RANGE),
                slider("BGMVolume", Binding::BgmVolume, VOLUME_RANGE),
                slider("SFXVolume", Binding::SfxVolume, VOLUME_RANGE),
                Control {
                    label: "autoBird",
                    binding: Binding::AutoBird,
                    kind: ControlKind::Checkbox,
                },
                Control {
                    label: "makeItFast",
                    binding: Binding::MakeItFast,
                    kind: ControlKind::Button,
                },
            ],
        };
        SettingsPanel {
            folders: vec![
                Folder {
                    name: "Module Select",
                    controls: Vec::new(),
                    open: true,
                },
                settings,
            ],
            fps_text: "fps: -".to_string(),
            position: [world_width - PANEL_WIDTH - PANEL_MARGIN, PANEL_MARGIN],
            destroyed: false,
        }
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps_text = format!("fps: {:.0}", fps);
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    /// Build the panel's widgets inside the current imgui frame.
    ///
    /// The readout follows the first header; the remaining headers come
    /// after it.
    pub fn draw(&self, ui: &Ui, values: &PanelValues) -> PanelFrame {
        if self.destroyed {
            return PanelFrame::default();
        }
        let mut changes = Vec::new();
        ui.window(PANEL_TITLE)
            .position(self.position, Condition::FirstUseEver)
            .size([PANEL_WIDTH, 0.0], Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                for (index, folder) in self.folders.iter().enumerate() {
                    let flags = if folder.open {
                        TreeNodeFlags::DEFAULT_OPEN
                    } else {
                        TreeNodeFlags::empty()
                    };
                    if ui.collapsing_header(folder.name, flags) {
                        changes.extend(
                            folder
                                .controls
                                .iter()
                                .filter_map(|control| draw_control(ui, control, values)),
                        );
                    }
                    if index == 0 {
                        ui.text(&self.fps_text);
                    }
                }
            });
        PanelFrame {
            changes,
            wants_mouse: ui.io().want_capture_mouse,
        }
    }

    /// Remove every folder; the panel stops drawing and reacting. Terminal.
    pub fn destroy(&mut self) {
        if self.destroyed {
            warn!("Settings panel already destroyed");
            return;
        }
        self.folders.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

fn draw_control(ui: &Ui, control: &Control, values: &PanelValues) -> Option<PanelChange> {
    match &control.kind {
        ControlKind::Slider(range) => {
            let mut value = values.value(control.binding);
            let edited = ui.slider(control.label, *range.start(), *range.end(), &mut value);
            edited.then_some(PanelChange::Set(control.binding, value))
        }
        ControlKind::Checkbox => {
            let mut on = values.flag(control.binding);
            let edited = ui.checkbox(control.label, &mut on);
            edited.then_some(PanelChange::Toggle(control.binding, on))
        }
        ControlKind::Button => ui
            .button(control.label)
            .then_some(PanelChange::Press(control.binding)),
    }
}

fn slider(label: &'static str, binding: Binding, range: RangeInclusive<f32>) -> Control {
    Control {
        label,
        binding,
        kind: ControlKind::Slider(range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> PanelValues {
        PanelValues {
            settings: Settings {
                auto_bird: true,
                ..Settings::default()
            },
            volumes: Volumes::default(),
        }
    }

    #[test]
    fn folders_hold_the_expected_controls() {
        let panel = SettingsPanel::new(1280.0);
        let names: Vec<&str> = panel.folders.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Module Select", "Settings"]);
        assert!(panel.folders[0].controls.is_empty());

        let controls = &panel.folders[1].controls;
        let labels: Vec<&str> = controls.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                "flapForce",
                "gravity",
                "speed",
                "BGMVolume",
                "SFXVolume",
                "autoBird",
                "makeItFast"
            ]
        );
        assert_eq!(controls[0].kind, ControlKind::Slider(0.0..=50.0));
        assert_eq!(controls[1].kind, ControlKind::Slider(0.0..=1.5));
        assert_eq!(controls[2].kind, ControlKind::Slider(0.0..=30.0));
        assert_eq!(controls[4].kind, ControlKind::Slider(0.0..=100.0));
        assert_eq!(controls[5].kind, ControlKind::Checkbox);
        assert_eq!(controls[6].kind, ControlKind::Button);
        assert_eq!(panel.position(), [1280.0 - PANEL_WIDTH - PANEL_MARGIN, PANEL_MARGIN]);
    }

    #[test]
    fn values_read_their_bindings() {
        let v = values();
        assert_eq!(v.value(Binding::FlapForce), 11.0);
        assert_eq!(v.value(Binding::Gravity), 0.7);
        assert_eq!(v.value(Binding::BgmVolume), 25.0);
        assert_eq!(v.value(Binding::SfxVolume), 50.0);
        assert!(v.flag(Binding::AutoBird));
        assert!(!v.flag(Binding::Speed));
    }

    #[test]
    fn set_fps_formats_the_readout() {
        let mut panel = SettingsPanel::new(1280.0);
        assert_eq!(panel.fps_text, "fps: -");
        panel.set_fps(59.6);
        assert_eq!(panel.fps_text, "fps: 60");
    }

    // imgui keeps one global context, so every frame-building check lives
    // in this single test.
    #[test]
    fn drawing_without_input_changes_nothing() {
        let mut ctx = imgui::Context::create();
        ctx.set_ini_filename(None);
        ctx.io_mut().display_size = [1280.0, 720.0];
        ctx.fonts().build_rgba32_texture();

        let mut panel = SettingsPanel::new(1280.0);
        let ui = ctx.new_frame();
        let frame = panel.draw(ui, &values());
        ctx.render();
        assert!(frame.changes.is_empty());
        assert!(!frame.wants_mouse);

        panel.destroy();
        assert!(panel.is_destroyed());
        assert!(panel.folders.is_empty());
        let ui = ctx.new_frame();
        assert_eq!(panel.draw(ui, &values()), PanelFrame::default());
        ctx.render();
    }
}
