//! Level controller.
//!
//! [`Game`] owns the stage, the HUD texts, the settings panel and the active
//! level. Its lifecycle is
//! `Uninitialized → Loading → Ready → Running → (Ended → Running)*`:
//!
//! - [`Game::setup`] queues every asset with the loader, builds the panel
//!   and the HUD, and enters `Loading`.
//! - Each [`Game::update`] polls the loader until it reports. On success the
//!   results are indexed into the shared store, the level is created and
//!   wired up, and the controller is `Ready`. Until then `update` only
//!   samples the frame rate.
//! - From `Ready` on, `update` forwards the tick to the level. Level events
//!   drive the score and the HUD: `entity.passed` scores, `entity.firstflap`
//!   swaps the title for the score, `entity.die` resets both.
//!
//! A failed load is logged and leaves the controller in `Loading`.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::display::{Node, NodeId, Stage, Text, TextMeasure};
use crate::events::emitter::ListenerRegistry;
use crate::events::level::{
    AUDIO_LOAD, AUDIO_UNLOAD, ENTITY_DIE, ENTITY_FIRST_FLAP, ENTITY_PASSED, EventData,
};
use crate::gui::{Binding, PanelChange, PanelValues, SettingsPanel};
use crate::levels::{Level, LevelFactory};
use crate::resources::gameconfig::GameConfig;
use crate::resources::loader::{AssetLoader, Resources};
use crate::resources::settings::{
    FLAP_FORCE_RANGE, GRAVITY_RANGE, SPEED_RANGE, Settings, VOLUME_RANGE, Volumes, clamp,
};
use crate::resources::spritesheet::{SpriteSheet, TextureRegion};
use crate::resources::store::SharedStore;

pub const TITLE_TEXT: &str = "Flap to begin!";
pub const TITLE_FONT_SIZE: f32 = 72.0;
pub const SCORE_FONT_SIZE: f32 = 100.0;
pub const HUD_Z: i32 = 999;
/// How often the frame-rate readout refreshes.
pub const FPS_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Loader keys and paths relative to the asset root.
pub const ASSETS: [(&str, &str); 11] = [
    ("tiled", "images/trees/trees.tsx"),
    ("birdBgm", "sounds/bgm.wav"),
    ("swoosh1", "sounds/Swoosh_Swipe-Thick_01.wav"),
    ("swoosh2", "sounds/Swoosh_Swipe-Thick_02.wav"),
    ("swoosh3", "sounds/Swoosh_Swipe-Thick_03.wav"),
    ("crashGround", "sounds/collision_paper_soft_02.wav"),
    ("crashTree", "sounds/collision_hallow_01.wav"),
    ("birdSheet", "images/bird/bird_packed.json"),
    ("parallaxSheet", "images/parallax/parallax.json"),
    ("treeSheet", "images/trees/trees.json"),
    ("clutterSheet", "images/clutter/clutter.json"),
];

/// Sounds: loader key, store id, streamed as music.
pub const SOUNDS: [(&str, &str, bool); 6] = [
    ("swoosh1", "swoosh1", false),
    ("swoosh2", "swoosh2", false),
    ("swoosh3", "swoosh3", false),
    ("crashGround", "crashGround", false),
    ("crashTree", "crashTree", false),
    ("birdBgm", "endlessForestBGM", true),
];

/// Background layers: store key, frame in the parallax sheet.
pub const PARALLAX_FRAMES: [(&str, &str); 5] = [
    ("sky", "sky.png"),
    ("farTrees", "furthest_trees.png"),
    ("nearTrees", "nearest_trees.png"),
    ("backgroundBushes", "background_bushes.png"),
    ("foregroundTile", "foreground_tile.png"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Uninitialized,
    Loading,
    Ready,
    Running,
    Ended,
}

/// Score and HUD texts, shared with the level event handlers.
pub struct Hud {
    pub score: u32,
    pub state: LevelState,
    title: Option<NodeId>,
    score_text: Option<NodeId>,
    stage: Rc<RefCell<Stage>>,
    world_width: f32,
    measure: Rc<dyn TextMeasure>,
}

impl Hud {
    fn new(stage: Rc<RefCell<Stage>>, world_width: f32, measure: Rc<dyn TextMeasure>) -> Self {
        Hud {
            score: 0,
            state: LevelState::Uninitialized,
            title: None,
            score_text: None,
            stage,
            world_width,
            measure,
        }
    }

    pub fn title(&self) -> Option<NodeId> {
        self.title
    }

    pub fn score_text(&self) -> Option<NodeId> {
        self.score_text
    }

    /// Add the title and score texts to the stage.
    fn build(&mut self, world_height: f32) {
        let y = world_height / 10.0;
        let mut title = Text::new(TITLE_TEXT, TITLE_FONT_SIZE)
            .with_z_index(HUD_Z)
            .with_position(0.0, y);
        title.center_horizontally(self.world_width, self.measure.as_ref());
        let mut score = Text::new("0", SCORE_FONT_SIZE)
            .with_z_index(HUD_Z)
            .with_position(0.0, y)
            .with_visible(false);
        score.center_horizontally(self.world_width, self.measure.as_ref());

        let mut stage = self.stage.borrow_mut();
        self.title = Some(stage.add_child(Node::Text(title)));
        self.score_text = Some(stage.add_child(Node::Text(score)));
    }

    fn set_visible(&self, id: Option<NodeId>, visible: bool) {
        let Some(id) = id else {
            return;
        };
        if let Some(text) = self.stage.borrow_mut().text_mut(id) {
            text.visible = visible;
        }
    }

    fn refresh_score(&self) {
        let Some(id) = self.score_text else {
            return;
        };
        let mut stage = self.stage.borrow_mut();
        if let Some(text) = stage.text_mut(id) {
            text.text = self.score.to_string();
            text.center_horizontally(self.world_width, self.measure.as_ref());
        }
    }

    /// Score zero, score hidden, title shown.
    pub fn reset(&mut self) {
        self.score = 0;
        self.refresh_score();
        self.set_visible(self.score_text, false);
        self.set_visible(self.title, true);
    }

    pub fn on_passed(&mut self) {
        self.score += 1;
        self.refresh_score();
    }

    pub fn on_first_flap(&mut self) {
        self.set_visible(self.title, false);
        self.set_visible(self.score_text, true);
        self.state = LevelState::Running;
    }

    pub fn on_died(&mut self) {
        self.reset();
        self.state = LevelState::Ended;
    }
}

/// Samples the frame rate at a fixed interval from the last frame time.
#[derive(Debug)]
pub struct FpsCounter {
    last_tick: Option<Instant>,
    last_sample: Option<Instant>,
    pub fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        FpsCounter {
            last_tick: None,
            last_sample: None,
            fps: 0.0,
        }
    }
}

impl FpsCounter {
    /// Record a frame at `now`; returns a new reading when one is due.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let due = self
            .last_sample
            .is_none_or(|sample| now.duration_since(sample) > FPS_SAMPLE_INTERVAL);
        let mut reading = None;
        if due {
            if let Some(last) = self.last_tick {
                let frame_ms = now.duration_since(last).as_millis();
                if frame_ms > 0 {
                    self.fps = (1000.0 / frame_ms as f32).floor();
                    reading = Some(self.fps);
                }
            }
            self.last_sample = Some(now);
        }
        self.last_tick = Some(now);
        reading
    }
}

pub struct Game {
    store: SharedStore,
    settings: Settings,
    volumes: Volumes,
    asset_root: PathBuf,
    world_height: f32,
    loader: Box<dyn AssetLoader>,
    factory: LevelFactory,
    level: Option<Box<dyn Level>>,
    level_node: Option<NodeId>,
    stage: Rc<RefCell<Stage>>,
    hud: Rc<RefCell<Hud>>,
    panel: Option<Rc<RefCell<SettingsPanel>>>,
    events: ListenerRegistry<EventData>,
    fps: FpsCounter,
    destroyed: bool,
}

impl Game {
    pub fn new(
        config: &GameConfig,
        store: SharedStore,
        loader: Box<dyn AssetLoader>,
        factory: LevelFactory,
        measure: Rc<dyn TextMeasure>,
    ) -> Self {
        let (world_width, world_height) = config.world_size();
        let stage = Rc::new(RefCell::new(Stage::new()));
        let hud = Rc::new(RefCell::new(Hud::new(stage.clone(), world_width, measure)));
        let bus = store.borrow().message_bus.clone();
        Game {
            store,
            settings: config.settings.clamped(),
            volumes: config.volumes,
            asset_root: config.asset_root.clone(),
            world_height,
            loader,
            factory,
            level: None,
            level_node: None,
            stage,
            hud,
            panel: None,
            events: ListenerRegistry::new(bus),
            fps: FpsCounter::default(),
            destroyed: false,
        }
    }

    pub fn setup(&mut self) {
        if self.state() != LevelState::Uninitialized {
            warn!("Game::setup called twice");
            return;
        }
        for (key, path) in ASSETS {
            self.loader.add(key, self.asset_root.join(path));
        }
        self.loader.load();

        {
            let mut store = self.store.borrow_mut();
            store.bgm_volume = self.volumes.bgm_normalized();
            store.sfx_volume = self.volumes.sfx_normalized();
        }

        let world_width = self.store.borrow().world_width;
        self.panel = Some(Rc::new(RefCell::new(SettingsPanel::new(world_width))));

        let mut hud = self.hud.borrow_mut();
        hud.build(self.world_height);
        hud.reset();
        hud.state = LevelState::Loading;
        info!("Loading assets from {:?}", self.asset_root);
    }

    /// Advance one frame; `delta` is in 60 Hz frames.
    pub fn update(&mut self, delta: f32) {
        if self.destroyed {
            return;
        }
        if let Some(fps) = self.fps.tick(Instant::now()) {
            if let Some(panel) = &self.panel {
                panel.borrow_mut().set_fps(fps);
            }
        }

        if self.state() == LevelState::Loading {
            if let Some(outcome) = self.loader.poll() {
                match outcome.and_then(|resources| self.on_loaded(&resources)) {
                    Ok(()) => info!("Level ready"),
                    Err(e) => error!("Asset loading failed, staying in Loading: {}", e),
                }
            }
        }

        match self.state() {
            LevelState::Uninitialized | LevelState::Loading => return,
            LevelState::Ready => self.hud.borrow_mut().state = LevelState::Running,
            LevelState::Running | LevelState::Ended => {}
        }
        if let Some(level) = self.level.as_mut() {
            level.update(delta);
        }
    }

    /// Index loaded assets and bring up the level.
    pub fn on_loaded(&mut self, resources: &Resources) -> Result<(), String> {
        self.map_audio(resources)?;
        self.map_textures(resources)?;
        self.map_tiled_data(resources)?;

        let mut level = (self.factory)(&self.settings, self.store.clone());
        level.setup();

        let hud = self.hud.clone();
        level.events().on(ENTITY_PASSED, move |_| hud.borrow_mut().on_passed());
        let hud = self.hud.clone();
        level
            .events()
            .on(ENTITY_FIRST_FLAP, move |_| hud.borrow_mut().on_first_flap());
        let hud = self.hud.clone();
        level.events().on(ENTITY_DIE, move |_| hud.borrow_mut().on_died());

        {
            let mut stage = self.stage.borrow_mut();
            self.level_node = Some(stage.add_child(Node::Container(level.container())));
            stage.sort_children();
        }
        self.level = Some(level);
        self.hud.borrow_mut().state = LevelState::Ready;
        Ok(())
    }

    /// Register sound files with the store and the audio thread.
    pub fn map_audio(&mut self, resources: &Resources) -> Result<(), String> {
        let mut loaded = Vec::with_capacity(SOUNDS.len());
        for (key, id, music) in SOUNDS {
            loaded.push((id, resources.sound(key)?.to_path_buf(), music));
        }
        {
            let mut store = self.store.borrow_mut();
            store.sfx_map.clear();
            for (id, path, _) in &loaded {
                store.sfx_map.insert(id.to_string(), path.clone());
            }
        }
        for (id, path, music) in loaded {
            self.events.emit_global(
                AUDIO_LOAD,
                EventData::SoundFile {
                    id: id.to_string(),
                    path,
                    music,
                },
            );
        }
        Ok(())
    }

    /// Index sprite sheet frames by logical name.
    pub fn map_textures(&mut self, resources: &Resources) -> Result<(), String> {
        let trees = resources.sprite_sheet("treeSheet")?;
        let clutter = resources.sprite_sheet("clutterSheet")?;
        let parallax = resources.sprite_sheet("parallaxSheet")?;
        let bird = resources.sprite_sheet("birdSheet")?;

        let mut entries: Vec<(String, Option<TextureRegion>, &str)> = Vec::new();
        for i in 1..=10 {
            let frame = format!("completeTree{}.png", i);
            entries.push((format!("tree{}", i), trees.region(&frame), "treeSheet"));
        }
        for i in 1..=11 {
            let frame = format!("groundClutter{}.png", i);
            entries.push((format!("clutter{}", i), clutter.region(&frame), "clutterSheet"));
        }
        for i in 1..=3 {
            let frame = format!("bush{}.png", i);
            entries.push((format!("bush{}", i), clutter.region(&frame), "clutterSheet"));
        }
        for (key, frame) in PARALLAX_FRAMES {
            entries.push((key.to_string(), parallax.region(frame), "parallaxSheet"));
        }

        let mut store = self.store.borrow_mut();
        store.texture_map.clear();
        for (key, region, sheet) in entries {
            match region {
                Some(region) => {
                    store.texture_map.insert(key, region);
                }
                None => warn!("'{}' has no frame for '{}'", sheet, key),
            }
        }
        let bird_frames = index_bird_frames(bird);
        store.bird_frame_count = bird_frames.len();
        store.texture_map.extend(bird_frames);
        debug!(
            "{} textures indexed, {} bird frames",
            store.texture_map.len(),
            store.bird_frame_count
        );
        Ok(())
    }

    /// Read tree colliders from the Tiled tileset.
    pub fn map_tiled_data(&mut self, resources: &Resources) -> Result<(), String> {
        let colliders = resources.tileset("tiled")?.tree_collider_map();
        self.store.borrow_mut().tree_collider_map = colliders;
        Ok(())
    }

    /// Push the whole settings record to the level.
    pub fn on_settings_changed(&mut self) {
        self.settings = self.settings.clamped();
        if let Some(level) = self.level.as_mut() {
            level.update_settings(&self.settings);
        }
    }

    /// Store normalized volumes and retune the music.
    pub fn on_volume_changed(&mut self) {
        let bgm = self.volumes.bgm_normalized();
        {
            let mut store = self.store.borrow_mut();
            store.bgm_volume = bgm;
            store.sfx_volume = self.volumes.sfx_normalized();
        }
        if let Some(level) = self.level.as_mut() {
            level.set_music_volume(bgm);
        }
    }

    pub fn make_it_fast(&mut self) {
        self.settings = self.settings.fast();
        self.on_settings_changed();
    }

    /// Replace the settings record, as the panel or a test would.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.on_settings_changed();
    }

    pub fn set_volumes(&mut self, volumes: Volumes) {
        self.volumes = volumes;
        self.on_volume_changed();
    }

    pub fn apply_panel_change(&mut self, change: PanelChange) {
        match change {
            PanelChange::Set(Binding::FlapForce, v) => {
                self.settings.flap_force = clamp(v, &FLAP_FORCE_RANGE);
                self.on_settings_changed();
            }
            PanelChange::Set(Binding::Gravity, v) => {
                self.settings.gravity = clamp(v, &GRAVITY_RANGE);
                self.on_settings_changed();
            }
            PanelChange::Set(Binding::Speed, v) => {
                self.settings.speed = clamp(v, &SPEED_RANGE);
                self.on_settings_changed();
            }
            PanelChange::Set(Binding::BgmVolume, v) => {
                self.volumes.bgm = clamp(v, &VOLUME_RANGE);
                self.on_volume_changed();
            }
            PanelChange::Set(Binding::SfxVolume, v) => {
                self.volumes.sfx = clamp(v, &VOLUME_RANGE);
                self.on_volume_changed();
            }
            PanelChange::Toggle(Binding::AutoBird, on) => {
                self.settings.auto_bird = on;
                self.on_settings_changed();
            }
            PanelChange::Press(Binding::MakeItFast) => self.make_it_fast(),
            other => debug!("Ignored panel change {:?}", other),
        }
    }

    /// Tear down panel, stage and level, in that order. Terminal.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(panel) = &self.panel {
            panel.borrow_mut().destroy();
        }
        {
            let mut stage = self.stage.borrow_mut();
            if let Some(node) = self.level_node.take() {
                stage.remove_child(node);
            }
            stage.destroy();
        }
        if let Some(level) = self.level.as_mut() {
            level.destroy();
        }
        self.events.emit_global(AUDIO_UNLOAD, EventData::None);
        self.events.destroy();
        self.destroyed = true;
        info!("Game destroyed");
    }

    pub fn state(&self) -> LevelState {
        self.hud.borrow().state
    }

    pub fn score(&self) -> u32 {
        self.hud.borrow().score
    }

    pub fn hud(&self) -> Rc<RefCell<Hud>> {
        self.hud.clone()
    }

    pub fn stage(&self) -> Rc<RefCell<Stage>> {
        self.stage.clone()
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn volumes(&self) -> Volumes {
        self.volumes
    }

    pub fn panel(&self) -> Option<Rc<RefCell<SettingsPanel>>> {
        self.panel.clone()
    }

    pub fn panel_values(&self) -> PanelValues {
        PanelValues {
            settings: self.settings,
            volumes: self.volumes,
        }
    }

    pub fn level_mut(&mut self) -> Option<&mut (dyn Level + 'static)> {
        self.level.as_deref_mut()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Every frame of the bird sheet, in name order, as `bird0..birdN`.
fn index_bird_frames(sheet: &SpriteSheet) -> Vec<(String, TextureRegion)> {
    sheet
        .frame_names()
        .filter_map(|name| sheet.region(name))
        .enumerate()
        .map(|(i, region)| (format!("bird{}", i), region))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MonospaceMeasure;

    fn hud() -> Hud {
        let stage = Rc::new(RefCell::new(Stage::new()));
        let mut hud = Hud::new(stage, 1280.0, Rc::new(MonospaceMeasure::default()));
        hud.build(720.0);
        hud
    }

    fn visible(hud: &Hud, id: Option<NodeId>) -> bool {
        hud.stage.borrow().text(id.unwrap()).unwrap().visible
    }

    #[test]
    fn hud_starts_with_title() {
        let mut hud = hud();
        hud.reset();
        assert!(visible(&hud, hud.title()));
        assert!(!visible(&hud, hud.score_text()));
        let stage = hud.stage.borrow();
        let title = stage.text(hud.title().unwrap()).unwrap();
        assert_eq!(title.position.y, 72.0);
        assert_eq!(title.z_index, HUD_Z);
    }

    #[test]
    fn score_text_recentres_as_it_grows() {
        let mut hud = hud();
        for _ in 0..10 {
            hud.on_passed();
        }
        assert_eq!(hud.score, 10);
        let stage = hud.stage.borrow();
        let text = stage.text(hud.score_text().unwrap()).unwrap();
        assert_eq!(text.text, "10");
        // 2 chars * 100 * 0.5 = 100 wide
        assert_eq!(text.position.x, (1280.0 - 100.0) / 2.0);
    }

    #[test]
    fn death_resets_score_and_texts() {
        let mut hud = hud();
        hud.on_first_flap();
        for _ in 0..7 {
            hud.on_passed();
        }
        hud.on_died();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.state, LevelState::Ended);
        assert!(visible(&hud, hud.title()));
        assert!(!visible(&hud, hud.score_text()));
        assert_eq!(hud.stage.borrow().text(hud.score_text().unwrap()).unwrap().text, "0");
    }

    #[test]
    fn fps_samples_at_interval() {
        let mut fps = FpsCounter::default();
        let t0 = Instant::now();
        assert_eq!(fps.tick(t0), None);
        assert_eq!(fps.tick(t0 + Duration::from_millis(16)), None);
        let reading = fps.tick(t0 + Duration::from_millis(216)).unwrap();
        // last frame lasted 200 ms
        assert_eq!(reading, 5.0);
    }

    #[test]
    fn bird_frames_are_numbered_in_name_order() {
        let rect = |x| crate::resources::spritesheet::FrameRect {
            x,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        let sheet = SpriteSheet::from_frames(
            "bird.png",
            [("b.png".to_string(), rect(10.0)), ("a.png".to_string(), rect(0.0))],
        );
        let seen: Vec<(String, f32)> = index_bird_frames(&sheet)
            .into_iter()
            .map(|(key, region)| (key, region.rect.x))
            .collect();
        assert_eq!(seen, vec![("bird0".to_string(), 0.0), ("bird1".to_string(), 10.0)]);
    }
}
