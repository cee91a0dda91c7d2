//! Game configuration.
//!
//! Settings loaded from an INI configuration file. Provides defaults for
//! safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! width = 1280
//! height = 720
//!
//! [window]
//! target_fps = 60
//!
//! [assets]
//! root = ./assets
//!
//! [settings]
//! speed = 12.5
//! max_speed = 20
//! flap_force = 11
//! gravity = 0.7
//! auto_bird = false
//!
//! [audio]
//! bgm = 25
//! sfx = 50
//! ```

use crate::resources::settings::{Settings, Volumes};
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_WORLD_WIDTH: u32 = 1280;
const DEFAULT_WORLD_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_ASSET_ROOT: &str = "./assets";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Startup configuration.
///
/// Stores the world size, asset location and the initial gameplay
/// [`Settings`] and [`Volumes`]. Values changed later through the settings
/// panel live in the game controller, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// World (and window) width in pixels.
    pub world_width: u32,
    /// World (and window) height in pixels.
    pub world_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Directory all asset paths are relative to.
    pub asset_root: PathBuf,
    /// Initial gameplay tunables.
    pub settings: Settings,
    /// Initial volumes (0..=100).
    pub volumes: Volumes,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            settings: Settings::default(),
            volumes: Volumes::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} world, fps={}, assets={:?}, {:?}, {:?}",
            self.world_width,
            self.world_height,
            self.target_fps,
            self.asset_root,
            self.settings,
            self.volumes
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [world] section
        if let Some(width) = config.getuint("world", "width").ok().flatten() {
            self.world_width = width as u32;
        }
        if let Some(height) = config.getuint("world", "height").ok().flatten() {
            self.world_height = height as u32;
        }

        // [window] section
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.asset_root = PathBuf::from(root);
        }

        // [settings] section
        let settings = &mut self.settings;
        if let Some(v) = config.getfloat("settings", "speed").ok().flatten() {
            settings.speed = v as f32;
        }
        if let Some(v) = config.getfloat("settings", "max_speed").ok().flatten() {
            settings.max_speed = v as f32;
        }
        if let Some(v) = config.getfloat("settings", "flap_force").ok().flatten() {
            settings.flap_force = v as f32;
        }
        if let Some(v) = config.getfloat("settings", "gravity").ok().flatten() {
            settings.gravity = v as f32;
        }
        if let Some(v) = config.getbool("settings", "auto_bird").ok().flatten() {
            settings.auto_bird = v;
        }
        self.settings = self.settings.clamped();

        // [audio] section
        if let Some(v) = config.getfloat("audio", "bgm").ok().flatten() {
            self.volumes.bgm = v as f32;
        }
        if let Some(v) = config.getfloat("audio", "sfx").ok().flatten() {
            self.volumes.sfx = v as f32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("world", "width", Some(self.world_width.to_string()));
        config.set("world", "height", Some(self.world_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set(
            "assets",
            "root",
            Some(self.asset_root.to_string_lossy().into_owned()),
        );

        let s = &self.settings;
        config.set("settings", "speed", Some(s.speed.to_string()));
        config.set("settings", "max_speed", Some(s.max_speed.to_string()));
        config.set("settings", "flap_force", Some(s.flap_force.to_string()));
        config.set("settings", "gravity", Some(s.gravity.to_string()));
        config.set("settings", "auto_bird", Some(s.auto_bird.to_string()));

        config.set("audio", "bgm", Some(self.volumes.bgm.to_string()));
        config.set("audio", "sfx", Some(self.volumes.sfx.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// World size as floats, the unit the level works in.
    pub fn world_size(&self) -> (f32, f32) {
        (self.world_width as f32, self.world_height as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_keep_defaults() {
        let mut config = GameConfig::new();
        config.load_from_str("[world]\nwidth = 800\n").unwrap();
        assert_eq!(config.world_width, 800);
        assert_eq!(config.world_height, DEFAULT_WORLD_HEIGHT);
        assert_eq!(config.settings, Settings::default());
    }

    #[test]
    fn settings_and_audio_sections_are_read() {
        let mut config = GameConfig::new();
        config
            .load_from_str(
                "[settings]\nspeed = 20\ngravity = 9\nauto_bird = true\n[audio]\nbgm = 10\n[assets]\nroot = /tmp/forest\n",
            )
            .unwrap();
        assert_eq!(config.settings.speed, 20.0);
        // clamped into range
        assert_eq!(config.settings.gravity, 1.5);
        assert!(config.settings.auto_bird);
        assert_eq!(config.volumes.bgm, 10.0);
        assert_eq!(config.volumes.sfx, 50.0);
        assert_eq!(config.asset_root, PathBuf::from("/tmp/forest"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = GameConfig::with_path("/definitely/not/here/config.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config, GameConfig::with_path("/definitely/not/here/config.ini"));
    }

    #[test]
    fn saved_file_loads_back() {
        let path = std::env::temp_dir().join(format!(
            "endlessforest-config-{}.ini",
            std::process::id()
        ));
        let mut config = GameConfig::with_path(&path);
        config.world_width = 1024;
        config.settings.auto_bird = true;
        config.settings.speed = 20.0;
        config.volumes.sfx = 80.0;
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
