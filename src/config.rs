/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Grid size and session length are not configurable.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::domain::difficulty::Difficulty;
use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
    /// `None` disables logging.
    pub log_file: Option<PathBuf>,
    /// Warning produced while loading, reported once logging is up.
    pub load_warning: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SoundConfig {
    pub enabled: bool,
    pub volume: u8, // 0..=100
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub whack: Vec<String>,
    pub pause: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    #[serde(default)]
    difficulty: Difficulty,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
    #[serde(default = "default_volume")]
    volume: u8,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_whack")]
    whack: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

const VOLUME_MAX: u8 = 100;

fn default_sound_enabled() -> bool { true }
fn default_volume() -> u8 { 50 }

fn default_whack() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }
fn default_log_file() -> String { "molewhack.log".into() }

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound {
            enabled: default_sound_enabled(),
            volume: default_volume(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            whack: default_whack(),
            pause: default_pause(),
            cancel: default_cancel(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: default_log_file(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        match find_and_parse(&search_dirs) {
            Ok(cfg) => GameConfig::from_toml(cfg),
            Err(e) => {
                let mut config = GameConfig::from_toml(TomlConfig::default());
                config.load_warning = Some(format!("{e}; using default settings"));
                config
            }
        }
    }

    /// Parse a config document. Missing keys take their defaults.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(cfg))
    }

    /// Log the deferred load warning, if any.
    pub fn report(&self) {
        if let Some(w) = &self.load_warning {
            warn!("{w}");
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let log_file = cfg.general.log_file.trim();
        GameConfig {
            difficulty: cfg.game.difficulty,
            sound: SoundConfig {
                enabled: cfg.sound.enabled,
                volume: cfg.sound.volume.min(VOLUME_MAX),
            },
            gamepad: GamepadConfig {
                whack: cfg.gamepad.whack,
                pause: cfg.gamepad.pause,
                cancel: cfg.gamepad.cancel,
            },
            log_file: if log_file.is_empty() { None } else { Some(PathBuf::from(log_file)) },
            load_warning: None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/molewhack)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/molewhack");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory
    let sys = PathBuf::from("/usr/share/molewhack");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First config.toml found wins. No file at all is not an error.
fn find_and_parse(search_dirs: &[PathBuf]) -> Result<TomlConfig, ConfigError> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return parse_file(&path);
        }
    }
    Ok(TomlConfig::default())
}

fn parse_file(path: &Path) -> Result<TomlConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str::<TomlConfig>(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let c = GameConfig::parse("").unwrap();
        assert_eq!(c.difficulty, Difficulty::Medium);
        assert!(c.sound.enabled);
        assert_eq!(c.sound.volume, 50);
        assert_eq!(c.gamepad.whack, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(c.log_file, Some(PathBuf::from("molewhack.log")));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let c = GameConfig::parse(
            r#"
            [game]
            difficulty = "hard"

            [sound]
            volume = 80
            "#,
        )
        .unwrap();
        assert_eq!(c.difficulty, Difficulty::Hard);
        assert!(c.sound.enabled);
        assert_eq!(c.sound.volume, 80);
        assert_eq!(c.gamepad.pause, vec!["Start".to_string()]);
    }

    #[test]
    fn volume_is_clamped() {
        let c = GameConfig::parse("[sound]\nvolume = 250\n").unwrap();
        assert_eq!(c.sound.volume, 100);
    }

    #[test]
    fn empty_log_file_disables_logging() {
        let c = GameConfig::parse("[general]\nlog_file = \"\"\n").unwrap();
        assert_eq!(c.log_file, None);
    }

    #[test]
    fn unknown_difficulty_is_an_error() {
        let err = GameConfig::parse("[game]\ndifficulty = \"nightmare\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_in_search_path_is_not_an_error() {
        let dirs = vec![PathBuf::from("/nonexistent/molewhack-test-dir")];
        let cfg = find_and_parse(&dirs).unwrap();
        assert!(cfg.sound.enabled);
    }
}
