use minifb::Key;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gba_dns::error::{ConfigError, ConfigResult};
use gba_dns::DnsConfig;

#[derive(Serialize, Deserialize)]
pub struct Settings {
    pub controls: Controls,
    pub display: Display,
    pub clock: Clock,
}

#[derive(Serialize, Deserialize)]
pub struct Controls {
    pub next_hour: String,
    pub next_minute: String,
    pub toggle_combat: String,
    pub cycle_map: String,
    pub toggle_fade: String,
    pub toggle_policy: String,
    pub pause_clock: String,
}

#[derive(Serialize, Deserialize)]
pub struct Display {
    pub scale: String,
}

#[derive(Serialize, Deserialize)]
pub struct Clock {
    pub start_hour: u8,
    pub start_minute: u8,
    /// Frames per in-game minute. 1 sweeps a full day in 24 seconds.
    pub frames_per_minute: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    NextHour,
    NextMinute,
    ToggleCombat,
    CycleMap,
    ToggleFade,
    TogglePolicy,
    PauseClock,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            controls: Controls {
                next_hour: "H".into(),
                next_minute: "M".into(),
                toggle_combat: "B".into(),
                cycle_map: "Tab".into(),
                toggle_fade: "F".into(),
                toggle_policy: "P".into(),
                pause_clock: "Space".into(),
            },
            display: Display {
                scale: "2x".into(),
            },
            clock: Clock {
                start_hour: 12,
                start_minute: 0,
                frames_per_minute: 1,
            },
        }
    }
}

impl Settings {
    fn settings_path() -> PathBuf {
        DnsConfig::config_path().with_file_name("preview.toml")
    }

    /// Preview settings from disk; defaults are written out on first run
    /// and used whenever the file can't be read.
    pub fn load() -> Self {
        let path = Self::settings_path();
        if !path.exists() {
            let settings = Settings::default();
            match settings.write_to(&path) {
                Ok(()) => tracing::info!("Wrote default preview settings to {}", path.display()),
                Err(e) => tracing::warn!("{}", e),
            }
            return settings;
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            tracing::warn!("{}; using default preview settings", e);
            Settings::default()
        })
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    fn write_to(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?).map_err(io_err)
    }

    pub fn scale(&self) -> minifb::Scale {
        match self.display.scale.as_str() {
            "1x" => minifb::Scale::X1,
            "2x" => minifb::Scale::X2,
            "4x" => minifb::Scale::X4,
            _ => minifb::Scale::X2,
        }
    }

    pub fn key_map(&self) -> Vec<(Key, Action)> {
        let pairs = [
            (&self.controls.next_hour, Action::NextHour),
            (&self.controls.next_minute, Action::NextMinute),
            (&self.controls.toggle_combat, Action::ToggleCombat),
            (&self.controls.cycle_map, Action::CycleMap),
            (&self.controls.toggle_fade, Action::ToggleFade),
            (&self.controls.toggle_policy, Action::TogglePolicy),
            (&self.controls.pause_clock, Action::PauseClock),
        ];
        pairs.iter().filter_map(|(name, action)| {
            key_name_to_minifb(name).map(|k| (k, *action))
        }).collect()
    }
}

/// Keys the preview can bind. Letters cover the defaults and their usual
/// alternatives; Escape is reserved for closing the window.
const BINDABLE_KEYS: &[(&str, Key)] = &[
    ("B", Key::B),
    ("C", Key::C),
    ("F", Key::F),
    ("H", Key::H),
    ("M", Key::M),
    ("N", Key::N),
    ("P", Key::P),
    ("T", Key::T),
    ("Up", Key::Up),
    ("Down", Key::Down),
    ("Left", Key::Left),
    ("Right", Key::Right),
    ("Enter", Key::Enter),
    ("Space", Key::Space),
    ("Tab", Key::Tab),
];

pub fn key_name_to_minifb(name: &str) -> Option<Key> {
    let key = BINDABLE_KEYS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, key)| key);
    if key.is_none() {
        tracing::warn!("Unknown key name in preview settings: '{}'", name);
    }
    key
}
