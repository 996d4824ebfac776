use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::exceptions::PaletteExceptions;
use crate::filters::FilterPolicy;
use crate::lighting::{self, LightingCell, LightingFadeMode};
use crate::tables::FilterTables;
use crate::time::{LightingWindow, PhaseThresholds};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DnsConfig {
    pub policy: FilterPolicy,
    pub thresholds: PhaseThresholds,
    pub filters: FilterTables,
    pub exceptions: PaletteExceptions,
    pub lighting: Lighting,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub window: LightingWindow,
    pub fade_mode: LightingFadeMode,
    pub cells: Vec<LightingCell>,
}

impl Default for DnsConfig {
    fn default() -> Self {
        DnsConfig {
            policy: FilterPolicy::Proportional,
            thresholds: PhaseThresholds::default(),
            filters: FilterTables::default(),
            exceptions: PaletteExceptions::default(),
            lighting: Lighting {
                window: LightingWindow::default(),
                fade_mode: LightingFadeMode::default(),
                cells: lighting::default_cells(),
            },
        }
    }
}

impl DnsConfig {
    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("gba_dns");
        path.push("config.toml");
        path
    }

    /// Loads the user config, falling back to the built-in tables on any error.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            let config = DnsConfig::default();
            if let Err(e) = config.write_to(&path) {
                tracing::warn!("Error writing default config to {}: {}", path.display(), e);
            } else {
                tracing::info!("Wrote default config to {}", path.display());
            }
            return config;
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                DnsConfig::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!("Loaded DNS config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: DnsConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> ConfigResult<()> {
        let io_err = |source| ConfigError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(io_err)
    }

    /// Rejects tables that would index out of bounds or address cells that don't exist.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.thresholds.is_ascending() {
            return Err(ConfigError::ThresholdsNotAscending(self.thresholds.as_array()));
        }
        self.filters.validate()?;
        for hour in [self.lighting.window.start_hour, self.lighting.window.end_hour] {
            if hour >= 24 {
                return Err(ConfigError::HourOutOfRange { hour });
            }
        }
        for cell in &self.lighting.cells {
            cell.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorDelta};
    use crate::exceptions::MapCategory;
    use crate::tables::FilterTable;

    #[test]
    fn test_default_config_is_valid() {
        DnsConfig::default().validate().unwrap();
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let config = DnsConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(DnsConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_hand_written_toml() {
        let text = r#"
policy = "subtractive"

[thresholds]
night_end = 5
dawn_end = 7
morning_end = 9
day_end = 17
sunset_end = 19
dusk_end = 21

[filters]
dawn = { stepped = { shift = 6, steps = [[8, 8, 0], [2, 4, 1]] } }
morning = { constant = [0, 0, 2] }
day = { constant = [0, 0, 0] }
sunset = { constant = [0, 4, 4] }
dusk = { constant = [4, 8, 4] }
night = { constant = [14, 14, 2] }

[exceptions]
overworld = [true, true, true, true, true, true, true, true, true, true, true, true, true, false, false, false,
             true, true, true, true, true, true, true, true, true, true, true, true, true, true, true, true]
combat = [false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, false,
          false, false, false, false, false, false, false, false, false, false, false, false, false, false, false, false]
map_categories = ["indoor", "secret_base"]
sprite_tags = [0xD6FF]

[lighting]
window = { start_hour = 20, end_hour = 6 }
fade_mode = "defer_to_unfaded"
cells = [{ bank = 2, index = 3, lit = [31, 31, 0] }]
"#;
        let config = DnsConfig::from_toml(text).unwrap();
        assert_eq!(config.policy, FilterPolicy::Subtractive);
        assert_eq!(config.thresholds.night_end, 5);
        assert_eq!(
            config.filters.dawn,
            FilterTable::stepped(6, &[ColorDelta::new(8, 8, 0), ColorDelta::new(2, 4, 1)])
        );
        assert_eq!(config.filters.night, FilterTable::Constant(ColorDelta::new(14, 14, 2)));
        assert_eq!(config.exceptions.map_categories, vec![MapCategory::Indoor, MapCategory::SecretBase]);
        assert_eq!(config.exceptions.sprite_tags, vec![0xD6FF]);
        assert!(!config.exceptions.combat.is_active(2));
        assert_eq!(config.lighting.fade_mode, LightingFadeMode::DeferToUnfaded);
        assert_eq!(config.lighting.cells, vec![LightingCell::new(2, 3, Color::new(31, 31, 0))]);
    }

    #[test]
    fn test_rejects_wide_channel() {
        #[derive(Debug, Deserialize)]
        struct Probe {
            #[allow(dead_code)]
            filter: ColorDelta,
        }
        assert!(toml::from_str::<Probe>("filter = [40, 12, 0]").is_err());
        assert!(toml::from_str::<Probe>("filter = [31, 12, 0]").is_ok());
    }

    #[test]
    fn test_rejects_long_overworld_mask() {
        let mut text = DnsConfig::default().to_toml().unwrap();
        let config: toml::Value = toml::from_str(&text).unwrap();
        let mut table = config.as_table().cloned().unwrap();
        let exceptions = table.get_mut("exceptions").and_then(|v| v.as_table_mut()).unwrap();
        let overworld = exceptions.get_mut("overworld").and_then(|v| v.as_array_mut()).unwrap();
        overworld.push(toml::Value::Boolean(true));
        text = toml::to_string(&table).unwrap();
        assert!(matches!(DnsConfig::from_toml(&text), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_rejects_descending_thresholds() {
        let mut config = DnsConfig::default();
        config.thresholds.sunset_end = 11;
        assert!(matches!(config.validate(), Err(ConfigError::ThresholdsNotAscending(_))));
    }

    #[test]
    fn test_rejects_bad_lighting_cell() {
        let mut config = DnsConfig::default();
        config.lighting.cells.push(LightingCell::new(3, 16, Color::BLACK));
        assert!(matches!(config.validate(), Err(ConfigError::LightingCellOutOfRange { bank: 3, index: 16 })));
    }

    #[test]
    fn test_rejects_bad_window_hour() {
        let mut config = DnsConfig::default();
        config.lighting.window.end_hour = 24;
        assert!(matches!(config.validate(), Err(ConfigError::HourOutOfRange { hour: 24 })));
    }

    #[test]
    fn test_write_then_load() {
        let dir = std::env::temp_dir().join(format!("gba_dns_cfg_{}", std::process::id()));
        let path = dir.join("config.toml");
        let config = DnsConfig::default();
        config.write_to(&path).unwrap();
        assert_eq!(DnsConfig::load_from(&path).unwrap(), config);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("gba_dns_definitely_missing.toml");
        assert!(matches!(DnsConfig::load_from(&path), Err(ConfigError::Io { .. })));
    }
}
