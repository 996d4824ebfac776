use serde::{Deserialize, Serialize};

use crate::color::ColorDelta;
use crate::error::{ConfigError, ConfigResult};
use crate::time::{TimePhase, PROGRESS_SPAN};

/// Filters for one phase: either a single delta held for the whole phase,
/// or a sequence stepped through by `progress >> shift`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTable {
    Constant(ColorDelta),
    Stepped(SteppedTable),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteppedTable {
    pub shift: u8,
    pub steps: Vec<ColorDelta>,
}

impl FilterTable {
    pub fn stepped(shift: u8, steps: &[ColorDelta]) -> Self {
        FilterTable::Stepped(SteppedTable { shift, steps: steps.to_vec() })
    }

    /// Checks that every progress value in `0..PROGRESS_SPAN` lands inside the table.
    pub fn validate(&self, phase: TimePhase) -> ConfigResult<()> {
        match self {
            FilterTable::Constant(_) => Ok(()),
            FilterTable::Stepped(SteppedTable { steps, .. }) if steps.is_empty() => {
                Err(ConfigError::EmptyTable { phase })
            }
            FilterTable::Stepped(SteppedTable { shift, steps }) => {
                let max_index = ((PROGRESS_SPAN - 1) as usize).checked_shr(*shift as u32).unwrap_or(0);
                if max_index >= steps.len() {
                    return Err(ConfigError::TableOutOfBounds {
                        phase,
                        len: steps.len(),
                        shift: *shift,
                        max_index,
                    });
                }
                Ok(())
            }
        }
    }

    /// Delta for a progress value. Out-of-range indices clamp to the last step.
    pub fn select(&self, progress: u16) -> ColorDelta {
        match self {
            FilterTable::Constant(delta) => *delta,
            FilterTable::Stepped(SteppedTable { shift, steps }) => {
                let idx = (progress as usize).checked_shr(*shift as u32).unwrap_or(0);
                steps
                    .get(idx)
                    .or_else(|| steps.last())
                    .copied()
                    .unwrap_or(ColorDelta::NONE)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTables {
    pub dawn: FilterTable,
    pub morning: FilterTable,
    pub day: FilterTable,
    pub sunset: FilterTable,
    pub dusk: FilterTable,
    pub night: FilterTable,
}

impl FilterTables {
    pub fn table(&self, phase: TimePhase) -> &FilterTable {
        match phase {
            TimePhase::Dawn => &self.dawn,
            TimePhase::Morning => &self.morning,
            TimePhase::Day => &self.day,
            TimePhase::Sunset => &self.sunset,
            TimePhase::Dusk => &self.dusk,
            TimePhase::Night => &self.night,
        }
    }

    pub fn select_filter(&self, phase: TimePhase, progress: u16) -> ColorDelta {
        self.table(phase).select(progress)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for phase in TimePhase::ALL {
            self.table(phase).validate(phase)?;
        }
        Ok(())
    }
}

const fn d(r: u8, g: u8, b: u8) -> ColorDelta {
    ColorDelta::new(r, g, b)
}

// Each step covers 8 minutes of the two-hour window.
pub const DAWN_FILTERS: [ColorDelta; 15] = [
    d(12, 12, 0),
    d(10, 11, 0),
    d(9, 10, 0),
    d(7, 10, 1),
    d(6, 9, 1),
    d(4, 8, 1),
    d(2, 7, 1),
    d(1, 6, 1),
    d(0, 6, 2),
    d(0, 5, 2),
    d(0, 4, 2),
    d(0, 3, 2),
    d(0, 2, 2),
    d(0, 2, 3),
    d(0, 1, 3),
];

// 32 minutes per step; the last step runs into full daylight.
pub const MORNING_FILTERS: [ColorDelta; 4] = [d(0, 0, 3), d(0, 0, 2), d(0, 0, 1), d(0, 0, 0)];

pub const DAY_FILTER: ColorDelta = d(0, 0, 0);

pub const SUNSET_FILTERS: [ColorDelta; 15] = [
    d(0, 0, 0),
    d(0, 1, 1),
    d(0, 1, 1),
    d(0, 2, 2),
    d(0, 2, 3),
    d(0, 3, 3),
    d(0, 3, 4),
    d(0, 4, 5),
    d(0, 4, 5),
    d(0, 5, 6),
    d(0, 5, 7),
    d(0, 6, 7),
    d(0, 6, 8),
    d(0, 7, 9),
    d(0, 7, 9),
];

pub const DUSK_FILTERS: [ColorDelta; 15] = [
    d(0, 8, 10),
    d(1, 8, 9),
    d(2, 9, 9),
    d(2, 9, 8),
    d(3, 9, 7),
    d(4, 9, 7),
    d(5, 10, 6),
    d(6, 10, 5),
    d(6, 10, 5),
    d(7, 10, 4),
    d(8, 11, 3),
    d(9, 11, 3),
    d(10, 11, 2),
    d(10, 11, 1),
    d(11, 12, 1),
];

pub const NIGHT_FILTER: ColorDelta = d(12, 12, 0);

impl Default for FilterTables {
    fn default() -> Self {
        FilterTables {
            dawn: FilterTable::stepped(3, &DAWN_FILTERS),
            morning: FilterTable::stepped(5, &MORNING_FILTERS),
            day: FilterTable::Constant(DAY_FILTER),
            sunset: FilterTable::stepped(3, &SUNSET_FILTERS),
            dusk: FilterTable::stepped(3, &DUSK_FILTERS),
            night: FilterTable::Constant(NIGHT_FILTER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::resolve_progress;

    #[test]
    fn test_default_tables_validate() {
        FilterTables::default().validate().unwrap();
    }

    #[test]
    fn test_dawn_at_seven() {
        let tables = FilterTables::default();
        let progress = resolve_progress(7, 0);
        assert_eq!(progress, 60);
        assert_eq!(tables.select_filter(TimePhase::Dawn, progress), DAWN_FILTERS[7]);
        assert_eq!(DAWN_FILTERS[7], d(1, 6, 1));
    }

    #[test]
    fn test_morning_steps() {
        let tables = FilterTables::default();
        assert_eq!(tables.select_filter(TimePhase::Morning, 0), d(0, 0, 3));
        assert_eq!(tables.select_filter(TimePhase::Morning, 31), d(0, 0, 3));
        assert_eq!(tables.select_filter(TimePhase::Morning, 32), d(0, 0, 2));
        assert_eq!(tables.select_filter(TimePhase::Morning, 95), d(0, 0, 1));
        assert_eq!(tables.select_filter(TimePhase::Morning, 96), ColorDelta::NONE);
        assert_eq!(tables.select_filter(TimePhase::Morning, 119), ColorDelta::NONE);
    }

    #[test]
    fn test_three_step_morning_rejected() {
        // 119 >> 5 is 3, one past a three-entry table
        let table = FilterTable::stepped(5, &MORNING_FILTERS[..3]);
        assert!(matches!(
            table.validate(TimePhase::Morning),
            Err(ConfigError::TableOutOfBounds { len: 3, shift: 5, max_index: 3, .. })
        ));
        assert!(FilterTable::stepped(5, &MORNING_FILTERS).validate(TimePhase::Morning).is_ok());
    }

    #[test]
    fn test_constant_phases_ignore_progress() {
        let tables = FilterTables::default();
        for progress in [0, 59, 119] {
            assert_eq!(tables.select_filter(TimePhase::Day, progress), ColorDelta::NONE);
            assert_eq!(tables.select_filter(TimePhase::Night, progress), NIGHT_FILTER);
        }
    }

    #[test]
    fn test_every_progress_in_bounds() {
        let tables = FilterTables::default();
        for phase in TimePhase::ALL {
            if let FilterTable::Stepped(SteppedTable { shift, steps }) = tables.table(phase) {
                for progress in 0..PROGRESS_SPAN {
                    assert!(((progress as usize) >> shift) < steps.len(), "{} at {}", phase, progress);
                }
            }
        }
    }

    #[test]
    fn test_short_table_rejected() {
        // 120 progress units at shift 3 need 15 entries
        let table = FilterTable::stepped(3, &DAWN_FILTERS[..14]);
        match table.validate(TimePhase::Dawn) {
            Err(ConfigError::TableOutOfBounds { len, shift, max_index, .. }) => {
                assert_eq!((len, shift, max_index), (14, 3, 14));
            }
            other => panic!("expected TableOutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_shift_change_needs_matching_length() {
        // shift 4 only needs 8 entries
        assert!(FilterTable::stepped(4, &DAWN_FILTERS[..8]).validate(TimePhase::Dusk).is_ok());
        assert!(FilterTable::stepped(2, &DAWN_FILTERS).validate(TimePhase::Dusk).is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        let table = FilterTable::stepped(7, &[]);
        assert!(matches!(table.validate(TimePhase::Sunset), Err(ConfigError::EmptyTable { .. })));
        assert_eq!(table.select(10), ColorDelta::NONE);
    }
}
