use serde::{Deserialize, Serialize};

/// Minutes covered by one turn of the progress sawtooth.
pub const PROGRESS_SPAN: u16 = 120;

/// Wall-clock reading supplied by the RTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameTime {
    pub hour: u8,
    pub minute: u8,
}

impl GameTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        GameTime { hour, minute }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePhase {
    Dawn,
    Morning,
    Day,
    Sunset,
    Dusk,
    Night,
}

impl TimePhase {
    pub const ALL: [TimePhase; 6] = [
        TimePhase::Dawn,
        TimePhase::Morning,
        TimePhase::Day,
        TimePhase::Sunset,
        TimePhase::Dusk,
        TimePhase::Night,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimePhase::Dawn => "dawn",
            TimePhase::Morning => "morning",
            TimePhase::Day => "day",
            TimePhase::Sunset => "sunset",
            TimePhase::Dusk => "dusk",
            TimePhase::Night => "night",
        }
    }
}

impl std::fmt::Display for TimePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// End hour (exclusive) of each phase. Night covers both the hours before
/// `night_end` and the hours from `dusk_end` onwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    pub night_end: u8,
    pub dawn_end: u8,
    pub morning_end: u8,
    pub day_end: u8,
    pub sunset_end: u8,
    pub dusk_end: u8,
}

impl PhaseThresholds {
    pub fn as_array(&self) -> [u8; 6] {
        [
            self.night_end,
            self.dawn_end,
            self.morning_end,
            self.day_end,
            self.sunset_end,
            self.dusk_end,
        ]
    }

    pub fn is_ascending(&self) -> bool {
        let hours = self.as_array();
        hours.windows(2).all(|w| w[0] < w[1]) && hours[5] <= 24
    }

    pub fn resolve_phase(&self, hour: u8) -> TimePhase {
        if hour < self.night_end {
            TimePhase::Night
        } else if hour < self.dawn_end {
            TimePhase::Dawn
        } else if hour < self.morning_end {
            TimePhase::Morning
        } else if hour < self.day_end {
            TimePhase::Day
        } else if hour < self.sunset_end {
            TimePhase::Sunset
        } else if hour < self.dusk_end {
            TimePhase::Dusk
        } else {
            TimePhase::Night
        }
    }
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        PhaseThresholds {
            night_end: 6,
            dawn_end: 8,
            morning_end: 10,
            day_end: 18,
            sunset_end: 20,
            dusk_end: 22,
        }
    }
}

/// Position inside the repeating two-hour window, in `0..PROGRESS_SPAN`.
pub fn resolve_progress(hour: u8, minute: u8) -> u16 {
    (hour as u16 % 2) * 60 + (minute as u16 % 60)
}

/// Hours during which lit windows glow. Wraps past midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl LightingWindow {
    pub fn contains(&self, hour: u8) -> bool {
        hour >= self.start_hour || hour < self.end_hour
    }
}

impl Default for LightingWindow {
    fn default() -> Self {
        LightingWindow { start_hour: 19, end_hour: 8 }
    }
}
