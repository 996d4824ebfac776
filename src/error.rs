use std::path::PathBuf;

use thiserror::Error;

use crate::time::TimePhase;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("phase thresholds must be strictly ascending and end by hour 24: {0:?}")]
    ThresholdsNotAscending([u8; 6]),

    #[error("{phase} filter table has {len} entries but shift {shift} indexes up to {max_index}")]
    TableOutOfBounds {
        phase: TimePhase,
        len: usize,
        shift: u8,
        max_index: usize,
    },

    #[error("{phase} filter table is empty")]
    EmptyTable { phase: TimePhase },

    #[error("lighting cell ({bank}, {index}) is outside the 32x16 palette")]
    LightingCellOutOfRange { bank: u8, index: u8 },

    #[error("hour {hour} is outside 0..24")]
    HourOutOfRange { hour: u8 },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A colour or filter written with a channel that does not fit in 5 bits.
#[derive(Debug, Error)]
#[error("colour channels {0:?} exceed 31")]
pub struct ChannelOutOfRange(pub [u8; 3]);

/// An exception mask that does not list exactly one flag per bank.
#[derive(Debug, Error)]
#[error("exception mask has {0} entries, expected {expected}", expected = crate::palette::BANK_COUNT)]
pub struct MaskLengthMismatch(pub usize);
