use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{ConfigError, ConfigResult};
use crate::palette::{PaletteBuffer, BANK_COUNT, COLORS_PER_BANK};

/// A palette entry that glows at night, e.g. a window pane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightingCell {
    pub bank: u8,
    pub index: u8,
    pub lit: Color,
}

impl LightingCell {
    pub const fn new(bank: u8, index: u8, lit: Color) -> Self {
        LightingCell { bank, index, lit }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.bank as usize >= BANK_COUNT || self.index as usize >= COLORS_PER_BANK {
            return Err(ConfigError::LightingCellOutOfRange { bank: self.bank, index: self.index });
        }
        Ok(())
    }

    fn slot(&self) -> (usize, usize) {
        (self.bank as usize, self.index as usize)
    }
}

/// What the overlay does to a cell while a screen fade is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingFadeMode {
    /// Output shows the lit colour; the fade's unfaded baseline is left as it was.
    #[default]
    HoldLitInOutput,
    /// Output keeps the source colour and the lit colour goes into the unfaded
    /// baseline, so the fade itself brings the light in.
    DeferToUnfaded,
}

/// Overwrites the configured cells in `output` with their lit colour.
///
/// Cells whose source colour is black are treated as absent from the loaded
/// tileset and are skipped. Returns how many cells were lit.
pub fn apply_lighting(
    cells: &[LightingCell],
    mode: LightingFadeMode,
    fade_active: bool,
    source: &PaletteBuffer,
    unfaded: &mut PaletteBuffer,
    output: &mut PaletteBuffer,
) -> usize {
    let mut lit = 0;
    for cell in cells {
        if cell.validate().is_err() {
            continue;
        }
        let (bank, index) = cell.slot();
        let original = source.get(bank, index);
        if original.is_black() {
            continue;
        }
        match (fade_active, mode) {
            (true, LightingFadeMode::DeferToUnfaded) => {
                output.set(bank, index, original);
                unfaded.set(bank, index, cell.lit);
            }
            _ => output.set(bank, index, cell.lit),
        }
        lit += 1;
    }
    lit
}

const WINDOW_WHITE: Color = Color::new(31, 31, 23);
const WINDOW_AMBER: Color = Color::new(30, 25, 10);

/// Colours 9 and 10 of the building palettes hold window panes.
pub fn default_cells() -> Vec<LightingCell> {
    [1u8, 6, 8, 9, 10]
        .iter()
        .flat_map(|&bank| {
            [
                LightingCell::new(bank, 9, WINDOW_WHITE),
                LightingCell::new(bank, 10, WINDOW_AMBER),
            ]
        })
        .collect()
}
