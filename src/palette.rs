use crate::color::Color;

pub const BANK_COUNT: usize = 32;
pub const COLORS_PER_BANK: usize = 16;
pub const PALETTE_SIZE: usize = BANK_COUNT * COLORS_PER_BANK;

/// First bank belonging to sprites (OBJ palettes). Banks below are background.
pub const SPRITE_BANK_START: usize = 16;

/// A full 512-colour palette image: 16 background banks followed by 16
/// sprite banks, 16 colours each.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PaletteBuffer {
    colors: [Color; PALETTE_SIZE],
}

impl PaletteBuffer {
    pub const fn new() -> Self {
        PaletteBuffer { colors: [Color::BLACK; PALETTE_SIZE] }
    }

    pub const fn from_colors(colors: [Color; PALETTE_SIZE]) -> Self {
        PaletteBuffer { colors }
    }

    pub const fn slot(bank: usize, index: usize) -> usize {
        bank * COLORS_PER_BANK + index
    }

    pub fn get(&self, bank: usize, index: usize) -> Color {
        self.colors[Self::slot(bank, index)]
    }

    pub fn set(&mut self, bank: usize, index: usize, color: Color) {
        self.colors[Self::slot(bank, index)] = color;
    }

    pub fn bank(&self, bank: usize) -> &[Color] {
        let start = Self::slot(bank, 0);
        &self.colors[start..start + COLORS_PER_BANK]
    }

    pub fn bank_mut(&mut self, bank: usize) -> &mut [Color] {
        let start = Self::slot(bank, 0);
        &mut self.colors[start..start + COLORS_PER_BANK]
    }

    /// Bulk copy of every colour, the software side of a palette DMA.
    pub fn copy_from(&mut self, other: &PaletteBuffer) {
        self.colors.copy_from_slice(&other.colors);
    }
}

impl Default for PaletteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_sprite_bank(bank: usize) -> bool {
    (SPRITE_BANK_START..BANK_COUNT).contains(&bank)
}
