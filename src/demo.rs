use gba_dns::exceptions::{TAG_HEALTHBAR_PAL, TAG_HEALTHBOX_PAL};
use gba_dns::palette::{BANK_COUNT, COLORS_PER_BANK, PALETTE_SIZE};
use gba_dns::{Color, PaletteBuffer, SpriteTagLookup};

/// A stand-in for the game's palette data: every bank is a ramp from a dark
/// shade to a bright tint, with colours 9 and 10 of the building banks set
/// to the dim window-pane colours the lighting overlay replaces.
pub fn source_palette() -> PaletteBuffer {
    let mut colors = [Color::BLACK; PALETTE_SIZE];
    for bank in 0..BANK_COUNT {
        let hue = (bank % 6) as u8;
        for idx in 1..COLORS_PER_BANK {
            let level = (idx as u8) * 2 + 1;
            let (r, g, b) = match hue {
                0 => (level, level / 2, 4),
                1 => (level / 2, level, 6),
                2 => (6, level / 2, level),
                3 => (level, level, level / 3),
                4 => (level / 3, level, level),
                _ => (level, level, level),
            };
            colors[bank * COLORS_PER_BANK + idx] = Color::new(r, g, b);
        }
    }
    let mut palette = PaletteBuffer::from_colors(colors);
    for bank in [1, 6, 8, 9, 10] {
        palette.set(bank, 9, Color::new(10, 12, 14));
        palette.set(bank, 10, Color::new(8, 9, 12));
    }
    palette
}

/// Minimal sprite palette allocator: tag per OBJ slot.
pub struct DemoSpriteTags {
    slots: [Option<u16>; 16],
}

impl DemoSpriteTags {
    pub fn overworld() -> Self {
        let mut slots = [None; 16];
        for (i, slot) in slots.iter_mut().enumerate().take(8) {
            *slot = Some(0x1100 + i as u16);
        }
        DemoSpriteTags { slots }
    }

    pub fn battle() -> Self {
        let mut tags = Self::overworld();
        tags.slots[4] = Some(TAG_HEALTHBOX_PAL);
        tags.slots[5] = Some(TAG_HEALTHBAR_PAL);
        tags
    }
}

impl SpriteTagLookup for DemoSpriteTags {
    fn tag_for_slot(&self, sprite_slot: u8) -> Option<u16> {
        self.slots.get(sprite_slot as usize).copied().flatten()
    }
}

/// Fade to black, the way the game dims the screen on warps. Produces the
/// faded buffer from the unfaded baseline.
pub struct DemoFade {
    pub active: bool,
    level: u8,
}

const FADE_STEPS: u8 = 16;

impl DemoFade {
    pub fn new() -> Self {
        DemoFade { active: false, level: 0 }
    }

    pub fn tick(&mut self, unfaded: &PaletteBuffer, faded: &mut PaletteBuffer) {
        if self.active {
            self.level = (self.level + 1) % (FADE_STEPS + 1);
        } else {
            self.level = 0;
        }
        let keep = (FADE_STEPS - self.level) as u32;
        for bank in 0..BANK_COUNT {
            for idx in 0..COLORS_PER_BANK {
                let c = unfaded.get(bank, idx);
                let scale = |ch: u8| (ch as u32 * keep / FADE_STEPS as u32) as u8;
                faded.set(bank, idx, Color::new(scale(c.r()), scale(c.g()), scale(c.b())));
            }
        }
    }
}
