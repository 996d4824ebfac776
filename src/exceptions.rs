use serde::{Deserialize, Serialize};

use crate::error::MaskLengthMismatch;
use crate::palette::{is_sprite_bank, BANK_COUNT, SPRITE_BANK_START};

/// Map header type of the current location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapCategory {
    #[default]
    None,
    Town,
    City,
    Route,
    Underground,
    Underwater,
    OceanRoute,
    Unknown,
    Indoor,
    SecretBase,
}

impl MapCategory {
    pub const ALL: [MapCategory; 10] = [
        MapCategory::None,
        MapCategory::Town,
        MapCategory::City,
        MapCategory::Route,
        MapCategory::Underground,
        MapCategory::Underwater,
        MapCategory::OceanRoute,
        MapCategory::Unknown,
        MapCategory::Indoor,
        MapCategory::SecretBase,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Which main loop the game is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppContext {
    #[default]
    Overworld,
    Combat,
    /// Menus, title screen, anything else. The transfer bypasses DNS here.
    Other,
}

impl AppContext {
    pub fn is_combat(self) -> bool {
        self == AppContext::Combat
    }
}

/// Answers which palette tag a dynamic allocator has placed in a sprite slot.
///
/// `sprite_slot` is the bank index minus 16.
pub trait SpriteTagLookup {
    fn tag_for_slot(&self, sprite_slot: u8) -> Option<u16>;
}

impl<F> SpriteTagLookup for F
where
    F: Fn(u8) -> Option<u16>,
{
    fn tag_for_slot(&self, sprite_slot: u8) -> Option<u16> {
        self(sprite_slot)
    }
}

/// No sprite palettes allocated.
pub struct NoSpriteTags;

impl SpriteTagLookup for NoSpriteTags {
    fn tag_for_slot(&self, _sprite_slot: u8) -> Option<u16> {
        None
    }
}

/// One flag per bank: `true` means DNS filters it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<bool>", into = "Vec<bool>")]
pub struct ExceptionMask(pub [bool; BANK_COUNT]);

impl TryFrom<Vec<bool>> for ExceptionMask {
    type Error = MaskLengthMismatch;

    fn try_from(flags: Vec<bool>) -> Result<Self, Self::Error> {
        let len = flags.len();
        let flags: [bool; BANK_COUNT] = flags.try_into().map_err(|_| MaskLengthMismatch(len))?;
        Ok(ExceptionMask(flags))
    }
}

impl From<ExceptionMask> for Vec<bool> {
    fn from(mask: ExceptionMask) -> Self {
        mask.0.to_vec()
    }
}

impl ExceptionMask {
    /// Every bank active except those listed.
    pub fn excluding(banks: &[usize]) -> Self {
        let mut mask = [true; BANK_COUNT];
        for &bank in banks {
            if let Some(flag) = mask.get_mut(bank) {
                *flag = false;
            }
        }
        ExceptionMask(mask)
    }

    /// Only the listed banks active.
    pub fn only(banks: &[usize]) -> Self {
        let mut mask = [false; BANK_COUNT];
        for &bank in banks {
            if let Some(flag) = mask.get_mut(bank) {
                *flag = true;
            }
        }
        ExceptionMask(mask)
    }

    pub fn is_active(&self, bank: usize) -> bool {
        self.0.get(bank).copied().unwrap_or(false)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteExceptions {
    pub overworld: ExceptionMask,
    pub combat: ExceptionMask,
    /// Map types where DNS is switched off entirely.
    pub map_categories: Vec<MapCategory>,
    /// Sprite palette tags that are never filtered, wherever they land.
    pub sprite_tags: Vec<u16>,
}

impl PaletteExceptions {
    pub fn mask_for(&self, context: AppContext) -> &ExceptionMask {
        if context.is_combat() { &self.combat } else { &self.overworld }
    }

    pub fn is_map_exception(&self, map: MapCategory) -> bool {
        self.map_categories.contains(&map)
    }

    pub fn is_tag_exception(&self, tag: u16) -> bool {
        self.sprite_tags.contains(&tag)
    }

    /// Whether `bank` is filtered this frame. An excluded map category turns
    /// off every bank; the frame builder checks that once up front.
    pub fn should_filter(
        &self,
        bank: usize,
        context: AppContext,
        map: MapCategory,
        tags: &dyn SpriteTagLookup,
    ) -> bool {
        if self.is_map_exception(map) || !self.mask_for(context).is_active(bank) {
            return false;
        }
        if is_sprite_bank(bank) {
            let slot = (bank - SPRITE_BANK_START) as u8;
            if let Some(tag) = tags.tag_for_slot(slot) {
                return !self.is_tag_exception(tag);
            }
        }
        true
    }
}

pub const TAG_HEALTHBOX_PAL: u16 = 0xD6FF;
pub const TAG_HEALTHBAR_PAL: u16 = 0xD704;
pub const TAG_STATUS_SUMMARY_BAR_PAL: u16 = 0xD710;
pub const TAG_STATUS_SUMMARY_BALLS_PAL: u16 = 0xD712;

impl Default for PaletteExceptions {
    fn default() -> Self {
        PaletteExceptions {
            // Text windows and the start menu live in 13-15.
            overworld: ExceptionMask::excluding(&[13, 14, 15]),
            combat: ExceptionMask::only(&[2, 3, 4, 6, 7, 12, 13, 14, 15]),
            map_categories: vec![
                MapCategory::None,
                MapCategory::Indoor,
                MapCategory::Underground,
                MapCategory::SecretBase,
            ],
            sprite_tags: vec![
                TAG_HEALTHBOX_PAL,
                TAG_HEALTHBAR_PAL,
                TAG_STATUS_SUMMARY_BAR_PAL,
                TAG_STATUS_SUMMARY_BALLS_PAL,
            ],
        }
    }
}
