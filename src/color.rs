use serde::{Deserialize, Serialize};

use crate::error::ChannelOutOfRange;

/// Largest value a 5-bit channel can hold.
pub const CHANNEL_MAX: u8 = 0x1F;

/// Packs three 5-bit channels into a BGR555 halfword (`-bbbbbgggggrrrrr`).
pub const fn rgb2(r: u8, g: u8, b: u8) -> u16 {
    (r as u16 & 0x1F) | ((g as u16 & 0x1F) << 5) | ((b as u16 & 0x1F) << 10)
}

/// A 15-bit palette colour as stored in palette RAM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color(pub u16);

/// Per-channel amounts a filter takes away from a colour.
///
/// Same bit layout as [`Color`]; a zero delta leaves colours untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 3]", into = "[u8; 3]")]
pub struct ColorDelta(pub u16);

impl Color {
    pub const BLACK: Color = Color(0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color(rgb2(r, g, b))
    }

    pub const fn r(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 5) & 0x1F) as u8
    }

    pub const fn b(self) -> u8 {
        ((self.0 >> 10) & 0x1F) as u8
    }

    pub const fn is_black(self) -> bool {
        self.0 == 0
    }

    /// Expands to 0x00RRGGBB for display, stretching 5 bits to 8.
    pub fn to_rgb888(self) -> u32 {
        let expand = |c: u8| ((c << 3) | (c >> 2)) as u32;
        (expand(self.r()) << 16) | (expand(self.g()) << 8) | expand(self.b())
    }
}

impl ColorDelta {
    pub const NONE: ColorDelta = ColorDelta(0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        ColorDelta(rgb2(r, g, b))
    }

    pub const fn r(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 5) & 0x1F) as u8
    }

    pub const fn b(self) -> u8 {
        ((self.0 >> 10) & 0x1F) as u8
    }
}

fn check_channels(rgb: [u8; 3]) -> Result<[u8; 3], ChannelOutOfRange> {
    if rgb.iter().any(|&c| c > CHANNEL_MAX) {
        Err(ChannelOutOfRange(rgb))
    } else {
        Ok(rgb)
    }
}

impl TryFrom<[u8; 3]> for Color {
    type Error = ChannelOutOfRange;

    fn try_from(rgb: [u8; 3]) -> Result<Self, Self::Error> {
        let [r, g, b] = check_channels(rgb)?;
        Ok(Color::new(r, g, b))
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r(), c.g(), c.b()]
    }
}

impl TryFrom<[u8; 3]> for ColorDelta {
    type Error = ChannelOutOfRange;

    fn try_from(rgb: [u8; 3]) -> Result<Self, Self::Error> {
        let [r, g, b] = check_channels(rgb)?;
        Ok(ColorDelta::new(r, g, b))
    }
}

impl From<ColorDelta> for [u8; 3] {
    fn from(d: ColorDelta) -> Self {
        [d.r(), d.g(), d.b()]
    }
}
