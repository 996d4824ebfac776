use serde::{Deserialize, Serialize};

use crate::color::{rgb2, Color, ColorDelta, CHANNEL_MAX};

/// How a filter delta darkens a colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Channel minus delta, floored at zero.
    Subtractive,
    /// Channel scaled by `(31 - delta) / 32`. Dark channels fade out more slowly.
    #[default]
    Proportional,
}

impl FilterPolicy {
    pub fn apply(self, color: Color, filter: ColorDelta) -> Color {
        match self {
            FilterPolicy::Subtractive => apply_subtractive(color, filter),
            FilterPolicy::Proportional => apply_proportional(color, filter),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FilterPolicy::Subtractive => FilterPolicy::Proportional,
            FilterPolicy::Proportional => FilterPolicy::Subtractive,
        }
    }

    pub fn apply_bank(self, src: &[Color], dst: &mut [Color], filter: ColorDelta) {
        for (out, &c) in dst.iter_mut().zip(src) {
            *out = self.apply(c, filter);
        }
    }
}

fn clamp_channel(c: u32) -> u8 {
    // Underflow shows up as a wrapped value far above 31.
    if c <= CHANNEL_MAX as u32 { c as u8 } else { 0 }
}

pub fn apply_subtractive(color: Color, filter: ColorDelta) -> Color {
    let r = (color.r() as u32).wrapping_sub(filter.r() as u32);
    let g = (color.g() as u32).wrapping_sub(filter.g() as u32);
    let b = (color.b() as u32).wrapping_sub(filter.b() as u32);
    Color(rgb2(clamp_channel(r), clamp_channel(g), clamp_channel(b)))
}

/// A channel with no delta passes through; `31/32` scaling would otherwise
/// dim it by a step whenever any other channel is filtered.
pub fn apply_proportional(color: Color, filter: ColorDelta) -> Color {
    let scale = |c: u8, f: u8| {
        if f == 0 { c as u32 } else { (c as u32 * (CHANNEL_MAX - f) as u32) >> 5 }
    };
    let r = scale(color.r(), filter.r());
    let g = scale(color.g(), filter.g());
    let b = scale(color.b(), filter.b());
    Color(rgb2(clamp_channel(r), clamp_channel(g), clamp_channel(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===============================================
    // Subtractive
    // ===============================================
    #[test]
    fn test_subtractive_basic() {
        let out = apply_subtractive(Color::new(20, 15, 10), ColorDelta::new(5, 5, 5));
        assert_eq!(out, Color::new(15, 10, 5));
    }

    #[test]
    fn test_subtractive_clamps_at_zero() {
        let out = apply_subtractive(Color::new(3, 12, 0), ColorDelta::new(12, 12, 1));
        assert_eq!(out, Color::new(0, 0, 0));
    }

    #[test]
    fn test_subtractive_zero_delta_is_identity() {
        for raw in (0..0x8000u16).step_by(97) {
            let c = Color(raw);
            assert_eq!(apply_subtractive(apply_subtractive(c, ColorDelta::NONE), ColorDelta::NONE), c);
        }
    }

    // ===============================================
    // Proportional
    // ===============================================
    #[test]
    fn test_proportional_basic() {
        // 31 * (31 - 12) / 32 = 18, 16 * 19 / 32 = 9, blue has no delta
        let out = apply_proportional(Color::new(31, 16, 8), ColorDelta::new(12, 12, 0));
        assert_eq!(out, Color::new(18, 9, 8));
    }

    #[test]
    fn test_proportional_zero_channel_untouched() {
        let white = Color::new(31, 31, 31);
        // first two sunset steps: (0, 0, 0) then (0, 1, 1)
        assert_eq!(apply_proportional(white, ColorDelta::NONE), white);
        let out = apply_proportional(white, ColorDelta::new(0, 1, 1));
        assert_eq!(out, Color::new(31, 29, 29));
    }

    #[test]
    fn test_proportional_zero_delta_is_identity() {
        for raw in (0..0x8000u16).step_by(89) {
            let c = Color(raw);
            let once = apply_proportional(c, ColorDelta::NONE);
            assert_eq!(apply_proportional(once, ColorDelta::NONE), c);
        }
    }

    #[test]
    fn test_proportional_keeps_dark_channels() {
        let dark = Color::new(4, 4, 4);
        let filter = ColorDelta::new(6, 6, 6);
        assert_eq!(apply_subtractive(dark, filter), Color::BLACK);
        assert_eq!(apply_proportional(dark, filter), Color::new(3, 3, 3));
    }

    #[test]
    fn test_proportional_always_in_range() {
        for raw_c in (0..0x8000u16).step_by(131) {
            for raw_f in (0..0x8000u16).step_by(257) {
                let out = apply_proportional(Color(raw_c), ColorDelta(raw_f));
                assert!(out.0 < 0x8000);
                assert!(out.r() <= Color(raw_c).r());
                assert!(out.g() <= Color(raw_c).g());
                assert!(out.b() <= Color(raw_c).b());
            }
        }
    }

    #[test]
    fn test_policy_dispatch() {
        let c = Color::new(10, 10, 10);
        let f = ColorDelta::new(2, 2, 2);
        assert_eq!(FilterPolicy::Subtractive.apply(c, f), apply_subtractive(c, f));
        assert_eq!(FilterPolicy::Proportional.apply(c, f), apply_proportional(c, f));
        assert_eq!(FilterPolicy::default(), FilterPolicy::Proportional);
        assert_eq!(FilterPolicy::Proportional.toggled(), FilterPolicy::Subtractive);
    }

    #[test]
    fn test_apply_bank() {
        let src = [Color::new(8, 8, 8); 16];
        let mut dst = [Color::BLACK; 16];
        FilterPolicy::Subtractive.apply_bank(&src, &mut dst, ColorDelta::new(1, 2, 3));
        assert!(dst.iter().all(|&c| c == Color::new(7, 6, 5)));
    }
}
