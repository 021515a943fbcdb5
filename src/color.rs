// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Deterministic color derivation for badges without a configured color.
//!
//! Packages that carry no explicit color override receive one derived from
//! their name alone, so repeated runs on any platform agree on every badge
//! color. The derived values stay inside a saturation and lightness band
//! that keeps white badge text readable.

use std::fmt;

/// HSL triple produced by [`color_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HslColor {
    /// Hue angle in degrees, always below 360.
    pub hue:        u16,
    /// Saturation percentage, within `60..80`.
    pub saturation: u8,
    /// Lightness percentage, within `40..55`.
    pub lightness:  u8
}

impl fmt::Display for HslColor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "hsl({},{}%,{}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Derives a stable HSL color from an arbitrary name.
///
/// The name's UTF-16 code units are folded into a 32-bit signed accumulator
/// through a wrapping multiply-by-31-and-add recurrence. Hue is the
/// accumulator modulo 360 normalized to non-negative; saturation adds one of
/// twenty steps taken from bit 8 upward; lightness adds one of fifteen steps
/// taken from bit 16 upward. Equal names always map to equal colors, and the
/// empty string maps to `hsl(0,60%,40%)`.
///
/// # Example
///
/// ```
/// use depbadge::color_for;
///
/// let color = color_for("left-pad");
/// assert_eq!(color_for("left-pad"), color);
/// assert!(color.hue < 360);
/// ```
pub fn color_for(name: &str) -> HslColor {
    let mut accumulator: i32 = 0;
    for unit in name.encode_utf16() {
        accumulator = accumulator.wrapping_mul(31).wrapping_add(i32::from(unit));
    }

    let hue = ((accumulator % 360) + 360) % 360;
    let saturation = 60 + ((accumulator >> 8).unsigned_abs() % 20);
    let lightness = 40 + ((accumulator >> 16).unsigned_abs() % 15);

    HslColor {
        hue:        hue as u16,
        saturation: saturation as u8,
        lightness:  lightness as u8
    }
}
