//! Colors, fonts and type sizes of the pyramid chart.

use serde::{Deserialize, Serialize};

/// Opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, upper-case.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Fill colors for the two sides and their surplus overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub side_a: Rgb,
    pub side_a_surplus: Rgb,
    pub side_b: Rgb,
    pub side_b_surplus: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            side_a: Rgb::new(0x00, 0x71, 0xBD),         // #0071BD
            side_a_surplus: Rgb::new(0x1A, 0x35, 0x64), // #1A3564
            side_b: Rgb::new(0xF2, 0x58, 0x58),         // #F25858
            side_b_surplus: Rgb::new(0x81, 0x2F, 0x2F), // #812F2F
        }
    }
}

impl Palette {
    /// Legend order: A, A surplus, B, B surplus.
    pub fn legend_colors(&self) -> [Rgb; 4] {
        [
            self.side_a,
            self.side_a_surplus,
            self.side_b,
            self.side_b_surplus,
        ]
    }
}

/// Font family written into vector output.
pub const FONT_FAMILY: &str = "Roboto, sans-serif";

// Type sizes in px (1pt = 4/3 px).
pub const TITLE_PX: f64 = 16.0;
pub const SUBTITLE_PX: f64 = 12.0;
pub const SOURCE_PX: f64 = 12.0;
pub const LEGEND_PX: f64 = 12.0;
pub const SIDE_CAPTION_PX: f64 = 16.0;
pub const AXIS_LABEL_PX: f64 = 10.0 * 4.0 / 3.0;
pub const VALUE_LABEL_PX: f64 = 9.0 * 4.0 / 3.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_hex_codes() {
        let p = Palette::default();
        assert_eq!(p.side_a.hex(), "#0071BD");
        assert_eq!(p.side_a_surplus.hex(), "#1A3564");
        assert_eq!(p.side_b.hex(), "#F25858");
        assert_eq!(p.side_b_surplus.hex(), "#812F2F");
    }
}
