//! One-time font registration for raster output.
//!
//! The `ab_glyph` text path does not discover OS fonts, so a TTF/OTF face is
//! registered once under [`RASTER_FAMILY`] for both regular and bold. The face
//! is the sans-serif font egui ships with, unless `PYRAMID_FONT` names another
//! file. Vector output never needs this: SVG names the family and lets the
//! viewer resolve it.

use anyhow::{Result, anyhow};
use std::path::PathBuf;
use std::sync::OnceLock;

use plotters::style::FontStyle;

/// Family name raster text is drawn with.
pub const RASTER_FAMILY: &str = "sans-serif";

/// Environment variable pointing at a font file to use instead of the bundled one.
pub const FONT_ENV: &str = "PYRAMID_FONT";

/// Always-available fallback face.
pub const BUNDLED_FONT: &[u8] = epaint_default_fonts::UBUNTU_LIGHT;

static FONTS_READY: OnceLock<Result<(), String>> = OnceLock::new();

/// Font file named by `PYRAMID_FONT`, if set and readable.
fn override_font() -> Option<&'static [u8]> {
    let path = PathBuf::from(std::env::var_os(FONT_ENV)?);
    match std::fs::read(&path) {
        Ok(bytes) => {
            log::info!("raster text font: {}", path.display());
            // Registered fonts must live for the rest of the process.
            Some(Box::leak(bytes.into_boxed_slice()))
        }
        Err(e) => {
            log::warn!("cannot read {FONT_ENV}={}: {e}; using the bundled font", path.display());
            None
        }
    }
}

fn register(bytes: &'static [u8]) -> bool {
    [FontStyle::Normal, FontStyle::Bold]
        .into_iter()
        .all(|style| plotters::style::register_font(RASTER_FAMILY, style, bytes).is_ok())
}

/// Register the raster font once. Fails only if no face could be parsed.
pub fn ensure_fonts_registered() -> Result<()> {
    FONTS_READY
        .get_or_init(|| {
            if let Some(bytes) = override_font() {
                if register(bytes) {
                    return Ok(());
                }
                log::warn!("{FONT_ENV} is not a usable font; using the bundled font");
            }
            if register(BUNDLED_FONT) {
                Ok(())
            } else {
                Err("bundled raster font could not be parsed".to_string())
            }
        })
        .clone()
        .map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_font_registers() {
        assert!(!BUNDLED_FONT.is_empty());
        ensure_fonts_registered().unwrap();
    }
}
