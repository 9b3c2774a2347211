//! Rendering: walk a [`DrawingTree`] onto a plotters backend.
//!
//! - **SVG** through `plotters_svg::SVGBackend`, written into a `String`
//! - **RGB pixels** through `plotters_bitmap::BitMapBackend` on an opaque white surface
//!
//! The walker only translates shapes into drawing calls; every position is
//! decided by the layout engine.

pub mod fonts;

use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use crate::scene::{Anchor, Baseline, DrawingTree, Shape};
use crate::style::{FONT_FAMILY, Rgb};

fn rgb_color(c: Rgb) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

/// Round a surface coordinate to the backend's pixel grid.
///
/// plotters backends take integer coordinates, so SVG output is pixel-snapped too.
#[inline]
fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Draw every shape of `tree`, in order, with text set in `family`.
pub fn draw_tree<DB>(
    area: &DrawingArea<DB, Shift>,
    tree: &DrawingTree,
    family: &str,
) -> Result<()>
where
    DB: DrawingBackend,
{
    for shape in &tree.shapes {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
                ..
            } => {
                let (x0, y0) = (px(*x), px(*y));
                let (x1, y1) = (px(x + width), px(y + height));
                // Zero-size bars stay in the tree but paint nothing.
                if x1 <= x0 || y1 <= y0 {
                    continue;
                }
                area.draw(&Rectangle::new(
                    [(x0, y0), (x1, y1)],
                    rgb_color(*fill).filled(),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
            }
            Shape::Text {
                x,
                y,
                content,
                anchor,
                baseline,
                font_size,
                bold,
                fill,
                ..
            } => {
                if content.is_empty() {
                    continue;
                }
                let h = match anchor {
                    Anchor::Start => HPos::Left,
                    Anchor::Middle => HPos::Center,
                    Anchor::End => HPos::Right,
                };
                let v = match baseline {
                    Baseline::Alphabetic => VPos::Bottom,
                    Baseline::Middle => VPos::Center,
                };
                let font_style = if *bold {
                    FontStyle::Bold
                } else {
                    FontStyle::Normal
                };
                let color = rgb_color(*fill);
                let font = FontDesc::new(FontFamily::from(family), *font_size, font_style);
                let style = TextStyle::from(font).pos(Pos::new(h, v)).color(&color);
                area.draw_text(content, &style, (px(*x), px(*y)))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }
    Ok(())
}

/// Serialize `tree` to a self-contained SVG document sized to the tree's surface.
pub fn render_svg(tree: &DrawingTree) -> Result<String> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (tree.width, tree.height)).into_drawing_area();
        draw_tree(&root, tree, FONT_FAMILY)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    log::debug!("rendered svg: {} bytes", buf.len());
    Ok(buf)
}

/// Rasterize `tree` into a packed RGB8 buffer of `width`×`height` pixels on white.
///
/// Text is set in the registered raster font (see [`fonts`]).
pub fn render_rgb(tree: &DrawingTree, width: u32, height: u32) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(anyhow!("raster size must be non-zero, got {width}x{height}"));
    }
    fonts::ensure_fonts_registered()?;
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        draw_tree(&root, tree, fonts::RASTER_FAMILY)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    log::debug!("rasterized {width}x{height}");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_snap_to_nearest_pixel() {
        assert_eq!(px(160.4), 160);
        assert_eq!(px(160.5), 161);
        assert_eq!(px(-0.4), 0);
    }
}
