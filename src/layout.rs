//! Chart layout engine: turns a [`ChartRequest`] into a [`DrawingTree`].
//!
//! - Side A grows right-to-left from the centre, side B left-to-right
//! - Each side has its own linear scale (`[0, max] → [0, half − gutter]`)
//! - Rows share one band scale; the first row is at the top
//! - Surplus overlays highlight the excess of one side over the other
//! - Value labels are shown in thousands with two decimals
//!
//! The function is pure: identical inputs give identical trees.

use std::collections::HashSet;

use crate::error::ChartError;
use crate::models::{ChartRequest, GUTTER, LayoutConfig};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Anchor, Baseline, DrawingTree, Role, Shape};
use crate::style::{self, BLACK, Palette, Rgb};

/// Inner/outer padding of the row bands, as a fraction of the band step.
pub const BAND_PADDING: f64 = 0.1;
/// Room reserved above the first band (the band range starts at −30).
pub const BAND_TOP_OFFSET: f64 = -30.0;
/// Value labels are divided by this before formatting.
pub const VALUE_DIVISOR: f64 = 1000.0;
pub const SUBTITLE: &str = "(in thousands)";

/// Format a raw value for its bar label: thousands, two decimals.
///
/// Exact halfway cases round away from zero (`0.125` → `"0.13"`); `{:.2}`
/// alone would round them to even.
pub fn value_label(v: f64) -> String {
    let x = v / VALUE_DIVISOR;
    // The only binary fractions halfway between hundredths are odd multiples of 1/8.
    let eighths = x.abs() * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        let hundredths = (x.abs() * 100.0).ceil();
        let sign = if x < 0.0 { "-" } else { "" };
        return format!("{sign}{:.2}", hundredths / 100.0);
    }
    format!("{:.2}", x)
}

/// The two per-side scales and the shared band scale for one request.
#[derive(Debug, Clone)]
pub struct Scales {
    pub side_a: LinearScale,
    pub side_b: LinearScale,
    pub bands: BandScale,
}

impl Scales {
    pub fn compute(request: &ChartRequest, config: &LayoutConfig) -> Self {
        let half = config.width / 2.0;
        let reach = half - GUTTER;
        let max_a = request.rows.iter().map(|r| r.value_a).fold(0.0, f64::max);
        let max_b = request.rows.iter().map(|r| r.value_b).fold(0.0, f64::max);

        // Repeated group labels share a band.
        let mut seen = HashSet::new();
        let keys: Vec<String> = request
            .rows
            .iter()
            .filter(|r| seen.insert(r.group.as_str()))
            .map(|r| r.group.clone())
            .collect();

        Self {
            side_a: LinearScale::new((0.0, max_a), (reach, 0.0)),
            side_b: LinearScale::new((0.0, max_b), (0.0, reach)),
            bands: BandScale::new(keys, (BAND_TOP_OFFSET, config.height), BAND_PADDING),
        }
    }
}

/// Lay out the full chart with the default palette.
pub fn layout(request: &ChartRequest, config: &LayoutConfig) -> Result<DrawingTree, ChartError> {
    layout_with_palette(request, config, &Palette::default())
}

/// Lay out the full chart.
pub fn layout_with_palette(
    request: &ChartRequest,
    config: &LayoutConfig,
    palette: &Palette,
) -> Result<DrawingTree, ChartError> {
    request.validate()?;
    if config.width <= 2.0 * GUTTER {
        return Err(ChartError::CanvasTooNarrow {
            width: config.width,
            gutter: GUTTER,
        });
    }

    let scales = Scales::compute(request, config);
    let (surface_w, surface_h) = config.surface_size();
    let mut tree = DrawingTree::new(surface_w, surface_h);

    let m = config.margins;
    let half = config.width / 2.0;
    let reach = half - GUTTER;
    let bw = scales.bands.bandwidth();
    let band_top = |group: &str| scales.bands.position(group).unwrap_or(0.0);

    let mut out = Painter {
        tree: &mut tree,
        ox: m.left,
        oy: m.top,
    };

    // Primary bars
    for row in &request.rows {
        let x = scales.side_a.map(row.value_a);
        let y = band_top(&row.group);
        out.rect(x, y, reach - x, bw, palette.side_a, Role::BarA);
    }
    for row in &request.rows {
        let w = scales.side_b.map(row.value_b);
        let y = band_top(&row.group);
        out.rect(half + GUTTER, y, w, bw, palette.side_b, Role::BarB);
    }

    // Surplus overlays, each measured on its own side's scale
    for row in request.rows.iter().filter(|r| r.value_a > r.value_b) {
        let x = scales.side_a.map(row.value_a);
        let w = scales.side_a.map(row.value_b) - x;
        let y = band_top(&row.group);
        out.rect(x, y, w, bw, palette.side_a_surplus, Role::SurplusA);
    }
    for row in request.rows.iter().filter(|r| r.value_b > r.value_a) {
        let from = scales.side_b.map(row.value_a);
        let w = scales.side_b.map(row.value_b) - from;
        let y = band_top(&row.group);
        out.rect(half + GUTTER + from, y, w, bw, palette.side_b_surplus, Role::SurplusB);
    }

    // Centre axis: labels only, no domain line
    for row in &request.rows {
        let y = band_top(&row.group) + bw / 2.0;
        out.text(
            TextSpec::new(half, y, &row.group, Role::AxisLabel)
                .anchor(Anchor::Middle)
                .middle()
                .size(style::AXIS_LABEL_PX)
                .bold(),
        );
    }

    // Value labels just outside each bar's outer edge
    for row in &request.rows {
        let y = band_top(&row.group) + bw / 2.0;
        let x = scales.side_a.map(row.value_a) - 5.0;
        out.text(
            TextSpec::new(x, y, &value_label(row.value_a), Role::ValueLabelA)
                .anchor(Anchor::End)
                .middle()
                .size(style::VALUE_LABEL_PX),
        );
    }
    for row in &request.rows {
        let y = band_top(&row.group) + bw / 2.0;
        let x = half + GUTTER + scales.side_b.map(row.value_b) + 5.0;
        out.text(
            TextSpec::new(x, y, &value_label(row.value_b), Role::ValueLabelB)
                .middle()
                .size(style::VALUE_LABEL_PX),
        );
    }

    // Side captions below the plot
    let caption_y = config.height + m.bottom - 20.0;
    out.text(
        TextSpec::new(half - 40.0, caption_y, &config.labels.a, Role::SideCaption)
            .anchor(Anchor::End)
            .size(style::SIDE_CAPTION_PX),
    );
    out.text(
        TextSpec::new(half + 40.0, caption_y, &config.labels.b, Role::SideCaption)
            .size(style::SIDE_CAPTION_PX),
    );

    // Legend: swatch + text rows, top-left of the plot
    let entries = [
        config.labels.a.clone(),
        format!("{} surplus", config.labels.a),
        config.labels.b.clone(),
        format!("{} surplus", config.labels.b),
    ];
    for (i, (label, color)) in entries.iter().zip(palette.legend_colors()).enumerate() {
        let y = i as f64 * 20.0;
        out.rect(0.0, y, 19.0, 19.0, color, Role::LegendSwatch);
        out.text(
            TextSpec::new(24.0, y + 9.5, label, Role::LegendText)
                .middle()
                .size(style::LEGEND_PX),
        );
    }

    // Title block and source citation
    let title_y = -m.top / 1.5;
    out.text(
        TextSpec::new(half, title_y, &request.title, Role::Title)
            .anchor(Anchor::Middle)
            .size(style::TITLE_PX),
    );
    out.text(
        TextSpec::new(half, title_y + 18.0, SUBTITLE, Role::Subtitle)
            .anchor(Anchor::Middle)
            .size(style::SUBTITLE_PX),
    );
    if let Some(source) = request.source_label() {
        let citation = format!("Source: {source}");
        let (x, y) = (config.width + m.right / 1.5, config.height + m.bottom / 1.5);
        out.text(
            TextSpec::new(x, y, &citation, Role::Source)
                .anchor(Anchor::End)
                .size(style::SOURCE_PX),
        );
    }

    log::debug!(
        "laid out {} rows into {} shapes ({}x{})",
        request.rows.len(),
        tree.shapes.len(),
        tree.width,
        tree.height
    );
    Ok(tree)
}

/// Appends shapes to a tree, translating plot-relative coordinates by the margins.
struct Painter<'t> {
    tree: &'t mut DrawingTree,
    ox: f64,
    oy: f64,
}

impl Painter<'_> {
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: Rgb, role: Role) {
        self.tree.push(Shape::Rect {
            x: self.ox + x,
            y: self.oy + y,
            width,
            height,
            fill,
            role,
        });
    }

    fn text(&mut self, spec: TextSpec<'_>) {
        self.tree.push(Shape::Text {
            x: self.ox + spec.x,
            y: self.oy + spec.y,
            content: spec.content.to_string(),
            anchor: spec.anchor,
            baseline: spec.baseline,
            font_size: spec.font_size,
            bold: spec.bold,
            fill: BLACK,
            role: spec.role,
        });
    }
}

/// Plot-relative text placement; defaults to start-anchored, baseline-aligned, 16px, regular.
struct TextSpec<'a> {
    x: f64,
    y: f64,
    content: &'a str,
    anchor: Anchor,
    baseline: Baseline,
    font_size: f64,
    bold: bool,
    role: Role,
}

impl<'a> TextSpec<'a> {
    fn new(x: f64, y: f64, content: &'a str, role: Role) -> Self {
        Self {
            x,
            y,
            content,
            anchor: Anchor::Start,
            baseline: Baseline::Alphabetic,
            font_size: 16.0,
            bold: false,
            role,
        }
    }

    fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn middle(mut self) -> Self {
        self.baseline = Baseline::Middle;
        self
    }

    fn size(mut self, px: f64) -> Self {
        self.font_size = px;
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_labels_round_halves_up() {
        assert_eq!(value_label(125.0), "0.13");
        assert_eq!(value_label(625.0), "0.63");
        assert_eq!(value_label(1125.0), "1.13");
        assert_eq!(value_label(375.0), "0.38");
    }

    #[test]
    fn value_labels_outside_ties_are_nearest() {
        assert_eq!(value_label(1000.0), "1.00");
        assert_eq!(value_label(1234.0), "1.23");
        assert_eq!(value_label(1236.0), "1.24");
        // 1.005 is stored just below the halfway point
        assert_eq!(value_label(1005.0), "1.00");
        assert_eq!(value_label(0.0), "0.00");
    }
}
