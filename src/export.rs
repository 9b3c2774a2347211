//! Export adapter: write a rendered chart as an SVG or JPEG file.
//!
//! Both exports take the tree as `Option`: when no chart has been generated yet
//! they do nothing and report [`ExportOutcome::NothingToExport`].

use anyhow::{Context, Result};
use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use regex::Regex;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::scene::DrawingTree;
use crate::viz;

/// JPEG quality used for raster exports.
pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Jpeg => "jpg",
        }
    }

    /// Infer the format from a file extension (`.svg`, `.jpg`, `.jpeg`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(ExportFormat::Svg),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, bytes: usize },
    NothingToExport,
}

fn unsafe_file_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("static regex"))
}

/// `chart_<title>.<ext>`, with characters that are not allowed in file names replaced by `_`.
pub fn export_file_name(title: &str, format: ExportFormat) -> String {
    let safe = unsafe_file_chars().replace_all(title, "_");
    format!("chart_{}.{}", safe, format.extension())
}

/// Serialized SVG markup for `tree`.
pub fn svg_markup(tree: &DrawingTree) -> Result<String> {
    viz::render_svg(tree)
}

/// Rasterize `tree` on white at `width`×`height` and encode it as JPEG.
pub fn jpeg_bytes(tree: &DrawingTree, width: u32, height: u32) -> Result<Vec<u8>> {
    // Rendering finishes before encoding starts.
    let rgb = viz::render_rgb(tree, width, height)?;
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode(&rgb, width, height, ExtendedColorType::Rgb8)
        .context("encoding JPEG")?;
    Ok(out)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<ExportOutcome> {
    let mut f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    f.write_all(bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        bytes: bytes.len(),
    })
}

/// Save the chart as SVG. No-op without a chart.
pub fn export_svg<P: AsRef<Path>>(tree: Option<&DrawingTree>, path: P) -> Result<ExportOutcome> {
    let Some(tree) = tree else {
        return Ok(ExportOutcome::NothingToExport);
    };
    let markup = svg_markup(tree)?;
    write_file(path.as_ref(), markup.as_bytes())
}

/// Save the chart as a `width`×`height` JPEG. No-op without a chart.
pub fn export_jpeg<P: AsRef<Path>>(
    tree: Option<&DrawingTree>,
    path: P,
    width: u32,
    height: u32,
) -> Result<ExportOutcome> {
    let Some(tree) = tree else {
        return Ok(ExportOutcome::NothingToExport);
    };
    let bytes = jpeg_bytes(tree, width, height)?;
    write_file(path.as_ref(), &bytes)
}

/// Save the chart in `format`, rasterizing at the chart's own surface size.
pub fn export<P: AsRef<Path>>(
    tree: Option<&DrawingTree>,
    path: P,
    format: ExportFormat,
) -> Result<ExportOutcome> {
    match (format, tree) {
        (ExportFormat::Svg, _) => export_svg(tree, path),
        (ExportFormat::Jpeg, Some(t)) => export_jpeg(tree, path, t.width, t.height),
        (ExportFormat::Jpeg, None) => Ok(ExportOutcome::NothingToExport),
    }
}
