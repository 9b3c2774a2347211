//! pyramid_rs
//!
//! Lay out, render and export population-pyramid charts: two opposing
//! horizontal bar series (e.g. male/female) across ordered groups (e.g. age
//! bands). Pairs with the `pyramid` CLI and the `pyramid-gui` desktop app.
//!
//! ### Features
//! - Pure layout engine producing an immutable drawing tree
//! - Surplus overlays showing the excess of one side over the other
//! - SVG export and JPEG export on a white background
//! - Last-used inputs persisted in a small key-value state file
//!
//! ### Example
//! ```no_run
//! use pyramid_rs::{ChartRequest, LayoutConfig, Row, layout};
//!
//! let request = ChartRequest::new(
//!     "Population 2020",
//!     vec![Row::new("0-4", 1000.0, 900.0), Row::new("5-9", 800.0, 1200.0)],
//!     Some("UN".into()),
//! );
//! let tree = layout::layout(&request, &LayoutConfig::default())?;
//! pyramid_rs::export::export_svg(Some(&tree), "chart_Population 2020.svg")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod app;
pub mod error;
pub mod export;
pub mod form;
pub mod layout;
pub mod models;
pub mod scale;
pub mod scene;
pub mod storage;
pub mod style;
pub mod viz;

pub use app::App;
pub use error::ChartError;
pub use models::{ChartRequest, LayoutConfig, Margins, Row, SideLabels};
pub use scene::{DrawingTree, Role, Shape};
