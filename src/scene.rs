//! The drawing tree: an ordered, immutable list of positioned primitives.
//!
//! Coordinates are absolute surface pixels (margins already applied). Renderers
//! walk the list in order; later shapes paint over earlier ones.

use serde::{Deserialize, Serialize};

use crate::style::Rgb;

/// What a shape represents in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    BarA,
    BarB,
    SurplusA,
    SurplusB,
    AxisLabel,
    ValueLabelA,
    ValueLabelB,
    SideCaption,
    LegendSwatch,
    LegendText,
    Title,
    Subtitle,
    Source,
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// Vertical text alignment relative to `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Baseline {
    /// `y` is the alphabetic baseline.
    Alphabetic,
    /// `y` is the vertical centre of the glyphs.
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
        role: Role,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        anchor: Anchor,
        baseline: Baseline,
        font_size: f64,
        bold: bool,
        fill: Rgb,
        role: Role,
    },
}

impl Shape {
    pub fn role(&self) -> Role {
        match self {
            Shape::Rect { role, .. } | Shape::Text { role, .. } => *role,
        }
    }

    /// Text content, for text shapes.
    pub fn text(&self) -> Option<&str> {
        match self {
            Shape::Text { content, .. } => Some(content),
            Shape::Rect { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingTree {
    pub width: u32,
    pub height: u32,
    pub shapes: Vec<Shape>,
}

impl DrawingTree {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Shapes tagged with `role`, in drawing order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |s| s.role() == role)
    }

    pub fn count(&self, role: Role) -> usize {
        self.with_role(role).count()
    }

    /// Text contents of all shapes tagged with `role`.
    pub fn texts(&self, role: Role) -> Vec<&str> {
        self.with_role(role).filter_map(Shape::text).collect()
    }
}
