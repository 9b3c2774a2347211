/// Error types for chart input validation and layout.
use thiserror::Error;

/// Which of the two opposing values of a row an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Wire names of the two value fields.
            Side::A => write!(f, "male"),
            Side::B => write!(f, "female"),
        }
    }
}

/// Errors raised before any shape is drawn.
#[derive(Error, Debug)]
pub enum ChartError {
    /// A required input field (title or data) was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The data field was not a JSON array of row objects.
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// The data parsed but contained no rows.
    #[error("no rows to plot")]
    EmptyRows,

    /// A value was negative, NaN or infinite.
    #[error("invalid value in row {row} ({side}): {value}")]
    InvalidValue { row: usize, side: Side, value: f64 },

    /// The plot is not wider than the two gutters.
    #[error("plot width {width} must exceed twice the gutter ({gutter})")]
    CanvasTooNarrow { width: f64, gutter: f64 },
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::MalformedData(err.to_string())
    }
}

impl From<csv::Error> for ChartError {
    fn from(err: csv::Error) -> Self {
        ChartError::MalformedData(err.to_string())
    }
}
