use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Side};

/// Fixed gap between each half of the chart and the centre line.
pub const GUTTER: f64 = 30.0;

/// One group of the vertical axis (e.g. an age band) with its two opposing values.
///
/// The JSON field names (`age`, `male`, `female`) are the wire format used by
/// saved state and earlier exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    #[serde(rename = "age", deserialize_with = "de_label_from_string_or_number")]
    pub group: String,
    #[serde(rename = "male", deserialize_with = "de_f64_from_string_or_number")]
    pub value_a: f64,
    #[serde(rename = "female", deserialize_with = "de_f64_from_string_or_number")]
    pub value_b: f64,
}

impl Row {
    pub fn new(group: impl Into<String>, value_a: f64, value_b: f64) -> Self {
        Self {
            group: group.into(),
            value_a,
            value_b,
        }
    }

    /// Parse the JSON wire form: an array of `{ "age", "male", "female" }` objects.
    pub fn parse_json(text: &str) -> Result<Vec<Row>, ChartError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Serde helper: group labels may be written as strings (`"0-4"`) or bare numbers (`5`).
fn de_label_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct LabelVisitor;

    impl<'de> Visitor<'de> for LabelVisitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or number naming the group")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(s.to_string())
        }
    }

    deserializer.deserialize_any(LabelVisitor)
}

/// Serde helper: values are JSON numbers, but numeric strings (`"1200"`) are accepted too.
fn de_f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number or a string holding a number")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v as f64)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<f64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

/// Everything the layout engine needs besides the canvas geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub rows: Vec<Row>,
    pub source: Option<String>,
}

impl ChartRequest {
    pub fn new(title: impl Into<String>, rows: Vec<Row>, source: Option<String>) -> Self {
        Self {
            title: title.into(),
            rows,
            source,
        }
    }

    /// Source citation, if one was given and is not blank.
    pub fn source_label(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }

    /// Check the row invariants: at least one row, every value finite and non-negative.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.rows.is_empty() {
            return Err(ChartError::EmptyRows);
        }
        for (i, row) in self.rows.iter().enumerate() {
            for (side, value) in [(Side::A, row.value_a), (Side::B, row.value_b)] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ChartError::InvalidValue {
                        row: i,
                        side,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Space reserved around the plot for title, captions and legend overflow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 100.0,
            right: 80.0,
            bottom: 50.0,
            left: 80.0,
        }
    }
}

/// Names of the two opposing categories, used for captions and the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideLabels {
    pub a: String,
    pub b: String,
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            a: "Male".into(),
            b: "Female".into(),
        }
    }
}

/// Plot geometry. `width`/`height` are the inner plot size, margins excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub labels: SideLabels,
}

impl LayoutConfig {
    /// Derive the plot size from a full surface size and its margins.
    pub fn for_surface(surface_width: u32, surface_height: u32, margins: Margins) -> Self {
        Self {
            width: surface_width as f64 - margins.left - margins.right,
            height: surface_height as f64 - margins.top - margins.bottom,
            margins,
            labels: SideLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: SideLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Size of the rendering surface: plot plus margins, in whole pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        let w = self.width + self.margins.left + self.margins.right;
        let h = self.height + self.margins.top + self.margins.bottom;
        (w.round().max(1.0) as u32, h.round().max(1.0) as u32)
    }
}

impl Default for LayoutConfig {
    /// 1024×768 surface with the standard margins (an 864×618 plot).
    fn default() -> Self {
        Self::for_surface(1024, 768, Margins::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_accept_strings_and_numbers() {
        let rows = Row::parse_json(
            r#"[{"age":"0-4","male":1000,"female":900},{"age":5,"male":"800","female":1.5e3}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].group, "0-4");
        assert_eq!(rows[1].group, "5");
        assert_eq!(rows[1].value_a, 800.0);
        assert_eq!(rows[1].value_b, 1500.0);
    }

    #[test]
    fn non_numeric_value_is_malformed() {
        let err = Row::parse_json(r#"[{"age":"0-4","male":"lots","female":1}]"#).unwrap_err();
        assert!(matches!(err, ChartError::MalformedData(_)));
    }

    #[test]
    fn validate_rejects_negative_and_empty() {
        let empty = ChartRequest::new("t", vec![], None);
        assert!(matches!(empty.validate(), Err(ChartError::EmptyRows)));

        let neg = ChartRequest::new("t", vec![Row::new("0-4", 1.0, -2.0)], None);
        match neg.validate() {
            Err(ChartError::InvalidValue { row, side, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(side, Side::B);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn default_config_is_1024_by_768() {
        let cfg = LayoutConfig::default();
        assert_eq!(cfg.width, 864.0);
        assert_eq!(cfg.height, 618.0);
        assert_eq!(cfg.surface_size(), (1024, 768));
    }

    #[test]
    fn blank_source_is_no_source() {
        let req = ChartRequest::new("t", vec![Row::new("a", 1.0, 1.0)], Some(String::new()));
        assert_eq!(req.source_label(), None);
    }
}
