//! The three-field input form and its submit checks.

use crate::error::ChartError;
use crate::models::{ChartRequest, Row};
use crate::storage::PersistedState;

/// Raw form contents: a title, the row data as JSON text, and an optional source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    pub title: String,
    pub data: String,
    pub source: String,
}

impl FormInput {
    pub fn new(
        title: impl Into<String>,
        data: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            data: data.into(),
            source: source.into(),
        }
    }

    /// Check presence of title and data, then parse and validate the rows.
    ///
    /// Nothing is drawn or saved when this fails.
    pub fn submit(&self) -> Result<ChartRequest, ChartError> {
        if self.title.trim().is_empty() {
            return Err(ChartError::MissingField("title"));
        }
        if self.data.trim().is_empty() {
            return Err(ChartError::MissingField("data"));
        }
        let rows = Row::parse_json(&self.data)?;
        let source = (!self.source.is_empty()).then(|| self.source.clone());
        let request = ChartRequest::new(self.title.clone(), rows, source);
        request.validate()?;
        Ok(request)
    }

    pub fn to_state(&self) -> PersistedState {
        PersistedState {
            title: self.title.clone(),
            data: self.data.clone(),
            source: self.source.clone(),
        }
    }
}

impl From<PersistedState> for FormInput {
    fn from(s: PersistedState) -> Self {
        Self {
            title: s.title,
            data: s.data,
            source: s.source,
        }
    }
}

/// Convert CSV with an `age,male,female` header into the JSON row form.
pub fn rows_json_from_csv(text: &str) -> Result<String, ChartError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for rec in rdr.deserialize::<Row>() {
        rows.push(rec?);
    }
    Ok(serde_json::to_string_pretty(&rows)?)
}
