//! Instant query results

use super::{records_csv, records_table, Records, Render, TableRender};
use crate::error::Result;
use crate::labels::label_names;
use crate::model::{format_value, Sample};

/// Samples returned by an instant query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstantResult(Vec<Sample>);

impl InstantResult {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    fn columns(&self) -> Vec<String> {
        label_names(self.0.iter().map(|s| &s.metric))
    }
}

impl From<Vec<Sample>> for InstantResult {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl Records for InstantResult {
    fn headers(&self) -> Vec<String> {
        let mut headers = self.columns();
        headers.push("value".to_string());
        headers.push("timestamp".to_string());
        headers
    }

    fn records(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        self.0
            .iter()
            .map(|sample| {
                let mut row: Vec<String> = columns
                    .iter()
                    .map(|name| sample.metric.get(name).unwrap_or_default().to_string())
                    .collect();
                row.push(format_value(sample.value));
                row.push(sample.timestamp.rfc3339());
                row
            })
            .collect()
    }
}

impl Render for InstantResult {
    fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    fn csv(&self, no_headers: bool) -> Result<String> {
        records_csv(self, no_headers)
    }
}

impl TableRender for InstantResult {
    fn table(&self, no_headers: bool) -> Result<String> {
        records_table(self, no_headers)
    }
}
