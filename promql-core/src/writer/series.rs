//! Series matching a selector

use super::{records_csv, records_table, Records, Render, TableRender};
use crate::error::Result;
use crate::labels::label_names;
use crate::model::LabelSet;

/// Label sets returned by the series endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesResult(Vec<LabelSet>);

impl SeriesResult {
    pub fn new(series: Vec<LabelSet>) -> Self {
        Self(series)
    }

    pub fn series(&self) -> &[LabelSet] {
        &self.0
    }
}

impl From<Vec<LabelSet>> for SeriesResult {
    fn from(series: Vec<LabelSet>) -> Self {
        Self::new(series)
    }
}

/// Only the discovered label columns; series carry no values
impl Records for SeriesResult {
    fn headers(&self) -> Vec<String> {
        label_names(&self.0)
    }

    fn records(&self) -> Vec<Vec<String>> {
        let columns = self.headers();
        self.0
            .iter()
            .map(|set| {
                columns
                    .iter()
                    .map(|name| set.get(name).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }
}

impl Render for SeriesResult {
    fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    fn csv(&self, no_headers: bool) -> Result<String> {
        // no columns at all
        if self.0.is_empty() {
            return Ok(String::new());
        }
        records_csv(self, no_headers)
    }
}

impl TableRender for SeriesResult {
    fn table(&self, no_headers: bool) -> Result<String> {
        if self.0.is_empty() {
            return Ok(String::new());
        }
        records_table(self, no_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> SeriesResult {
        SeriesResult::new(vec![
            [("__name__", "up"), ("job", "node")].into_iter().collect(),
            [("__name__", "up"), ("instance", "localhost:9090")]
                .into_iter()
                .collect(),
        ])
    }

    #[test]
    fn test_table() {
        assert_eq!(
            series().table(false).unwrap(),
            "__NAME__    INSTANCE          JOB\n\
             up                            node\n\
             up          localhost:9090    \n"
        );
    }

    #[test]
    fn test_csv() {
        assert_eq!(
            series().csv(false).unwrap(),
            "__name__,instance,job\nup,,node\nup,localhost:9090,\n"
        );
    }

    #[test]
    fn test_json() {
        let value: serde_json::Value = serde_json::from_str(&series().json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"__name__": "up", "job": "node"},
                {"__name__": "up", "instance": "localhost:9090"}
            ])
        );
    }

    #[test]
    fn test_empty() {
        let result = SeriesResult::default();
        assert_eq!(result.table(false).unwrap(), "");
        assert_eq!(result.csv(false).unwrap(), "");
        assert_eq!(result.json().unwrap(), "[]");
    }
}
