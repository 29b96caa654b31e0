//! Metric name and label name lists

use super::{records_csv, records_table, Records, Render, TableRender};
use crate::error::Result;
use crate::labels::label_names;
use crate::model::Sample;
use std::collections::HashSet;

/// Metric names, in the order the server listed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsResult(Vec<String>);

impl MetricsResult {
    /// Wrap `names`, dropping repeats after their first occurrence
    pub fn new(names: Vec<String>) -> Self {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for MetricsResult {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl Records for MetricsResult {
    fn headers(&self) -> Vec<String> {
        vec!["metrics".to_string()]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.0.iter().map(|name| vec![name.clone()]).collect()
    }
}

impl Render for MetricsResult {
    fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    fn csv(&self, no_headers: bool) -> Result<String> {
        records_csv(self, no_headers)
    }
}

impl TableRender for MetricsResult {
    fn table(&self, no_headers: bool) -> Result<String> {
        records_table(self, no_headers)
    }
}

/// Label names present on the samples of an instant query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelsResult(Vec<Sample>);

impl LabelsResult {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self(samples)
    }

    /// Sorted, unique label names across all samples
    pub fn names(&self) -> Vec<String> {
        label_names(self.0.iter().map(|s| &s.metric))
    }
}

impl From<Vec<Sample>> for LabelsResult {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

impl Records for LabelsResult {
    fn headers(&self) -> Vec<String> {
        vec!["labels".to_string()]
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.names().into_iter().map(|name| vec![name]).collect()
    }
}

impl Render for LabelsResult {
    fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.names())?)
    }

    fn csv(&self, no_headers: bool) -> Result<String> {
        records_csv(self, no_headers)
    }
}

impl TableRender for LabelsResult {
    fn table(&self, no_headers: bool) -> Result<String> {
        records_table(self, no_headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;

    fn metrics() -> MetricsResult {
        MetricsResult::new(vec!["my_metric".into(), "my_other_metric".into()])
    }

    fn labels() -> LabelsResult {
        let ts = Timestamp::from_secs(1_700_000_000);
        LabelsResult::new(vec![
            Sample {
                metric: [("__name__", "my_metric"), ("label", "a")].into_iter().collect(),
                value: 1.0,
                timestamp: ts,
            },
            Sample {
                metric: [("__name__", "my_metric"), ("label", "b")].into_iter().collect(),
                value: 2.0,
                timestamp: ts,
            },
        ])
    }

    #[test]
    fn test_metrics_csv() {
        assert_eq!(
            metrics().csv(false).unwrap(),
            "metrics\nmy_metric\nmy_other_metric\n"
        );
        assert_eq!(metrics().csv(true).unwrap(), "my_metric\nmy_other_metric\n");
    }

    #[test]
    fn test_metrics_table() {
        assert_eq!(
            metrics().table(false).unwrap(),
            "METRICS\nmy_metric\nmy_other_metric\n"
        );
    }

    #[test]
    fn test_metrics_json() {
        assert_eq!(
            metrics().json().unwrap(),
            r#"["my_metric","my_other_metric"]"#
        );
    }

    #[test]
    fn test_metrics_dedup_keeps_first_occurrence() {
        let result = MetricsResult::new(vec![
            "b".into(),
            "a".into(),
            "b".into(),
            "c".into(),
            "a".into(),
        ]);
        assert_eq!(result.names(), ["b", "a", "c"]);
    }

    #[test]
    fn test_labels_csv() {
        assert_eq!(labels().csv(false).unwrap(), "labels\n__name__\nlabel\n");
    }

    #[test]
    fn test_labels_table() {
        assert_eq!(labels().table(false).unwrap(), "LABELS\n__name__\nlabel\n");
        assert_eq!(labels().table(true).unwrap(), "__name__\nlabel\n");
    }

    #[test]
    fn test_labels_json() {
        assert_eq!(labels().json().unwrap(), r#"["__name__","label"]"#);
        assert_eq!(LabelsResult::default().json().unwrap(), "[]");
    }
}
