//! Metric metadata

use super::{records_csv, records_table, Records, Render, TableRender};
use crate::error::Result;
use crate::model::Metadata;
use std::collections::BTreeMap;

/// Metadata records keyed by metric name.
///
/// A metric exposed by several targets with differing help text has one
/// record per variant, each rendered as its own row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaResult(BTreeMap<String, Vec<Metadata>>);

impl MetaResult {
    pub fn new(metadata: BTreeMap<String, Vec<Metadata>>) -> Self {
        Self(metadata)
    }

    pub fn metadata(&self) -> &BTreeMap<String, Vec<Metadata>> {
        &self.0
    }
}

impl From<BTreeMap<String, Vec<Metadata>>> for MetaResult {
    fn from(metadata: BTreeMap<String, Vec<Metadata>>) -> Self {
        Self::new(metadata)
    }
}

impl Records for MetaResult {
    fn headers(&self) -> Vec<String> {
        ["metric", "type", "help", "unit"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn records(&self) -> Vec<Vec<String>> {
        self.0
            .iter()
            .flat_map(|(metric, records)| {
                records.iter().map(move |m| {
                    vec![
                        metric.clone(),
                        m.metric_type.clone(),
                        m.help.clone(),
                        m.unit.clone(),
                    ]
                })
            })
            .collect()
    }
}

impl Render for MetaResult {
    fn json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    fn csv(&self, no_headers: bool) -> Result<String> {
        records_csv(self, no_headers)
    }
}

impl TableRender for MetaResult {
    fn table(&self, no_headers: bool) -> Result<String> {
        records_table(self, no_headers)
    }
}
