//! Column discovery
//!
//! Label sets differ from series to series, so the columns of a table or CSV
//! rendering are only known once the result is in hand: they are the union
//! of every label name in the result, sorted by byte order so the same query
//! always yields the same column order.

use crate::error::{RenderError, Result};
use crate::model::{LabelSet, QueryValue};
use std::collections::BTreeSet;

/// Sorted, de-duplicated label names across all series of a query result.
///
/// Only `vector` and `matrix` results carry label sets; any other result
/// type is rejected.
pub fn unique_labels(result: &QueryValue) -> Result<Vec<String>> {
    match result {
        QueryValue::Vector(samples) => Ok(label_names(samples.iter().map(|s| &s.metric))),
        QueryValue::Matrix(streams) => Ok(label_names(streams.iter().map(|s| &s.metric))),
        other => Err(RenderError::UnsupportedResult(other.type_name())),
    }
}

/// Sorted union of the names in the given label sets
pub(crate) fn label_names<'a, I>(sets: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a LabelSet>,
{
    let names: BTreeSet<&str> = sets.into_iter().flat_map(LabelSet::names).collect();
    names.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sample, SamplePair, SampleStream, StringSample, Timestamp};

    fn sample(pairs: &[(&str, &str)]) -> Sample {
        Sample {
            metric: pairs.iter().map(|(k, v)| (*k, *v)).collect(),
            value: 1.0,
            timestamp: Timestamp::from_secs(1_700_000_000),
        }
    }

    #[test]
    fn test_vector_labels_sorted_and_unique() {
        let result = QueryValue::Vector(vec![
            sample(&[("__name__", "up"), ("job", "node"), ("instance", "a")]),
            sample(&[("__name__", "up"), ("job", "api")]),
            sample(&[("zone", "eu"), ("Job", "x")]),
        ]);

        let labels = unique_labels(&result).unwrap();
        assert_eq!(labels, vec!["Job", "__name__", "instance", "job", "zone"]);
    }

    #[test]
    fn test_labels_are_union_of_all_samples() {
        let samples = vec![
            sample(&[("a", "1")]),
            sample(&[("b", "2"), ("a", "3")]),
            sample(&[]),
            sample(&[("c", "4")]),
        ];
        let expected: BTreeSet<String> = samples
            .iter()
            .flat_map(|s| s.metric.names().map(str::to_owned))
            .collect();

        let labels = unique_labels(&QueryValue::Vector(samples)).unwrap();

        assert!(labels.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(labels.into_iter().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn test_matrix_labels() {
        let result = QueryValue::Matrix(vec![
            SampleStream {
                metric: [("job", "node"), ("__name__", "up")].into_iter().collect(),
                values: vec![],
            },
            SampleStream {
                metric: [("cpu", "0")].into_iter().collect(),
                values: vec![SamplePair::new(Timestamp::from_secs(1), 2.0)],
            },
        ]);

        assert_eq!(
            unique_labels(&result).unwrap(),
            vec!["__name__", "cpu", "job"]
        );
    }

    #[test]
    fn test_empty_results_have_no_columns() {
        assert!(unique_labels(&QueryValue::Vector(vec![])).unwrap().is_empty());
        assert!(unique_labels(&QueryValue::Matrix(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_result_types() {
        let scalar = QueryValue::Scalar(SamplePair::new(Timestamp::from_secs(1), 1.0));
        match unique_labels(&scalar) {
            Err(RenderError::UnsupportedResult(kind)) => assert_eq!(kind, "scalar"),
            other => panic!("Expected UnsupportedResult, got {:?}", other),
        }

        let string = QueryValue::String(StringSample(Timestamp::from_secs(1), "x".to_string()));
        let err = unique_labels(&string).unwrap_err();
        assert!(err.to_string().contains("unknown query result type: string"));
    }
}
