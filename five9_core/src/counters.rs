//! API rate-limit counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::de::{number, one_or_many};

/// Usage of one operation type within a counter window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
    pub operation_type: String,
    #[serde(deserialize_with = "number")]
    pub value: u64,
    #[serde(deserialize_with = "number")]
    pub limit: u64,
}

/// All counters for one window length (`timeout`, in seconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallCounterState {
    #[serde(deserialize_with = "number")]
    pub timeout: u64,
    #[serde(default, deserialize_with = "one_or_many")]
    pub call_counter_states: Vec<CounterState>,
}

/// Formats counters grouped by operation type.
///
/// Operation types are sorted by name and each type's windows by timeout:
///
/// ```text
/// ReportingQuery:
///     60:       2/10
///   3600:       5/100
/// ```
pub fn format_api_usage(counters: &[CallCounterState]) -> String {
    let mut by_operation: BTreeMap<&str, Vec<(u64, String)>> = BTreeMap::new();

    for counter in counters {
        for state in &counter.call_counter_states {
            by_operation
                .entry(state.operation_type.as_str())
                .or_default()
                .push((
                    counter.timeout,
                    format!("{:>5}: {:>7}/{}", counter.timeout, state.value, state.limit),
                ));
        }
    }

    by_operation
        .into_iter()
        .map(|(operation_type, mut usages)| {
            usages.sort();
            let lines: Vec<String> = usages.into_iter().map(|(_, line)| format!("\t{}", line)).collect();
            format!("{}:\n{}", operation_type, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_groups_and_sorts() {
        let counters: Vec<CallCounterState> = serde_json::from_value(json!([
            {"timeout": "3600", "callCounterStates": [
                {"operationType": "Query", "value": "5", "limit": "100"},
                {"operationType": "Modify", "value": "1", "limit": "50"}
            ]},
            {"timeout": "60", "callCounterStates": {"operationType": "Query", "value": "2", "limit": "10"}}
        ]))
        .unwrap();

        let formatted = format_api_usage(&counters);
        assert_eq!(
            formatted,
            "Modify:\n\t 3600:       1/50\n\nQuery:\n\t   60:       2/10\n\t 3600:       5/100"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_api_usage(&[]), "");
    }
}
