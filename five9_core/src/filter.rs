//! Campaign profile filter types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::de::one_or_many;
use crate::records::Record;

/// Comparison operators a filter condition can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    Equals,
    NotEqual,
    Like,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOperator {
    pub const ALL: [CompareOperator; 7] = [
        CompareOperator::Equals,
        CompareOperator::NotEqual,
        CompareOperator::Like,
        CompareOperator::Less,
        CompareOperator::LessOrEqual,
        CompareOperator::Greater,
        CompareOperator::GreaterOrEqual,
    ];

    /// The vendor's name for this operator.
    pub fn name(&self) -> &'static str {
        match self {
            CompareOperator::Equals => "Equals",
            CompareOperator::NotEqual => "NotEqual",
            CompareOperator::Like => "Like",
            CompareOperator::Less => "Less",
            CompareOperator::LessOrEqual => "LessOrEqual",
            CompareOperator::Greater => "Greater",
            CompareOperator::GreaterOrEqual => "GreaterOrEqual",
        }
    }

    /// Symbolic form, e.g. `>=`.
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOperator::Equals => "=",
            CompareOperator::NotEqual => "!=",
            CompareOperator::Like => "LIKE",
            CompareOperator::Less => "<",
            CompareOperator::LessOrEqual => "<=",
            CompareOperator::Greater => ">",
            CompareOperator::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when an operator name is not recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = CompareOperator::ALL.iter().map(|op| op.name()).collect();
        write!(
            f,
            "Unknown compare operator '{}'. Expected one of: {}",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for CompareOperator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompareOperator::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

/// A single filter condition: `left operator right`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub left_value: String,
    pub compare_operator: CompareOperator,
    #[serde(default)]
    pub right_value: Option<String>,
}

impl Condition {
    pub fn new(
        left_value: impl Into<String>,
        compare_operator: CompareOperator,
        right_value: Option<&str>,
    ) -> Self {
        Self {
            left_value: left_value.into(),
            compare_operator,
            right_value: right_value.map(str::to_string),
        }
    }
}

/// How the conditions of a filter are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GroupingType {
    #[default]
    All,
    Any,
    Custom,
}

/// The grouping of a filter. Only `Custom` groupings carry an expression.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grouping {
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(rename = "type", default)]
    pub grouping_type: GroupingType,
}

/// The filter attached to a campaign profile.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProfileFilter {
    #[serde(default)]
    pub grouping: Grouping,
    #[serde(default, deserialize_with = "one_or_many")]
    pub crm_criteria: Vec<Condition>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub order_by_fields: Vec<Record>,
}

impl CampaignProfileFilter {
    /// Whether the filter has a custom expression worth demystifying.
    pub fn has_custom_expression(&self) -> bool {
        self.grouping.grouping_type == GroupingType::Custom && !self.crm_criteria.is_empty()
    }

    /// The grouping expression, or an empty string.
    pub fn expression(&self) -> &str {
        self.grouping.expression.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_round_trips_by_name() {
        for op in CompareOperator::ALL {
            assert_eq!(op.name().parse::<CompareOperator>().unwrap(), op);
        }
        assert!("Between".parse::<CompareOperator>().is_err());
    }

    #[test]
    fn test_deserialize_filter_with_single_criterion() {
        let filter: CampaignProfileFilter = serde_json::from_value(json!({
            "grouping": {"expression": "1", "type": "Custom"},
            "crmCriteria": {"leftValue": "state", "compareOperator": "Equals", "rightValue": "CA"}
        }))
        .unwrap();

        assert_eq!(filter.crm_criteria.len(), 1);
        assert_eq!(filter.crm_criteria[0].right_value.as_deref(), Some("CA"));
        assert!(filter.has_custom_expression());
        assert!(filter.order_by_fields.is_empty());
    }

    #[test]
    fn test_all_grouping_is_not_custom() {
        let filter: CampaignProfileFilter = serde_json::from_value(json!({
            "grouping": {"type": "All"},
            "crmCriteria": [{"leftValue": "state", "compareOperator": "Equals"}]
        }))
        .unwrap();

        assert!(!filter.has_custom_expression());
        assert_eq!(filter.expression(), "");
        assert_eq!(filter.crm_criteria[0].right_value, None);
    }
}
