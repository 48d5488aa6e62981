//! Campaign profile filter expressions.
//!
//! The vendor stores a custom filter as a list of conditions plus a compact
//! grouping expression that refers to them by number: `(1 AND 2) OR 3`.
//! [`demystify`] inlines the conditions and indents the expression so a
//! person can read it; [`remystify`] turns that text back into an
//! expression and a condition list.

pub mod ast;
pub mod parser;
pub mod render;

use log::warn;

use five9_core::{CampaignProfileFilter, Condition, Grouping, GroupingType};

pub use ast::{BoolOp, CompactExpr, FilterExpr, FilterTerm, InlineCondition, PrettyExpr};
pub use parser::{FilterError, parse_expression, parse_pretty};
pub use render::{render_compact, render_pretty};

/// Inlines each condition into the expression and pretty-prints it.
///
/// Condition numbers are 1-based positions in `conditions`. An empty
/// expression yields an empty string.
pub fn demystify(expression: &str, conditions: &[Condition]) -> Result<String, FilterError> {
    let compact = parse_expression(expression)?;
    let mut referenced = vec![false; conditions.len()];

    let pretty = compact.try_map_leaves(&mut |index: &usize| {
        let index = *index;
        let condition = index
            .checked_sub(1)
            .and_then(|position| conditions.get(position))
            .ok_or(FilterError::UnknownCondition {
                index,
                available: conditions.len(),
            })?;
        referenced[index - 1] = true;
        Ok::<InlineCondition, FilterError>(InlineCondition {
            condition: condition.clone(),
            index,
        })
    })?;

    if !pretty.is_empty() {
        for (position, used) in referenced.iter().enumerate() {
            if !used {
                warn!(
                    "Condition {} is not referenced by the expression and will be dropped",
                    position + 1
                );
            }
        }
    }

    Ok(render_pretty(&pretty))
}

/// Demystifies the expression of a campaign profile filter.
pub fn demystify_filter(filter: &CampaignProfileFilter) -> Result<String, FilterError> {
    demystify(filter.expression(), &filter.crm_criteria)
}

/// Re-renders demystified text. Applying it twice gives the same text.
pub fn prettify(pretty_text: &str) -> Result<String, FilterError> {
    Ok(render_pretty(&parse_pretty(pretty_text)?))
}

/// Turns demystified text back into a compact expression and its conditions.
///
/// Conditions are listed in order of first appearance with duplicates
/// removed, and the expression is renumbered to match.
pub fn remystify(pretty_text: &str) -> Result<(String, Vec<Condition>), FilterError> {
    let pretty = parse_pretty(pretty_text)?;
    let mut conditions: Vec<Condition> = Vec::new();

    let compact = pretty.try_map_leaves(&mut |inline: &InlineCondition| {
        let position = match conditions.iter().position(|c| *c == inline.condition) {
            Some(position) => position,
            None => {
                conditions.push(inline.condition.clone());
                conditions.len() - 1
            }
        };
        Ok::<usize, FilterError>(position + 1)
    })?;

    Ok((render_compact(&compact), conditions))
}

/// Builds a custom campaign profile filter from demystified text.
pub fn remystify_filter(pretty_text: &str) -> Result<CampaignProfileFilter, FilterError> {
    let (expression, crm_criteria) = remystify(pretty_text)?;
    let grouping = if expression.is_empty() {
        Grouping::default()
    } else {
        Grouping {
            expression: Some(expression),
            grouping_type: GroupingType::Custom,
        }
    };
    Ok(CampaignProfileFilter {
        grouping,
        crm_criteria,
        order_by_fields: Vec::new(),
    })
}

/// Recovers the compact expression from demystified text, keeping the
/// condition numbers as written.
pub fn flatten(pretty_text: &str) -> Result<String, FilterError> {
    let pretty = parse_pretty(pretty_text)?;
    let compact = pretty.try_map_leaves(&mut |inline: &InlineCondition| {
        Ok::<usize, FilterError>(inline.index)
    })?;
    Ok(render_compact(&compact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use five9_core::CompareOperator;

    fn conditions() -> Vec<Condition> {
        vec![
            Condition::new("state", CompareOperator::Equals, Some("CA")),
            Condition::new("state", CompareOperator::Equals, Some("OR")),
            Condition::new("balance", CompareOperator::Greater, Some("0")),
        ]
    }

    #[test]
    fn test_demystify_flat() {
        let text = demystify("1 OR 2", &conditions()).unwrap();
        assert_eq!(
            text,
            "[state Equals \"CA\"][1]\nOR [state Equals \"OR\"][2]"
        );
    }

    #[test]
    fn test_demystify_nested() {
        let text = demystify("(1 OR 2) AND 3", &conditions()).unwrap();
        assert_eq!(
            text,
            "(\n\t[state Equals \"CA\"][1]\n\tOR [state Equals \"OR\"][2]\n)\nAND [balance Greater \"0\"][3]"
        );
    }

    #[test]
    fn test_demystify_unknown_condition() {
        assert_eq!(
            demystify("1 AND 4", &conditions()),
            Err(FilterError::UnknownCondition {
                index: 4,
                available: 3
            })
        );
        assert!(matches!(
            demystify("0", &conditions()),
            Err(FilterError::UnknownCondition { index: 0, .. })
        ));
    }

    #[test]
    fn test_demystify_empty() {
        assert_eq!(demystify("", &[]).unwrap(), "");
        assert_eq!(demystify("", &conditions()).unwrap(), "");
    }

    #[test]
    fn test_null_right_value() {
        let conditions = vec![Condition::new("email", CompareOperator::Equals, None)];
        let text = demystify("1", &conditions).unwrap();
        assert_eq!(text, "[email Equals \"null\"][1]");

        let (_, parsed) = remystify(&text).unwrap();
        assert_eq!(parsed, conditions);
    }

    #[test]
    fn test_remystify_renumbers_by_first_appearance() {
        let text = demystify("3 AND (2 OR 1)", &conditions()).unwrap();
        let (expression, parsed) = remystify(&text).unwrap();

        assert_eq!(expression, "1 AND (2 OR 3)");
        assert_eq!(parsed[0], conditions()[2]);
        assert_eq!(parsed[2], conditions()[0]);
    }

    #[test]
    fn test_remystify_deduplicates_conditions() {
        let text = demystify("(1 AND 3) OR (2 AND 3)", &conditions()).unwrap();
        let (expression, parsed) = remystify(&text).unwrap();
        assert_eq!(expression, "(1 AND 2) OR (3 AND 2)");
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_flatten_keeps_numbers() {
        let text = demystify("3 AND (2 OR 1)", &conditions()).unwrap();
        assert_eq!(flatten(&text).unwrap(), "3 AND (2 OR 1)");
    }

    #[test]
    fn test_remystify_filter_sets_custom_grouping() {
        let text = demystify("1 OR 2", &conditions()).unwrap();
        let filter = remystify_filter(&text).unwrap();
        assert_eq!(filter.grouping.grouping_type, GroupingType::Custom);
        assert_eq!(filter.expression(), "1 OR 2");
        assert_eq!(filter.crm_criteria.len(), 2);

        let empty = remystify_filter("").unwrap();
        assert_eq!(empty.grouping.grouping_type, GroupingType::All);
        assert!(empty.crm_criteria.is_empty());
    }
}
