//! Parser for filter expressions using pest

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use five9_core::{CompareOperator, Condition};

use super::ast::{BoolOp, CompactExpr, FilterExpr, FilterTerm, InlineCondition, PrettyExpr};

#[derive(Parser)]
#[grammar = "filter/grammar.pest"]
pub struct FilterParser;

/// Error type for filter parsing
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    SyntaxError(String),
    UnknownCondition { index: usize, available: usize },
    UnknownOperator(String),
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::SyntaxError(msg) => write!(f, "Syntax error: {}", msg),
            FilterError::UnknownCondition { index, available } => write!(
                f,
                "Expression refers to condition {} but the filter has {} condition(s)",
                index, available
            ),
            FilterError::UnknownOperator(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FilterError {}

const NULL_VALUE: &str = "null";

/// Parse a compact grouping expression such as `(1 AND 2) OR 3`
pub fn parse_expression(input: &str) -> Result<CompactExpr, FilterError> {
    let root = parse_root(Rule::compact, input)?;
    build_root(root, &mut parse_index)
}

/// Parse the pretty form produced by `demystify`
pub fn parse_pretty(input: &str) -> Result<PrettyExpr, FilterError> {
    let root = parse_root(Rule::pretty, input)?;
    build_root(root, &mut parse_condition)
}

fn parse_root(rule: Rule, input: &str) -> Result<Pair<'_, Rule>, FilterError> {
    FilterParser::parse(rule, input)
        .map_err(|e| FilterError::SyntaxError(e.to_string()))?
        .next()
        .ok_or_else(|| FilterError::SyntaxError("Empty parse result".to_string()))
}

fn build_root<L>(
    root: Pair<Rule>,
    leaf: &mut impl FnMut(Pair<Rule>) -> Result<L, FilterError>,
) -> Result<FilterExpr<L>, FilterError> {
    for inner_pair in root.into_inner() {
        match inner_pair.as_rule() {
            Rule::compact_expr | Rule::pretty_expr => return build_expr(inner_pair, leaf),
            _ => {}
        }
    }
    Ok(FilterExpr::default())
}

fn build_expr<L>(
    pair: Pair<Rule>,
    leaf: &mut impl FnMut(Pair<Rule>) -> Result<L, FilterError>,
) -> Result<FilterExpr<L>, FilterError> {
    let mut expr = FilterExpr::default();

    for inner_pair in pair.into_inner() {
        match inner_pair.as_rule() {
            Rule::and_op => expr.operators.push(BoolOp::And),
            Rule::or_op => expr.operators.push(BoolOp::Or),
            Rule::compact_group | Rule::pretty_group => {
                let group_expr = inner_pair.into_inner().next().ok_or_else(|| {
                    FilterError::SyntaxError("Empty parentheses".to_string())
                })?;
                expr.terms
                    .push(FilterTerm::Group(build_expr(group_expr, leaf)?));
            }
            _ => expr.terms.push(FilterTerm::Leaf(leaf(inner_pair)?)),
        }
    }

    Ok(expr)
}

fn parse_index(pair: Pair<Rule>) -> Result<usize, FilterError> {
    if pair.as_rule() != Rule::index {
        return Err(FilterError::SyntaxError(format!(
            "Expected a condition number, found {:?}",
            pair.as_rule()
        )));
    }
    pair.as_str().parse::<usize>().map_err(|_| {
        FilterError::SyntaxError(format!("Invalid condition number: {}", pair.as_str()))
    })
}

fn parse_condition(pair: Pair<Rule>) -> Result<InlineCondition, FilterError> {
    if pair.as_rule() != Rule::condition {
        return Err(FilterError::SyntaxError(format!(
            "Expected a condition, found {:?}",
            pair.as_rule()
        )));
    }
    let text = pair.as_str().to_string();
    let mut inner = pair.into_inner();

    let mut next = |what: &str| {
        inner.next().ok_or_else(|| {
            FilterError::SyntaxError(format!("Missing {} in condition {}", what, text))
        })
    };

    let left_value = next("left value")?.as_str().to_string();
    let operator_pair = next("operator")?;
    let compare_operator = operator_pair
        .as_str()
        .parse::<CompareOperator>()
        .map_err(|e| FilterError::UnknownOperator(e.to_string()))?;
    let right = next("right value")?.as_str();
    let right_value = if right == NULL_VALUE {
        None
    } else {
        Some(right.to_string())
    };
    let index = parse_index(next("condition number")?)?;

    Ok(InlineCondition {
        condition: Condition {
            left_value,
            compare_operator,
            right_value,
        },
        index,
    })
}
