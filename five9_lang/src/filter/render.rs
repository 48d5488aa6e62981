//! Rendering filter trees back to text

use super::ast::{FilterExpr, FilterTerm, InlineCondition};

const NULL_VALUE: &str = "null";

/// Renders the compact form: `(1 AND 2) OR 3`.
pub fn render_compact(expr: &FilterExpr<usize>) -> String {
    let mut output = String::new();
    write_compact(&mut output, expr);
    output
}

fn write_compact(output: &mut String, expr: &FilterExpr<usize>) {
    for (position, term) in expr.terms.iter().enumerate() {
        if position > 0 {
            output.push_str(&format!(" {} ", expr.operators[position - 1]));
        }
        match term {
            FilterTerm::Leaf(index) => output.push_str(&index.to_string()),
            FilterTerm::Group(inner) => {
                output.push('(');
                write_compact(output, inner);
                output.push(')');
            }
        }
    }
}

/// Renders one inline condition: `[state Equals "CA"][1]`.
pub fn render_condition(inline: &InlineCondition) -> String {
    let condition = &inline.condition;
    format!(
        "[{} {} \"{}\"][{}]",
        condition.left_value,
        condition.compare_operator,
        condition.right_value.as_deref().unwrap_or(NULL_VALUE),
        inline.index
    )
}

/// Renders the pretty form.
///
/// Each opening parenthesis ends its line and indents the group by one
/// tab; the closing parenthesis returns to the outer level on its own
/// line. Every operator starts a new line at the current level.
///
/// ```text
/// (
///     [state Equals "CA"][1]
///     OR [state Equals "OR"][2]
/// )
/// AND [balance Greater "0"][3]
/// ```
pub fn render_pretty(expr: &FilterExpr<InlineCondition>) -> String {
    let mut output = String::new();
    write_pretty(&mut output, expr, 0);
    output
}

fn write_pretty(output: &mut String, expr: &FilterExpr<InlineCondition>, level: usize) {
    for (position, term) in expr.terms.iter().enumerate() {
        if position > 0 {
            output.push('\n');
            output.push_str(&indent(level));
            output.push_str(&format!("{} ", expr.operators[position - 1]));
        }
        match term {
            FilterTerm::Leaf(inline) => output.push_str(&render_condition(inline)),
            FilterTerm::Group(inner) => {
                output.push_str("(\n");
                output.push_str(&indent(level + 1));
                write_pretty(output, inner, level + 1);
                output.push('\n');
                output.push_str(&indent(level));
                output.push(')');
            }
        }
    }
}

fn indent(level: usize) -> String {
    "\t".repeat(level)
}
