//! Expression tree shared by the compact and pretty filter forms

use std::fmt;

use five9_core::Condition;

/// Boolean connective between two terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "AND"),
            BoolOp::Or => write!(f, "OR"),
        }
    }
}

/// A leaf or a parenthesized sub-expression
#[derive(Debug, Clone, PartialEq)]
pub enum FilterTerm<L> {
    Leaf(L),
    Group(FilterExpr<L>),
}

/// A flat chain of terms joined by operators.
///
/// `operators[i]` sits between `terms[i]` and `terms[i + 1]`, so an
/// expression with `n` terms has `n - 1` operators. The empty expression
/// has neither.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr<L> {
    pub terms: Vec<FilterTerm<L>>,
    pub operators: Vec<BoolOp>,
}

impl<L> Default for FilterExpr<L> {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            operators: Vec::new(),
        }
    }
}

impl<L> FilterExpr<L> {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Leaves in reading order.
    pub fn leaves(&self) -> Vec<&L> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }

    /// Rebuilds the tree with each leaf transformed, visiting leaves in reading order.
    pub fn try_map_leaves<M, E>(
        &self,
        f: &mut impl FnMut(&L) -> Result<M, E>,
    ) -> Result<FilterExpr<M>, E> {
        let mut terms = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            terms.push(match term {
                FilterTerm::Leaf(leaf) => FilterTerm::Leaf(f(leaf)?),
                FilterTerm::Group(inner) => FilterTerm::Group(inner.try_map_leaves(f)?),
            });
        }
        Ok(FilterExpr {
            terms,
            operators: self.operators.clone(),
        })
    }
}

fn collect_leaves<'a, L>(expr: &'a FilterExpr<L>, leaves: &mut Vec<&'a L>) {
    for term in &expr.terms {
        match term {
            FilterTerm::Leaf(leaf) => leaves.push(leaf),
            FilterTerm::Group(inner) => collect_leaves(inner, leaves),
        }
    }
}

/// Compact form: leaves are condition numbers.
pub type CompactExpr = FilterExpr<usize>;

/// A condition written inline in the pretty form, with its number.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineCondition {
    pub condition: Condition,
    pub index: usize,
}

/// Pretty form: leaves carry the condition text.
pub type PrettyExpr = FilterExpr<InlineCondition>;
