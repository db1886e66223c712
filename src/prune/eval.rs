//! Expression evaluation over one row group's statistics.
//!
//! # Architecture
//!
//! ```text
//! eval_expr (dispatcher)
//!     ├─> cmp::eval_cmp            (=, !=, <, >, ...)
//!     ├─> between::eval_between    (range with histogram refinement)
//!     ├─> bloom::eval_probe        (membership filter check)
//!     └─> is_null::eval_is_null    (null / not-null)
//! ```
//!
//! Every verdict is sound for pruning: `False` is returned only when no
//! row in the group can match, and `True` only when every row provably
//! matches, so `Not` inverts cleanly and a statistics-insufficient leaf
//! stays `Unknown` under any nesting.

use crate::expr::{Expr, TriState};

use super::{between, bloom, cmp, context::RowGroupContext, is_null};

pub(super) fn eval_expr(expr: &Expr, ctx: &RowGroupContext<'_>) -> TriState {
    match expr {
        Expr::True => TriState::True,
        Expr::False => TriState::False,
        Expr::Cmp { column, op, value } => cmp::eval_cmp(column, *op, value, ctx),
        Expr::Between {
            column,
            low,
            high,
            inclusive,
        } => between::eval_between(column, low, high, *inclusive, ctx),
        Expr::FilterProbe { column, value } => bloom::eval_probe(column, value, ctx),
        Expr::IsNull { column, negated } => is_null::eval_is_null(column, *negated, ctx),
        Expr::And(parts) => parts
            .iter()
            .fold(TriState::True, |acc, expr| acc.and(eval_expr(expr, ctx))),
        Expr::Or(parts) => parts
            .iter()
            .fold(TriState::False, |acc, expr| acc.or(eval_expr(expr, ctx))),
        Expr::Not(inner) => eval_expr(inner, ctx).not(),
    }
}
