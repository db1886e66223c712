//! Comparison operator evaluation (=, !=, <, <=, >, >=)

use std::cmp::Ordering;

use log::debug;

use crate::expr::{CmpOp, TriState};
use crate::scalar::{Scalar, StatType};
use crate::stats::{ColumnStatistics, Statistics};

use super::{context::RowGroupContext, histogram, is_null};

pub(super) fn eval_cmp(
    column: &str,
    op: CmpOp,
    value: &Scalar,
    ctx: &RowGroupContext<'_>,
) -> TriState {
    if value.is_null() {
        // Equality to null is an is-null test; no value orders against null.
        return match op {
            CmpOp::Eq => is_null::eval_is_null(column, false, ctx),
            CmpOp::NotEq => is_null::eval_is_null(column, true, ctx),
            CmpOp::Lt | CmpOp::LtEq | CmpOp::Gt | CmpOp::GtEq => TriState::False,
        };
    }
    let Some(stats) = ctx.statistics_for(column) else {
        return TriState::Unknown;
    };
    match stats {
        Statistics::Int32(stats) => eval_cmp_typed(op, value, stats, ctx),
        Statistics::Int64(stats) => eval_cmp_typed(op, value, stats, ctx),
        Statistics::Float32(stats) => eval_cmp_typed(op, value, stats, ctx),
        Statistics::Float64(stats) => eval_cmp_typed(op, value, stats, ctx),
    }
}

fn eval_cmp_typed<T: StatType>(
    op: CmpOp,
    literal: &Scalar,
    stats: &ColumnStatistics<T>,
    ctx: &RowGroupContext<'_>,
) -> TriState {
    let Some(value) = T::from_scalar(literal) else {
        debug!(
            "literal {literal} does not match column type {:?}; keeping row group",
            T::data_type()
        );
        return TriState::Unknown;
    };

    // A chunk holding nothing but nulls has no value to satisfy a value
    // comparison. Inequality is exempt: a null row still counts as "not
    // equal" for pruning purposes.
    if !matches!(op, CmpOp::NotEq) && stats.num_nulls() == ctx.row_count() {
        return TriState::False;
    }

    let (Some(min), Some(max)) = (stats.min_opt(), stats.max_opt()) else {
        return TriState::Unknown;
    };
    let min_cmp = min.partial_cmp(&value);
    let max_cmp = max.partial_cmp(&value);
    let nulls = stats.num_nulls();

    let tri = match op {
        CmpOp::Eq => {
            if min_cmp == Some(Ordering::Greater) || max_cmp == Some(Ordering::Less) {
                return TriState::False;
            }
            if min == max && min == value && nulls == 0 {
                return TriState::True;
            }
            TriState::Unknown
        }
        CmpOp::NotEq => {
            // a null row still counts as "not equal", so a constant chunk
            // only fails inequality when it has no nulls either
            if min == max && min == value && nulls == 0 {
                return TriState::False;
            }
            if (min_cmp == Some(Ordering::Greater) || max_cmp == Some(Ordering::Less)) && nulls == 0
            {
                return TriState::True;
            }
            TriState::Unknown
        }
        CmpOp::Lt => {
            if min_cmp == Some(Ordering::Greater) || min_cmp == Some(Ordering::Equal) {
                return TriState::False;
            }
            if max_cmp == Some(Ordering::Less) && nulls == 0 {
                return TriState::True;
            }
            TriState::Unknown
        }
        CmpOp::LtEq => {
            if min_cmp == Some(Ordering::Greater) {
                return TriState::False;
            }
            if (max_cmp == Some(Ordering::Less) || max_cmp == Some(Ordering::Equal)) && nulls == 0 {
                return TriState::True;
            }
            TriState::Unknown
        }
        CmpOp::Gt => {
            if max_cmp == Some(Ordering::Less) || max_cmp == Some(Ordering::Equal) {
                return TriState::False;
            }
            if min_cmp == Some(Ordering::Greater) && nulls == 0 {
                return TriState::True;
            }
            TriState::Unknown
        }
        CmpOp::GtEq => {
            if max_cmp == Some(Ordering::Less) {
                return TriState::False;
            }
            if (min_cmp == Some(Ordering::Greater) || min_cmp == Some(Ordering::Equal)) && nulls == 0
            {
                return TriState::True;
            }
            TriState::Unknown
        }
    };

    // Histogram coverage is a stricter necessary condition than min/max
    // for the ordering operators.
    if ctx.options.enable_histogram()
        && matches!(op, CmpOp::Lt | CmpOp::LtEq | CmpOp::Gt | CmpOp::GtEq)
    {
        if let Some(histogram) = stats.histogram() {
            if histogram::refine_cmp(op, value, histogram) == TriState::False {
                return TriState::False;
            }
        }
    }

    tri
}
