//! Membership-filter pruning for equality predicates

use crate::expr::TriState;
use crate::scalar::Scalar;

use super::context::RowGroupContext;

/// Probe the column's membership filter for an equality literal.
///
/// The filter is free of false negatives, so a negative probe is a sound
/// reason to drop the row group. A positive probe proves nothing.
pub(super) fn eval_probe(column: &str, value: &Scalar, ctx: &RowGroupContext<'_>) -> TriState {
    let Some(stats) = ctx.statistics_for(column) else {
        return TriState::Unknown;
    };
    let Some(filter) = stats.membership_filter() else {
        return TriState::Unknown;
    };
    let Some(encoded) = stats.encode_scalar(value) else {
        return TriState::Unknown;
    };
    if filter.test(&encoded) {
        TriState::Unknown
    } else {
        TriState::False
    }
}
