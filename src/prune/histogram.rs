//! Histogram refinement for ordering and range predicates
//!
//! The histogram records every non-null value a chunk saw, so a query
//! range whose intersecting buckets are all empty cannot match any row.
//! Query bounds are converted to the column's native type at this
//! boundary; a bound of the wrong kind leaves the verdict inconclusive.

use crate::expr::{CmpOp, TriState};
use crate::scalar::{Scalar, StatType};
use crate::stats::{ColumnStatistics, RangeHistogram, Statistics};

use super::context::RowGroupContext;

/// Refine one ordering comparison with the closed clamped sub-range it
/// implies: `< v` / `<= v` cover `[domain_min, v]`, `> v` / `>= v` cover
/// `[v, domain_max]`. The closed approximation keeps strictly more than
/// the predicate requires, never less.
pub(super) fn refine_cmp<T: StatType>(
    op: CmpOp,
    value: T,
    histogram: &RangeHistogram<T>,
) -> TriState {
    let (lo, hi) = match op {
        CmpOp::Lt | CmpOp::LtEq => (histogram.domain_min(), value),
        CmpOp::Gt | CmpOp::GtEq => (value, histogram.domain_max()),
        CmpOp::Eq | CmpOp::NotEq => return TriState::Unknown,
    };
    if histogram.overlaps(lo, hi) {
        TriState::Unknown
    } else {
        TriState::False
    }
}

/// Refine a range predicate with its own bounds, narrower than the two
/// half-range checks the bound comparisons perform individually.
pub(super) fn refine_range(
    column: &str,
    low: &Scalar,
    high: &Scalar,
    ctx: &RowGroupContext<'_>,
) -> TriState {
    let Some(stats) = ctx.statistics_for(column) else {
        return TriState::Unknown;
    };
    match stats {
        Statistics::Int32(stats) => refine_range_typed(low, high, stats),
        Statistics::Int64(stats) => refine_range_typed(low, high, stats),
        Statistics::Float32(stats) => refine_range_typed(low, high, stats),
        Statistics::Float64(stats) => refine_range_typed(low, high, stats),
    }
}

fn refine_range_typed<T: StatType>(
    low: &Scalar,
    high: &Scalar,
    stats: &ColumnStatistics<T>,
) -> TriState {
    let Some(histogram) = stats.histogram() else {
        return TriState::Unknown;
    };
    let (Some(lo), Some(hi)) = (T::from_scalar(low), T::from_scalar(high)) else {
        return TriState::Unknown;
    };
    if histogram.overlaps(lo, hi) {
        TriState::Unknown
    } else {
        TriState::False
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram_with(values: &[i32]) -> RangeHistogram<i32> {
        let mut h = RangeHistogram::new(0, 150, 5).unwrap();
        for &v in values {
            h.insert(v);
        }
        h
    }

    #[test]
    fn half_range_refinement_uses_domain_edges() {
        let h = histogram_with(&[12, 28, 90]);
        // values exist below 40, none above 100
        assert_eq!(refine_cmp(CmpOp::Lt, 40, &h), TriState::Unknown);
        assert_eq!(refine_cmp(CmpOp::Gt, 120, &h), TriState::False);
        // [90, 150] shares a bucket with the inserted 90
        assert_eq!(refine_cmp(CmpOp::GtEq, 95, &h), TriState::Unknown);
    }

    #[test]
    fn bounds_outside_the_domain_still_consult_edge_buckets() {
        let h = histogram_with(&[-10, 200]);
        // clamped inserts live in the edge buckets, so out-of-domain
        // half-ranges stay inconclusive
        assert_eq!(refine_cmp(CmpOp::Lt, -5, &h), TriState::Unknown);
        assert_eq!(refine_cmp(CmpOp::Gt, 180, &h), TriState::Unknown);
    }

    #[test]
    fn equality_is_not_refined_by_the_histogram() {
        let h = histogram_with(&[]);
        assert_eq!(refine_cmp(CmpOp::Eq, 10, &h), TriState::Unknown);
    }
}
