use crate::expr::{CmpOp, TriState};
use crate::scalar::Scalar;

use super::{cmp, context::RowGroupContext, histogram};

pub(super) fn eval_between(
    column: &str,
    low: &Scalar,
    high: &Scalar,
    inclusive: bool,
    ctx: &RowGroupContext<'_>,
) -> TriState {
    let op_low = if inclusive { CmpOp::GtEq } else { CmpOp::Gt };
    let op_high = if inclusive { CmpOp::LtEq } else { CmpOp::Lt };
    let low_eval = cmp::eval_cmp(column, op_low, low, ctx);
    let high_eval = cmp::eval_cmp(column, op_high, high, ctx);
    let tri = low_eval.and(high_eval);
    if tri == TriState::False || !ctx.options.enable_histogram() {
        return tri;
    }
    // The bound comparisons above consult the histogram with two
    // half-ranges; the narrowed range between the bounds can rule out
    // row groups neither half-range can.
    if histogram::refine_range(column, low, high, ctx) == TriState::False {
        return TriState::False;
    }
    tri
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ColumnChunkMetaData, RowGroupMetaData};
    use crate::prune::options::PruneOptions;
    use crate::stats::{ColumnStatistics, ColumnStatisticsOpts, HistogramEntry};

    fn row_group_with_values(min: i32, max: i32, values: &[i32]) -> RowGroupMetaData {
        let opts =
            ColumnStatisticsOpts::new(None, Some(HistogramEntry::new(0.0, 150.0, 5).unwrap()));
        let mut stats = ColumnStatistics::<i32>::new(Some(&opts));
        for &v in values {
            stats.add(v);
        }
        stats.set_min_max(min, max);
        RowGroupMetaData::new(
            values.len() as u64,
            vec![ColumnChunkMetaData::new("foo", stats.into())],
        )
    }

    #[test]
    fn narrowed_range_drops_what_half_ranges_cannot() {
        // min/max and both half-ranges admit this chunk; only the
        // narrowed [30, 40] range shows its buckets are empty there
        let rg = row_group_with_values(8, 102, &[12, 28, 90]);
        let options = PruneOptions::default();
        let ctx = RowGroupContext {
            row_group: &rg,
            options: &options,
        };
        assert_eq!(
            eval_between("foo", &Scalar::from(30i32), &Scalar::from(40i32), false, &ctx),
            TriState::False
        );
        assert_eq!(
            eval_between("foo", &Scalar::from(20i32), &Scalar::from(40i32), false, &ctx),
            TriState::Unknown
        );
    }

    #[test]
    fn histogram_refinement_can_be_disabled() {
        let rg = row_group_with_values(8, 102, &[12, 28, 90]);
        let options = PruneOptions::builder().enable_histogram(false).build();
        let ctx = RowGroupContext {
            row_group: &rg,
            options: &options,
        };
        assert_eq!(
            eval_between("foo", &Scalar::from(30i32), &Scalar::from(40i32), false, &ctx),
            TriState::Unknown
        );
    }

    #[test]
    fn min_max_alone_still_bounds_the_range() {
        let rg = row_group_with_values(8, 20, &[12, 18]);
        let options = PruneOptions::default();
        let ctx = RowGroupContext {
            row_group: &rg,
            options: &options,
        };
        assert_eq!(
            eval_between("foo", &Scalar::from(30i32), &Scalar::from(40i32), true, &ctx),
            TriState::False
        );
    }
}
