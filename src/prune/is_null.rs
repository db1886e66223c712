use crate::expr::TriState;

use super::context::RowGroupContext;

pub(super) fn eval_is_null(column: &str, negated: bool, ctx: &RowGroupContext<'_>) -> TriState {
    let Some(stats) = ctx.statistics_for(column) else {
        return TriState::Unknown;
    };
    let nulls = stats.num_nulls();
    let base = if nulls == 0 {
        TriState::False
    } else if nulls == ctx.row_count() {
        TriState::True
    } else {
        TriState::Unknown
    };
    if negated { base.not() } else { base }
}
