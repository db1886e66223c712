use log::{debug, trace};

use crate::expr::{Expr, TriState, rewrite};
use crate::metadata::RowGroupMetaData;
use crate::result::PruneResult;

use super::context::RowGroupContext;
use super::eval;
use super::options::PruneOptions;

/// Filter a sequence of row groups against a predicate.
///
/// A single pass over the sequence: each row group whose statistics
/// prove it cannot contain a matching row is dropped, everything else is
/// kept in original order. The decision is sound but incomplete —
/// callers still apply the full predicate at row granularity to the
/// survivors.
pub fn prune_row_groups(
    row_groups: &[RowGroupMetaData],
    predicate: &Expr,
    options: &PruneOptions,
) -> PruneResult {
    let predicate = prepared(predicate.clone(), options);
    let mut kept = Vec::new();
    for (idx, row_group) in row_groups.iter().enumerate() {
        let ctx = RowGroupContext { row_group, options };
        if eval::eval_expr(&predicate, &ctx) == TriState::False {
            trace!("row group {idx} cannot match {predicate}; dropped");
            continue;
        }
        kept.push(idx);
    }
    debug!(
        "kept {} of {} row groups for {predicate}",
        kept.len(),
        row_groups.len()
    );
    PruneResult::new(kept)
}

/// Run the rewrite passes the enabled facets want.
fn prepared(predicate: Expr, options: &PruneOptions) -> Expr {
    let predicate = if options.enable_histogram() {
        rewrite::fuse_range_conjunctions(predicate)
    } else {
        predicate
    };
    if options.enable_membership_filter() {
        rewrite::inject_filter_probes(predicate)
    } else {
        predicate
    }
}
