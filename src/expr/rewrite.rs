//! Internal rewrite passes run before row-group evaluation.
//!
//! Membership-filter probes are injected in positive (non-negated)
//! polarity only. Range fusing rewrites a same-column pair of bounds
//! inside an AND into a single BETWEEN, so the histogram is consulted
//! with the narrowed range instead of two half-ranges.

use super::{CmpOp, Expr};

/// Inject membership-filter probes next to equality predicates.
pub(crate) fn inject_filter_probes(expr: Expr) -> Expr {
    inject_filter_probes_inner(expr, true)
}

fn inject_filter_probes_inner(expr: Expr, allow_probe: bool) -> Expr {
    match expr {
        Expr::Cmp { column, op, value }
            if allow_probe && matches!(op, CmpOp::Eq) && !value.is_null() =>
        {
            let probe = Expr::FilterProbe {
                column: column.clone(),
                value,
            };
            Expr::And(vec![Expr::Cmp { column, op, value }, probe])
        }
        Expr::And(parts) => Expr::And(
            parts
                .into_iter()
                .map(|part| inject_filter_probes_inner(part, allow_probe))
                .collect(),
        ),
        Expr::Or(parts) => Expr::Or(
            parts
                .into_iter()
                .map(|part| inject_filter_probes_inner(part, allow_probe))
                .collect(),
        ),
        Expr::Not(inner) => Expr::Not(Box::new(inject_filter_probes_inner(*inner, !allow_probe))),
        other => other,
    }
}

/// Fuse same-column bound pairs inside each AND into BETWEEN nodes.
///
/// Only pairs of equal strictness fuse (`>` with `<`, `>=` with `<=`);
/// a mixed pair keeps its leaf-level evaluation, which is weaker for the
/// histogram but never wrong.
pub(crate) fn fuse_range_conjunctions(expr: Expr) -> Expr {
    match expr {
        Expr::And(parts) => Expr::And(fuse_and_parts(parts)),
        Expr::Or(parts) => Expr::Or(
            parts
                .into_iter()
                .map(fuse_range_conjunctions)
                .collect(),
        ),
        Expr::Not(inner) => Expr::Not(Box::new(fuse_range_conjunctions(*inner))),
        other => other,
    }
}

fn fuse_and_parts(parts: Vec<Expr>) -> Vec<Expr> {
    let mut out: Vec<Expr> = Vec::with_capacity(parts.len());
    for part in parts {
        let part = fuse_range_conjunctions(part);
        let fused = out
            .iter()
            .enumerate()
            .find_map(|(idx, existing)| try_fuse(existing, &part).map(|b| (idx, b)));
        match fused {
            Some((idx, between)) => out[idx] = between,
            None => out.push(part),
        }
    }
    out
}

fn try_fuse(a: &Expr, b: &Expr) -> Option<Expr> {
    let (
        Expr::Cmp {
            column: col_a,
            op: op_a,
            value: val_a,
        },
        Expr::Cmp {
            column: col_b,
            op: op_b,
            value: val_b,
        },
    ) = (a, b)
    else {
        return None;
    };
    if col_a != col_b
        || val_a.is_null()
        || val_b.is_null()
        || val_a.data_type() != val_b.data_type()
    {
        return None;
    }
    let (low, high, inclusive) = match (op_a, op_b) {
        (CmpOp::Gt, CmpOp::Lt) => (val_a, val_b, false),
        (CmpOp::Lt, CmpOp::Gt) => (val_b, val_a, false),
        (CmpOp::GtEq, CmpOp::LtEq) => (val_a, val_b, true),
        (CmpOp::LtEq, CmpOp::GtEq) => (val_b, val_a, true),
        _ => return None,
    };
    Some(Expr::Between {
        column: col_a.clone(),
        low: *low,
        high: *high,
        inclusive,
    })
}
