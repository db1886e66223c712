use std::ops::{BitAnd, BitOr, Not};

use crate::scalar::Scalar;

pub(crate) mod rewrite;

/// Three-valued pruning verdict for one row group.
///
/// `True` means every row provably matches, `False` means no row can
/// match (the group may be dropped), `Unknown` means the statistics are
/// not decisive and the group must be kept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TriState {
    True,
    False,
    Unknown,
}

impl TriState {
    pub(crate) fn and(self, other: Self) -> Self {
        match (self, other) {
            (TriState::False, _) | (_, TriState::False) => TriState::False,
            (TriState::True, TriState::True) => TriState::True,
            _ => TriState::Unknown,
        }
    }

    pub(crate) fn or(self, other: Self) -> Self {
        match (self, other) {
            (TriState::True, _) | (_, TriState::True) => TriState::True,
            (TriState::False, TriState::False) => TriState::False,
            _ => TriState::Unknown,
        }
    }

    pub(crate) fn not(self) -> Self {
        match self {
            TriState::True => TriState::False,
            TriState::False => TriState::True,
            TriState::Unknown => TriState::Unknown,
        }
    }
}

// Operator trait implementations for ergonomic usage
impl BitAnd for TriState {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl BitOr for TriState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl Not for TriState {
    type Output = Self;

    fn not(self) -> Self::Output {
        TriState::not(self)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

/// Expression tree evaluated against row-group statistics.
///
/// Comparisons against a null literal (`Scalar::Int32(None)` and friends)
/// follow null-predicate rules: equality to null is an is-null test,
/// inequality to null an is-not-null test, and ordering against null
/// matches nothing.
///
/// Note: this enum includes an internal variant for membership-filter
/// refinement (marked with `#[doc(hidden)]`). It is added automatically
/// during pruning and should not be constructed manually.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    True,
    False,
    Cmp {
        column: String,
        op: CmpOp,
        value: Scalar,
    },
    Between {
        column: String,
        low: Scalar,
        high: Scalar,
        inclusive: bool,
    },
    /// Internal: membership-filter equality probe (added automatically
    /// during pruning).
    ///
    /// Use [`Expr::eq`] instead; probes are injected next to equality
    /// predicates when the column carries a membership filter.
    #[doc(hidden)]
    FilterProbe {
        column: String,
        value: Scalar,
    },
    IsNull {
        column: String,
        negated: bool,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Build a comparison expression with an explicit operator.
    pub fn cmp(column: impl Into<String>, op: CmpOp, value: impl Into<Scalar>) -> Self {
        Expr::Cmp {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Build an equality expression (`=`).
    pub fn eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, CmpOp::Eq, value)
    }

    /// Build a not-equal expression (`!=`).
    pub fn not_eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, CmpOp::NotEq, value)
    }

    /// Build a less-than expression (`<`).
    pub fn lt(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, CmpOp::Lt, value)
    }

    /// Build a less-than-or-equal expression (`<=`).
    pub fn lt_eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, CmpOp::LtEq, value)
    }

    /// Build a greater-than expression (`>`).
    pub fn gt(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, CmpOp::Gt, value)
    }

    /// Build a greater-than-or-equal expression (`>=`).
    pub fn gt_eq(column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::cmp(column, CmpOp::GtEq, value)
    }

    /// Build a BETWEEN expression.
    pub fn between(
        column: impl Into<String>,
        low: impl Into<Scalar>,
        high: impl Into<Scalar>,
        inclusive: bool,
    ) -> Self {
        Expr::Between {
            column: column.into(),
            low: low.into(),
            high: high.into(),
            inclusive,
        }
    }

    /// Build an IS NULL expression.
    pub fn is_null(column: impl Into<String>) -> Self {
        Expr::IsNull {
            column: column.into(),
            negated: false,
        }
    }

    /// Build an IS NOT NULL expression.
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Expr::IsNull {
            column: column.into(),
            negated: true,
        }
    }

    /// Build an AND expression.
    pub fn and(parts: Vec<Expr>) -> Self {
        Expr::And(parts)
    }

    /// Build an OR expression.
    pub fn or(parts: Vec<Expr>) -> Self {
        Expr::Or(parts)
    }

    /// Build a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }
}

impl std::fmt::Display for Expr {
    /// User-friendly display that hides the injected probe variant.
    ///
    /// Use `Debug` formatting (`{:?}`) to see the full internal
    /// representation.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::True => write!(f, "TRUE"),
            Expr::False => write!(f, "FALSE"),
            Expr::Cmp { column, op, value } => {
                let op_str = match op {
                    CmpOp::Eq => "=",
                    CmpOp::NotEq => "!=",
                    CmpOp::Lt => "<",
                    CmpOp::LtEq => "<=",
                    CmpOp::Gt => ">",
                    CmpOp::GtEq => ">=",
                };
                write!(f, "{} {} {}", column, op_str, value)
            }
            Expr::Between {
                column,
                low,
                high,
                inclusive,
            } => {
                if *inclusive {
                    write!(f, "{} BETWEEN {} AND {}", column, low, high)
                } else {
                    write!(f, "{} > {} AND {} < {}", column, low, column, high)
                }
            }
            // Hide probe variants from user-facing output
            Expr::FilterProbe { .. } => write!(f, "<membership filter>"),
            Expr::IsNull { column, negated } => {
                if *negated {
                    write!(f, "{} IS NOT NULL", column)
                } else {
                    write!(f, "{} IS NULL", column)
                }
            }
            Expr::And(parts) => {
                if parts.is_empty() {
                    write!(f, "TRUE")
                } else if parts.len() == 1 {
                    write!(f, "{}", parts[0])
                } else {
                    write!(f, "(")?;
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            write!(f, " AND ")?;
                        }
                        write!(f, "{}", part)?;
                    }
                    write!(f, ")")
                }
            }
            Expr::Or(parts) => {
                if parts.is_empty() {
                    write!(f, "FALSE")
                } else if parts.len() == 1 {
                    write!(f, "{}", parts[0])
                } else {
                    write!(f, "(")?;
                    for (i, part) in parts.iter().enumerate() {
                        if i > 0 {
                            write!(f, " OR ")?;
                        }
                        write!(f, "{}", part)?;
                    }
                    write!(f, ")")
                }
            }
            Expr::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_hides_filter_probes() {
        // Simple equality - clean output
        let expr = Expr::eq("id", 42i64);
        assert_eq!(expr.to_string(), "id = Int64(42)");

        // Probe variant - hidden in Display
        let probe = Expr::FilterProbe {
            column: "id".to_string(),
            value: Scalar::from(42i64),
        };
        assert_eq!(probe.to_string(), "<membership filter>");

        // AND with probe - probe hidden
        let combined = Expr::and(vec![
            Expr::eq("id", 42i64),
            Expr::FilterProbe {
                column: "id".to_string(),
                value: Scalar::from(42i64),
            },
        ]);
        assert_eq!(combined.to_string(), "(id = Int64(42) AND <membership filter>)");
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Expr::True.to_string(), "TRUE");
        assert_eq!(Expr::False.to_string(), "FALSE");

        assert_eq!(Expr::gt("age", 18i32).to_string(), "age > Int32(18)");

        assert_eq!(
            Expr::between("age", 18i32, 65i32, true).to_string(),
            "age BETWEEN Int32(18) AND Int32(65)"
        );

        assert_eq!(Expr::is_null("deleted_at").to_string(), "deleted_at IS NULL");

        assert_eq!(
            Expr::not(Expr::eq("foo", 5i32)).to_string(),
            "NOT (foo = Int32(5))"
        );
    }

    #[test]
    fn tri_state_tables() {
        use TriState::*;
        assert_eq!(True & Unknown, Unknown);
        assert_eq!(False & Unknown, False);
        assert_eq!(True & True, True);
        assert_eq!(True | Unknown, True);
        assert_eq!(False | Unknown, Unknown);
        assert_eq!(False | False, False);
        assert_eq!(!Unknown, Unknown);
        assert_eq!(!True, False);
    }
}
