use arrow_schema::{Schema, SchemaRef};

use crate::error::SieveError;
use crate::expr::Expr;
use crate::metadata::RowGroupMetaData;
use crate::prune::{PruneOptions, prune_row_groups};
use crate::result::PruneResult;

/// Reusable pruning façade for a fixed schema.
///
/// Validates predicates against the schema before evaluation, so a
/// misspelled column or a literal of the wrong scalar kind surfaces as an
/// error instead of silently degrading every decision to "keep".
///
/// # Thread Safety
///
/// `Pruner` is `Send` and `Sync`; all methods take `&self` and evaluation
/// is a pure function over the supplied metadata, so one instance can be
/// shared across reader threads via `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use arrow_schema::{DataType, Field, Schema};
/// use sieve::{ColumnChunkMetaData, ColumnStatistics, Expr, Pruner, RowGroupMetaData};
///
/// # fn main() -> Result<(), sieve::SieveError> {
/// let schema = Arc::new(Schema::new(vec![Field::new("age", DataType::Int32, true)]));
/// let pruner = Pruner::try_new(schema)?;
///
/// let mut stats = ColumnStatistics::<i32>::new(None);
/// stats.update(21);
/// stats.update(35);
/// let row_groups = vec![RowGroupMetaData::new(
///     2,
///     vec![ColumnChunkMetaData::new("age", stats.into())],
/// )];
///
/// let result = pruner.prune(&row_groups, &Expr::gt("age", 40i32))?;
/// assert!(result.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Pruner {
    schema: SchemaRef,
    options: PruneOptions,
}

impl Pruner {
    /// Creates a new `Pruner` with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is empty (has no fields).
    pub fn try_new(schema: SchemaRef) -> Result<Self, SieveError> {
        Self::try_with_options(schema, PruneOptions::default())
    }

    /// Creates a new `Pruner` with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is empty (has no fields).
    pub fn try_with_options(schema: SchemaRef, options: PruneOptions) -> Result<Self, SieveError> {
        if schema.fields().is_empty() {
            return Err(SieveError::EmptySchema);
        }
        Ok(Self { schema, options })
    }

    /// Returns a reference to the underlying schema.
    pub fn schema(&self) -> &Schema {
        self.schema.as_ref()
    }

    /// Returns a reference to the pruning options.
    pub fn options(&self) -> &PruneOptions {
        &self.options
    }

    /// Filter `row_groups` down to those that may satisfy `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error when the predicate references a column the schema
    /// does not have, or compares a column against a literal of a
    /// different scalar kind. Row groups with absent or insufficient
    /// statistics are kept, never errored on.
    pub fn prune(
        &self,
        row_groups: &[RowGroupMetaData],
        predicate: &Expr,
    ) -> Result<PruneResult, SieveError> {
        self.validate(predicate)?;
        Ok(prune_row_groups(row_groups, predicate, &self.options))
    }

    fn validate(&self, predicate: &Expr) -> Result<(), SieveError> {
        match predicate {
            Expr::True | Expr::False => Ok(()),
            Expr::Cmp { column, value, .. } | Expr::FilterProbe { column, value } => {
                self.check_literal(column, value)
            }
            Expr::Between {
                column, low, high, ..
            } => {
                self.check_literal(column, low)?;
                self.check_literal(column, high)
            }
            Expr::IsNull { column, .. } => self.check_column(column).map(|_| ()),
            Expr::And(parts) | Expr::Or(parts) => {
                parts.iter().try_for_each(|part| self.validate(part))
            }
            Expr::Not(inner) => self.validate(inner),
        }
    }

    fn check_column(&self, column: &str) -> Result<&arrow_schema::Field, SieveError> {
        self.schema
            .field_with_name(column)
            .map_err(|_| SieveError::ColumnNotFound {
                column: column.to_string(),
            })
    }

    fn check_literal(&self, column: &str, value: &crate::Scalar) -> Result<(), SieveError> {
        let field = self.check_column(column)?;
        if field.data_type() != &value.data_type() {
            return Err(SieveError::TypeMismatch {
                expected: field.data_type().clone(),
                actual: value.data_type(),
            });
        }
        Ok(())
    }
}
