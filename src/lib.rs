//! Column-chunk statistics and row-group pruning for columnar storage.
//!
//! The write path collects per-chunk summaries — min/max, null count,
//! and optionally a probabilistic [`MembershipFilter`] and a bucketed
//! [`RangeHistogram`] — through [`ColumnStatistics`]. The read path walks
//! a predicate [`Expr`] tree against the summaries attached to each
//! [`RowGroupMetaData`] and drops every row group that provably cannot
//! contain a matching row.
//!
//! Pruning is sound but incomplete: a dropped row group never contains a
//! match, while a kept row group still needs the full predicate applied
//! at row granularity.
//!
//! ```
//! use std::sync::Arc;
//!
//! use arrow_schema::{DataType, Field, Schema};
//! use sieve::{ColumnChunkMetaData, ColumnStatistics, Expr, Pruner, RowGroupMetaData};
//!
//! # fn main() -> Result<(), sieve::SieveError> {
//! let schema = Arc::new(Schema::new(vec![Field::new("foo", DataType::Int64, true)]));
//!
//! let row_groups: Vec<RowGroupMetaData> = [(10i64, 100i64), (200, 300)]
//!     .into_iter()
//!     .map(|(min, max)| {
//!         let mut stats = ColumnStatistics::<i64>::new(None);
//!         stats.set_min_max(min, max);
//!         RowGroupMetaData::new(100, vec![ColumnChunkMetaData::new("foo", stats.into())])
//!     })
//!     .collect();
//!
//! let pruner = Pruner::try_new(schema)?;
//! let result = pruner.prune(&row_groups, &Expr::eq("foo", 42i64))?;
//! assert_eq!(result.row_groups(), &[0]);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod expr;
mod metadata;
mod prune;
mod pruner;
mod result;
mod scalar;
mod stats;

pub use error::SieveError;
pub use expr::{CmpOp, Expr, TriState};
pub use metadata::{ColumnChunkMetaData, RowGroupMetaData};
pub use prune::{PruneOptions, PruneOptionsBuilder, prune_row_groups};
pub use pruner::Pruner;
pub use result::PruneResult;
pub use scalar::{Scalar, StatType};
pub use stats::{
    BloomFilterEntry, ColumnStatistics, ColumnStatisticsOpts, HistogramEntry, MembershipFilter,
    RangeHistogram, Statistics, StatisticsOpts, StatisticsOptsBuilder,
};
