//! Row-group metadata as consumed by the pruning pass.
//!
//! This is the boundary to the surrounding file-format layer: per row
//! group, a row count plus each column chunk's statistics (or an explicit
//! absence). The pruner treats it as read-only.

use crate::stats::Statistics;

/// One column's slice of a row group.
#[derive(Clone, Debug)]
pub struct ColumnChunkMetaData {
    path: String,
    statistics: Option<Statistics>,
}

impl ColumnChunkMetaData {
    /// Describe a column chunk with collected statistics.
    pub fn new(path: impl Into<String>, statistics: Statistics) -> Self {
        Self {
            path: path.into(),
            statistics: Some(statistics),
        }
    }

    /// Describe a column chunk whose statistics were never collected.
    pub fn without_statistics(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            statistics: None,
        }
    }

    /// Dotted column path within the schema.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The chunk's statistics, `None` when never collected.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }
}

/// A horizontal partition of the dataset: a row count plus one chunk of
/// metadata per column.
#[derive(Clone, Debug)]
pub struct RowGroupMetaData {
    num_rows: u64,
    columns: Vec<ColumnChunkMetaData>,
}

impl RowGroupMetaData {
    pub fn new(num_rows: u64, columns: Vec<ColumnChunkMetaData>) -> Self {
        Self { num_rows, columns }
    }

    /// Total row count, nulls included.
    pub fn num_rows(&self) -> u64 {
        self.num_rows
    }

    /// All column chunks, in schema order.
    pub fn columns(&self) -> &[ColumnChunkMetaData] {
        &self.columns
    }

    /// Look up one column chunk by path.
    pub fn column(&self, path: &str) -> Option<&ColumnChunkMetaData> {
        self.columns.iter().find(|column| column.path() == path)
    }
}
