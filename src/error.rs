use arrow_schema::DataType;
use thiserror::Error;

/// Errors surfaced by statistics construction, merging, and decoding.
///
/// Merge mismatches indicate a configuration inconsistency across a
/// column's chunks and are reported rather than silently absorbed.
/// Pruning itself never fails: a row group whose statistics cannot be
/// interpreted is conservatively kept.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SieveError {
    /// Two membership filters with different sizing were merged.
    #[error(
        "membership filter sizing differs: {left_bits} bits/{left_hashes} hashes vs {right_bits} bits/{right_hashes} hashes"
    )]
    FilterSizeMismatch {
        /// Bit-array length of the destination filter
        left_bits: u64,
        /// Hash-function count of the destination filter
        left_hashes: u32,
        /// Bit-array length of the other filter
        right_bits: u64,
        /// Hash-function count of the other filter
        right_hashes: u32,
    },

    /// Two histograms with different domains or bucket counts were merged.
    #[error("histogram domains or bucket counts differ: {left_buckets} vs {right_buckets} buckets")]
    HistogramMismatch {
        /// Bucket count of the destination histogram
        left_buckets: usize,
        /// Bucket count of the other histogram
        right_buckets: usize,
    },

    /// Persisted min/max bytes had the wrong length for the scalar type.
    #[error("invalid encoded scalar: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Byte width the scalar type encodes to
        expected: usize,
        /// Length of the rejected input
        actual: usize,
    },

    /// A value or peer statistics object did not match the column's scalar type.
    #[error("type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        /// Scalar type of the statistics
        expected: DataType,
        /// Scalar type that was supplied
        actual: DataType,
    },

    /// Statistics were requested for a type this crate does not summarize.
    #[error("unsupported column type for statistics: {data_type:?}")]
    UnsupportedType {
        /// The unsupported type
        data_type: DataType,
    },

    /// A statistics option referenced a column missing from the schema.
    #[error("column '{column}' not found in schema")]
    ColumnNotFound {
        /// Name of the column that was not found
        column: String,
    },

    /// Histogram construction parameters do not describe a usable domain.
    #[error("invalid histogram: {reason}")]
    InvalidHistogram {
        /// Why the parameters were rejected
        reason: String,
    },

    /// A serialized filter or histogram blob failed structural validation.
    #[error("malformed {what} encoding: {reason}")]
    MalformedBlob {
        /// Which structure was being decoded
        what: &'static str,
        /// Why the bytes were rejected
        reason: String,
    },

    /// A schema with no fields was supplied.
    #[error("schema must have at least one field")]
    EmptySchema,
}
