//! Per-column-chunk statistics: min/max, null count, and the optional
//! membership-filter and histogram facets.
//!
//! A statistics object is built single-threaded while a column chunk is
//! encoded, merged when page- or chunk-level statistics combine, and read
//! immutably at pruning time. Facet presence is fixed at construction;
//! merging with a peer that never enabled a facet is a silent no-op for
//! that facet, while merging incompatibly *sized* facets is an error.

use arrow_schema::DataType;

mod bloom;
mod histogram;
mod opts;

pub use bloom::MembershipFilter;
pub use histogram::RangeHistogram;
pub use opts::{
    BloomFilterEntry, ColumnStatisticsOpts, HistogramEntry, StatisticsOpts, StatisticsOptsBuilder,
};

use crate::error::SieveError;
use crate::scalar::{Scalar, StatType};

/// Statistics for one column chunk of scalar type `T`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnStatistics<T: StatType> {
    min_max: Option<(T, T)>,
    num_nulls: u64,
    membership: Option<MembershipFilter>,
    histogram: Option<RangeHistogram<T>>,
}

impl<T: StatType> ColumnStatistics<T> {
    /// Create empty statistics; `opts` enables the optional facets.
    pub fn new(opts: Option<&ColumnStatisticsOpts>) -> Self {
        let membership = opts
            .and_then(|o| o.bloom_filter())
            .map(|entry| MembershipFilter::with_fpp(entry.expected_entries(), entry.fpp()));
        // Degenerate converted domains are rejected when the options are
        // built against a schema, so the fallible construction cannot
        // discard anything here.
        let histogram = opts.and_then(|o| o.histogram()).and_then(|entry| {
            RangeHistogram::new(
                T::from_f64(entry.domain_min()),
                T::from_f64(entry.domain_max()),
                entry.bucket_count(),
            )
            .ok()
        });
        Self {
            min_max: None,
            num_nulls: 0,
            membership,
            histogram,
        }
    }

    /// Record one non-null value: extends min/max and feeds the enabled
    /// facets.
    pub fn update(&mut self, value: T) {
        match &mut self.min_max {
            None => self.min_max = Some((value, value)),
            Some((min, max)) => {
                // NaN compares false both ways and leaves min/max alone
                if value < *min {
                    *min = value;
                }
                if value > *max {
                    *max = value;
                }
            }
        }
        self.add(value);
    }

    /// Feed a value into the enabled facets without touching min/max.
    ///
    /// Used when min/max arrive separately, e.g. when re-populating
    /// facets for a chunk whose bounds were taken from page headers.
    pub fn add(&mut self, value: T) {
        if let Some(filter) = &mut self.membership {
            filter.insert(value.encode().as_ref());
        }
        if let Some(histogram) = &mut self.histogram {
            histogram.insert(value);
        }
    }

    /// Record one null value.
    pub fn increment_nulls(&mut self) {
        self.num_nulls += 1;
    }

    /// Overwrite the null count (used when reconstructing statistics from
    /// persisted metadata).
    pub fn set_num_nulls(&mut self, num_nulls: u64) {
        self.num_nulls = num_nulls;
    }

    /// Install min/max directly, marking the statistics non-empty.
    pub fn set_min_max(&mut self, min: T, max: T) {
        self.min_max = Some((min, max));
    }

    /// Combine another chunk's statistics into this one.
    ///
    /// Null counts add; min/max extend (a peer without values leaves them
    /// untouched); facets merge only when both sides enabled them, and a
    /// sizing mismatch is reported without having touched min/max or the
    /// null count.
    pub fn merge(&mut self, other: &Self) -> Result<(), SieveError> {
        if let (Some(mine), Some(theirs)) = (&mut self.membership, &other.membership) {
            mine.merge(theirs)?;
        }
        if let (Some(mine), Some(theirs)) = (&mut self.histogram, &other.histogram) {
            mine.merge(theirs)?;
        }
        self.num_nulls += other.num_nulls;
        if let Some((other_min, other_max)) = other.min_max {
            match &mut self.min_max {
                None => self.min_max = Some((other_min, other_max)),
                Some((min, max)) => {
                    if other_min < *min {
                        *min = other_min;
                    }
                    if other_max > *max {
                        *max = other_max;
                    }
                }
            }
        }
        Ok(())
    }

    /// Smallest recorded value, `None` until a non-null value exists.
    pub fn min_opt(&self) -> Option<T> {
        self.min_max.map(|(min, _)| min)
    }

    /// Largest recorded value, `None` until a non-null value exists.
    pub fn max_opt(&self) -> Option<T> {
        self.min_max.map(|(_, max)| max)
    }

    /// Count of null values observed or merged in.
    pub fn num_nulls(&self) -> u64 {
        self.num_nulls
    }

    /// Whether min/max are defined.
    pub fn has_non_null_value(&self) -> bool {
        self.min_max.is_some()
    }

    /// Whether nothing at all (value or null) has been recorded.
    pub fn is_empty(&self) -> bool {
        self.min_max.is_none() && self.num_nulls == 0
    }

    /// The membership filter, if enabled for this column.
    pub fn membership_filter(&self) -> Option<&MembershipFilter> {
        self.membership.as_ref()
    }

    /// The histogram, if enabled for this column.
    pub fn histogram(&self) -> Option<&RangeHistogram<T>> {
        self.histogram.as_ref()
    }

    /// Encoded min, `None` until a non-null value exists.
    pub fn min_bytes_opt(&self) -> Option<Vec<u8>> {
        self.min_opt().map(|min| min.encode().as_ref().to_vec())
    }

    /// Encoded max, `None` until a non-null value exists.
    pub fn max_bytes_opt(&self) -> Option<Vec<u8>> {
        self.max_opt().map(|max| max.encode().as_ref().to_vec())
    }

    /// Install min/max from their persisted encodings, marking the
    /// statistics non-empty. Input of the wrong width is rejected and
    /// leaves the statistics unchanged.
    pub fn set_min_max_from_bytes(
        &mut self,
        min_bytes: &[u8],
        max_bytes: &[u8],
    ) -> Result<(), SieveError> {
        let min = T::decode(min_bytes)?;
        let max = T::decode(max_bytes)?;
        self.set_min_max(min, max);
        Ok(())
    }

    /// Whether persisting this object's min/max is estimated to fit in
    /// `size` bytes. The scalar payload is a fixed 16 bytes regardless of
    /// value magnitude; the check exists for parity with variable-length
    /// column types whose bounds can grow without limit.
    pub fn is_smaller_than(&self, size: u64) -> bool {
        !self.has_non_null_value() || 16 < size
    }
}

impl<T: StatType> std::fmt::Display for ColumnStatistics<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.min_max {
            Some((min, max)) => {
                write!(f, "min: {}, max: {}, num_nulls: {}", min, max, self.num_nulls)
            }
            None if self.num_nulls > 0 => {
                write!(f, "num_nulls: {}, min/max not defined", self.num_nulls)
            }
            None => write!(f, "no stats for this column"),
        }
    }
}

/// Type-erased statistics as carried in row-group metadata.
#[derive(Clone, Debug, PartialEq)]
pub enum Statistics {
    Int32(ColumnStatistics<i32>),
    Int64(ColumnStatistics<i64>),
    Float32(ColumnStatistics<f32>),
    Float64(ColumnStatistics<f64>),
}

macro_rules! dispatch {
    ($self:ident, $stats:ident => $body:expr) => {
        match $self {
            Statistics::Int32($stats) => $body,
            Statistics::Int64($stats) => $body,
            Statistics::Float32($stats) => $body,
            Statistics::Float64($stats) => $body,
        }
    };
}

impl Statistics {
    /// Create empty statistics for a column of `data_type`.
    pub fn try_new(
        data_type: &DataType,
        opts: Option<&ColumnStatisticsOpts>,
    ) -> Result<Self, SieveError> {
        match data_type {
            DataType::Int32 => Ok(Statistics::Int32(ColumnStatistics::new(opts))),
            DataType::Int64 => Ok(Statistics::Int64(ColumnStatistics::new(opts))),
            DataType::Float32 => Ok(Statistics::Float32(ColumnStatistics::new(opts))),
            DataType::Float64 => Ok(Statistics::Float64(ColumnStatistics::new(opts))),
            other => Err(SieveError::UnsupportedType {
                data_type: other.clone(),
            }),
        }
    }

    /// The scalar type these statistics summarize.
    pub fn data_type(&self) -> DataType {
        match self {
            Statistics::Int32(_) => DataType::Int32,
            Statistics::Int64(_) => DataType::Int64,
            Statistics::Float32(_) => DataType::Float32,
            Statistics::Float64(_) => DataType::Float64,
        }
    }

    /// Record one literal of the matching type; a null literal counts as
    /// a null.
    pub fn update(&mut self, value: &Scalar) -> Result<(), SieveError> {
        if value.is_null() {
            if value.data_type() != self.data_type() {
                return Err(self.type_mismatch(value.data_type()));
            }
            dispatch!(self, stats => stats.increment_nulls());
            return Ok(());
        }
        let mismatch = self.type_mismatch(value.data_type());
        match self {
            Statistics::Int32(stats) => match i32::from_scalar(value) {
                Some(v) => stats.update(v),
                None => return Err(mismatch),
            },
            Statistics::Int64(stats) => match i64::from_scalar(value) {
                Some(v) => stats.update(v),
                None => return Err(mismatch),
            },
            Statistics::Float32(stats) => match f32::from_scalar(value) {
                Some(v) => stats.update(v),
                None => return Err(mismatch),
            },
            Statistics::Float64(stats) => match f64::from_scalar(value) {
                Some(v) => stats.update(v),
                None => return Err(mismatch),
            },
        }
        Ok(())
    }

    /// Combine another chunk's statistics of the same type into this one.
    pub fn merge(&mut self, other: &Statistics) -> Result<(), SieveError> {
        match (self, other) {
            (Statistics::Int32(mine), Statistics::Int32(theirs)) => mine.merge(theirs),
            (Statistics::Int64(mine), Statistics::Int64(theirs)) => mine.merge(theirs),
            (Statistics::Float32(mine), Statistics::Float32(theirs)) => mine.merge(theirs),
            (Statistics::Float64(mine), Statistics::Float64(theirs)) => mine.merge(theirs),
            (mine, theirs) => Err(SieveError::TypeMismatch {
                expected: mine.data_type(),
                actual: theirs.data_type(),
            }),
        }
    }

    /// Count of null values observed or merged in.
    pub fn num_nulls(&self) -> u64 {
        dispatch!(self, stats => stats.num_nulls())
    }

    /// Overwrite the null count.
    pub fn set_num_nulls(&mut self, num_nulls: u64) {
        dispatch!(self, stats => stats.set_num_nulls(num_nulls))
    }

    /// Whether min/max are defined.
    pub fn has_non_null_value(&self) -> bool {
        dispatch!(self, stats => stats.has_non_null_value())
    }

    /// Whether nothing at all has been recorded.
    pub fn is_empty(&self) -> bool {
        dispatch!(self, stats => stats.is_empty())
    }

    /// Encoded min, `None` until a non-null value exists.
    pub fn min_bytes_opt(&self) -> Option<Vec<u8>> {
        dispatch!(self, stats => stats.min_bytes_opt())
    }

    /// Encoded max, `None` until a non-null value exists.
    pub fn max_bytes_opt(&self) -> Option<Vec<u8>> {
        dispatch!(self, stats => stats.max_bytes_opt())
    }

    /// Install min/max from their persisted encodings.
    pub fn set_min_max_from_bytes(
        &mut self,
        min_bytes: &[u8],
        max_bytes: &[u8],
    ) -> Result<(), SieveError> {
        dispatch!(self, stats => stats.set_min_max_from_bytes(min_bytes, max_bytes))
    }

    /// Whether persisting this object fits in `size` bytes.
    pub fn is_smaller_than(&self, size: u64) -> bool {
        dispatch!(self, stats => stats.is_smaller_than(size))
    }

    /// The membership filter, if enabled for this column.
    pub fn membership_filter(&self) -> Option<&MembershipFilter> {
        dispatch!(self, stats => stats.membership_filter())
    }

    /// Whether a histogram is enabled for this column.
    pub fn has_histogram(&self) -> bool {
        dispatch!(self, stats => stats.histogram().is_some())
    }

    /// Convert a literal to the column's native encoding, `None` for
    /// nulls and for literals of a different kind.
    pub(crate) fn encode_scalar(&self, value: &Scalar) -> Option<Vec<u8>> {
        match self {
            Statistics::Int32(_) => i32::from_scalar(value).map(|v| v.encode().as_ref().to_vec()),
            Statistics::Int64(_) => i64::from_scalar(value).map(|v| v.encode().as_ref().to_vec()),
            Statistics::Float32(_) => f32::from_scalar(value).map(|v| v.encode().as_ref().to_vec()),
            Statistics::Float64(_) => f64::from_scalar(value).map(|v| v.encode().as_ref().to_vec()),
        }
    }

    fn type_mismatch(&self, actual: DataType) -> SieveError {
        SieveError::TypeMismatch {
            expected: self.data_type(),
            actual,
        }
    }
}

impl From<ColumnStatistics<i32>> for Statistics {
    fn from(stats: ColumnStatistics<i32>) -> Self {
        Statistics::Int32(stats)
    }
}

impl From<ColumnStatistics<i64>> for Statistics {
    fn from(stats: ColumnStatistics<i64>) -> Self {
        Statistics::Int64(stats)
    }
}

impl From<ColumnStatistics<f32>> for Statistics {
    fn from(stats: ColumnStatistics<f32>) -> Self {
        Statistics::Float32(stats)
    }
}

impl From<ColumnStatistics<f64>> for Statistics {
    fn from(stats: ColumnStatistics<f64>) -> Self {
        Statistics::Float64(stats)
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        dispatch!(self, stats => std::fmt::Display::fmt(stats, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_tracks_min_max_and_nulls() {
        let mut stats = ColumnStatistics::<i32>::new(None);
        assert!(stats.is_empty());
        assert!(!stats.has_non_null_value());

        stats.update(10);
        stats.update(3);
        stats.update(7);
        stats.increment_nulls();

        assert_eq!(stats.min_opt(), Some(3));
        assert_eq!(stats.max_opt(), Some(10));
        assert_eq!(stats.num_nulls(), 1);
        assert!(!stats.is_empty());
    }

    #[test]
    fn nulls_alone_leave_min_max_undefined() {
        let mut stats = ColumnStatistics::<f64>::new(None);
        stats.increment_nulls();
        stats.increment_nulls();
        assert!(!stats.is_empty());
        assert!(!stats.has_non_null_value());
        assert_eq!(stats.min_opt(), None);
        assert_eq!(stats.to_string(), "num_nulls: 2, min/max not defined");
    }

    #[test]
    fn merge_extends_bounds_and_adds_nulls() {
        let mut a = ColumnStatistics::<i64>::new(None);
        a.update(5);
        a.update(20);
        a.set_num_nulls(2);

        let mut b = ColumnStatistics::<i64>::new(None);
        b.update(-3);
        b.set_num_nulls(1);

        a.merge(&b).unwrap();
        assert_eq!(a.min_opt(), Some(-3));
        assert_eq!(a.max_opt(), Some(20));
        assert_eq!(a.num_nulls(), 3);
    }

    #[test]
    fn merge_with_empty_peer_is_a_no_op_for_bounds() {
        let mut a = ColumnStatistics::<i32>::new(None);
        a.update(1);
        a.update(9);
        let b = ColumnStatistics::<i32>::new(None);
        a.merge(&b).unwrap();
        assert_eq!(a.min_opt(), Some(1));
        assert_eq!(a.max_opt(), Some(9));

        let mut empty = ColumnStatistics::<i32>::new(None);
        empty.merge(&a).unwrap();
        assert_eq!(empty.min_opt(), Some(1));
        assert_eq!(empty.max_opt(), Some(9));
    }

    #[test]
    fn merge_skips_facet_missing_on_either_side() {
        let opts = ColumnStatisticsOpts::new(Some(BloomFilterEntry::new(100)), None);
        let mut with_filter = ColumnStatistics::<i32>::new(Some(&opts));
        with_filter.update(4);

        let mut plain = ColumnStatistics::<i32>::new(None);
        plain.update(8);

        with_filter.merge(&plain).unwrap();
        assert_eq!(with_filter.max_opt(), Some(8));
        assert!(with_filter.membership_filter().is_some());

        plain.merge(&with_filter).unwrap();
        assert!(plain.membership_filter().is_none());
    }

    #[test]
    fn merge_reports_facet_sizing_mismatch_before_touching_bounds() {
        let small = ColumnStatisticsOpts::new(Some(BloomFilterEntry::new(10)), None);
        let large = ColumnStatisticsOpts::new(Some(BloomFilterEntry::new(100_000)), None);
        let mut a = ColumnStatistics::<i32>::new(Some(&small));
        a.update(1);
        let mut b = ColumnStatistics::<i32>::new(Some(&large));
        b.update(100);

        let err = a.merge(&b).unwrap_err();
        assert!(matches!(err, SieveError::FilterSizeMismatch { .. }));
        assert_eq!(a.max_opt(), Some(1));
        assert_eq!(a.num_nulls(), 0);
    }

    #[test]
    fn min_max_bytes_round_trip() {
        let mut stats = ColumnStatistics::<f64>::new(None);
        stats.update(-0.0);
        stats.update(f64::NAN);

        let min = stats.min_bytes_opt().unwrap();
        let max = stats.max_bytes_opt().unwrap();

        let mut decoded = ColumnStatistics::<f64>::new(None);
        assert!(!decoded.has_non_null_value());
        decoded.set_min_max_from_bytes(&min, &max).unwrap();
        assert!(decoded.has_non_null_value());
        assert_eq!(decoded.min_opt().unwrap().to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn min_max_from_bytes_rejects_wrong_width() {
        let mut stats = ColumnStatistics::<i32>::new(None);
        let err = stats.set_min_max_from_bytes(&[0; 8], &[0; 8]).unwrap_err();
        assert!(matches!(err, SieveError::InvalidLength { .. }));
        assert!(!stats.has_non_null_value());
    }

    #[test]
    fn size_check_follows_fixed_payload_rule() {
        let mut stats = ColumnStatistics::<i64>::new(None);
        assert!(stats.is_smaller_than(0));
        stats.update(i64::MAX);
        assert!(!stats.is_smaller_than(16));
        assert!(stats.is_smaller_than(17));
    }

    #[test]
    fn display_states() {
        let mut stats = ColumnStatistics::<i32>::new(None);
        assert_eq!(stats.to_string(), "no stats for this column");
        stats.update(5);
        stats.increment_nulls();
        assert_eq!(stats.to_string(), "min: 5, max: 5, num_nulls: 1");
    }

    #[test]
    fn enum_rejects_cross_type_use() {
        let mut stats = Statistics::try_new(&DataType::Int32, None).unwrap();
        assert!(stats.update(&Scalar::from(5i32)).is_ok());
        assert!(matches!(
            stats.update(&Scalar::from(5i64)),
            Err(SieveError::TypeMismatch { .. })
        ));

        let other = Statistics::try_new(&DataType::Int64, None).unwrap();
        assert!(matches!(
            stats.merge(&other),
            Err(SieveError::TypeMismatch { .. })
        ));
        assert!(Statistics::try_new(&DataType::Utf8, None).is_err());
    }

    #[test]
    fn enum_null_update_counts_nulls() {
        let mut stats = Statistics::try_new(&DataType::Float32, None).unwrap();
        stats.update(&Scalar::Float32(None)).unwrap();
        assert_eq!(stats.num_nulls(), 1);
        assert!(!stats.has_non_null_value());
        // typed null of the wrong kind is still a contract violation
        assert!(stats.update(&Scalar::Int32(None)).is_err());
    }

    #[test]
    fn facets_receive_updates() {
        let opts = ColumnStatisticsOpts::new(
            Some(BloomFilterEntry::new(100)),
            Some(HistogramEntry::new(0.0, 150.0, 5).unwrap()),
        );
        let mut stats = ColumnStatistics::<i32>::new(Some(&opts));
        stats.update(33);
        stats.update(90);

        let filter = stats.membership_filter().unwrap();
        assert!(filter.test(33i32.encode().as_ref()));
        assert!(!filter.test(34i32.encode().as_ref()));

        let histogram = stats.histogram().unwrap();
        assert_eq!(histogram.buckets(), &[0, 1, 0, 1, 0]);
    }
}
