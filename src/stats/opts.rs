//! Per-column configuration for the optional statistics facets.
//!
//! Options are resolved against a schema before any statistics object is
//! constructed; after that point facet presence and sizing are fixed for
//! the lifetime of the column's statistics.

use std::collections::HashMap;

use arrow_schema::{DataType, Schema};

use crate::error::SieveError;

/// Sizing for one column's membership filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomFilterEntry {
    expected_entries: u64,
    fpp: f64,
}

impl BloomFilterEntry {
    /// Size for `expected_entries` values at the default false-positive
    /// rate.
    pub fn new(expected_entries: u64) -> Self {
        Self {
            expected_entries,
            fpp: 0.05,
        }
    }

    /// Override the target false-positive rate.
    pub fn with_fpp(mut self, fpp: f64) -> Self {
        self.fpp = fpp;
        self
    }

    /// Expected number of distinct inserts.
    pub fn expected_entries(&self) -> u64 {
        self.expected_entries
    }

    /// Target false-positive rate.
    pub fn fpp(&self) -> f64 {
        self.fpp
    }
}

/// Domain and bucket count for one column's histogram.
///
/// Bounds are carried as `f64` and converted to the column's native
/// scalar type when the statistics object is constructed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistogramEntry {
    domain_min: f64,
    domain_max: f64,
    bucket_count: usize,
}

impl HistogramEntry {
    /// Describe a histogram over `[domain_min, domain_max]` with
    /// `bucket_count` equal-width buckets.
    pub fn new(domain_min: f64, domain_max: f64, bucket_count: usize) -> Result<Self, SieveError> {
        if bucket_count == 0 {
            return Err(SieveError::InvalidHistogram {
                reason: "bucket count must be non-zero".to_string(),
            });
        }
        if !(domain_min < domain_max) {
            return Err(SieveError::InvalidHistogram {
                reason: format!("domain [{domain_min}, {domain_max}] is not ascending"),
            });
        }
        Ok(Self {
            domain_min,
            domain_max,
            bucket_count,
        })
    }

    /// Lower edge of the configured domain.
    pub fn domain_min(&self) -> f64 {
        self.domain_min
    }

    /// Upper edge of the configured domain.
    pub fn domain_max(&self) -> f64 {
        self.domain_max
    }

    /// Number of equal-width buckets.
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }
}

/// Resolved facet configuration for one column.
///
/// Absent options (or a `None` entry) disable the corresponding facet.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnStatisticsOpts {
    bloom_filter: Option<BloomFilterEntry>,
    histogram: Option<HistogramEntry>,
}

impl ColumnStatisticsOpts {
    pub fn new(bloom_filter: Option<BloomFilterEntry>, histogram: Option<HistogramEntry>) -> Self {
        Self {
            bloom_filter,
            histogram,
        }
    }

    /// Membership-filter sizing, if enabled.
    pub fn bloom_filter(&self) -> Option<&BloomFilterEntry> {
        self.bloom_filter.as_ref()
    }

    /// Histogram shape, if enabled.
    pub fn histogram(&self) -> Option<&HistogramEntry> {
        self.histogram.as_ref()
    }
}

/// Schema-validated facet configuration for a set of columns.
#[derive(Clone, Debug, Default)]
pub struct StatisticsOpts {
    columns: HashMap<String, ColumnStatisticsOpts>,
}

impl StatisticsOpts {
    /// Create a new builder for StatisticsOpts.
    pub fn builder() -> StatisticsOptsBuilder {
        StatisticsOptsBuilder::default()
    }

    /// Resolved options for one column, `None` when neither facet is
    /// enabled for it.
    pub fn column(&self, name: &str) -> Option<&ColumnStatisticsOpts> {
        self.columns.get(name)
    }
}

/// Builder for [`StatisticsOpts`].
#[derive(Clone, Debug, Default)]
pub struct StatisticsOptsBuilder {
    bloom_filters: HashMap<String, BloomFilterEntry>,
    histograms: HashMap<String, HistogramEntry>,
}

impl StatisticsOptsBuilder {
    /// Enable a membership filter for `column`.
    pub fn bloom_filter(mut self, column: impl Into<String>, entry: BloomFilterEntry) -> Self {
        self.bloom_filters.insert(column.into(), entry);
        self
    }

    /// Enable a histogram for `column`.
    pub fn histogram(mut self, column: impl Into<String>, entry: HistogramEntry) -> Self {
        self.histograms.insert(column.into(), entry);
        self
    }

    /// Validate every referenced column against `schema` and build.
    ///
    /// Fails when a referenced column is missing, has a type this crate
    /// does not summarize, or has a histogram domain that collapses when
    /// converted to the column's native type.
    pub fn build(self, schema: &Schema) -> Result<StatisticsOpts, SieveError> {
        let mut columns: HashMap<String, ColumnStatisticsOpts> = HashMap::new();

        for (name, entry) in &self.bloom_filters {
            lookup_supported(schema, name)?;
            columns.entry(name.clone()).or_default().bloom_filter = Some(*entry);
        }
        for (name, entry) in &self.histograms {
            let data_type = lookup_supported(schema, name)?;
            check_native_domain(&data_type, entry)?;
            columns.entry(name.clone()).or_default().histogram = Some(*entry);
        }

        Ok(StatisticsOpts { columns })
    }
}

fn lookup_supported(schema: &Schema, column: &str) -> Result<DataType, SieveError> {
    let field = schema
        .field_with_name(column)
        .map_err(|_| SieveError::ColumnNotFound {
            column: column.to_string(),
        })?;
    match field.data_type() {
        DataType::Int32 | DataType::Int64 | DataType::Float32 | DataType::Float64 => {
            Ok(field.data_type().clone())
        }
        other => Err(SieveError::UnsupportedType {
            data_type: other.clone(),
        }),
    }
}

/// A fractional domain can collapse when truncated to an integer column.
fn check_native_domain(data_type: &DataType, entry: &HistogramEntry) -> Result<(), SieveError> {
    let collapses = match data_type {
        DataType::Int32 => entry.domain_min() as i32 >= entry.domain_max() as i32,
        DataType::Int64 => entry.domain_min() as i64 >= entry.domain_max() as i64,
        DataType::Float32 => {
            !((entry.domain_min() as f32) < (entry.domain_max() as f32))
        }
        _ => false,
    };
    if collapses {
        return Err(SieveError::InvalidHistogram {
            reason: format!(
                "domain [{}, {}] collapses for column type {:?}",
                entry.domain_min(),
                entry.domain_max(),
                data_type
            ),
        });
    }
    Ok(())
}
