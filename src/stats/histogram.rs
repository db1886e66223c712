//! Equal-width bucketed histogram attached to column-chunk statistics.

use std::cmp::Ordering;

use crate::error::SieveError;
use crate::scalar::StatType;

/// An ordered sequence of equal-width buckets over a fixed value domain.
///
/// Counts are approximate occurrence counts: out-of-domain values clamp
/// into the edge buckets, and range queries count partially-covered
/// buckets in full. A negative answer from [`RangeHistogram::overlaps`]
/// is exact; everything else is a pruning signal, not a cardinality.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeHistogram<T: StatType> {
    domain_min: T,
    domain_max: T,
    buckets: Vec<u64>,
}

impl<T: StatType> RangeHistogram<T> {
    /// Create a histogram over `[domain_min, domain_max]` with
    /// `bucket_count` equal-width buckets.
    pub fn new(domain_min: T, domain_max: T, bucket_count: usize) -> Result<Self, SieveError> {
        if bucket_count == 0 {
            return Err(SieveError::InvalidHistogram {
                reason: "bucket count must be non-zero".to_string(),
            });
        }
        if domain_min.partial_cmp(&domain_max) != Some(Ordering::Less) {
            return Err(SieveError::InvalidHistogram {
                reason: format!("domain [{domain_min}, {domain_max}] is not ascending"),
            });
        }
        Ok(Self {
            domain_min,
            domain_max,
            buckets: vec![0; bucket_count],
        })
    }

    /// Lower edge of the domain.
    pub fn domain_min(&self) -> T {
        self.domain_min
    }

    /// Upper edge of the domain.
    pub fn domain_max(&self) -> T {
        self.domain_max
    }

    /// Per-bucket occurrence counts.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Count one value, clamping out-of-domain values into the nearest
    /// edge bucket.
    pub fn insert(&mut self, value: T) {
        let idx = self.bucket_of(value);
        self.buckets[idx] += 1;
    }

    /// Pointwise-add another histogram's counts into this one.
    ///
    /// The peer must cover the identical domain (compared by encoded bit
    /// pattern) with the same bucket count.
    pub fn merge(&mut self, other: &Self) -> Result<(), SieveError> {
        if self.buckets.len() != other.buckets.len()
            || self.domain_min.encode().as_ref() != other.domain_min.encode().as_ref()
            || self.domain_max.encode().as_ref() != other.domain_max.encode().as_ref()
        {
            return Err(SieveError::HistogramMismatch {
                left_buckets: self.buckets.len(),
                right_buckets: other.buckets.len(),
            });
        }
        for (count, other_count) in self.buckets.iter_mut().zip(&other.buckets) {
            *count += other_count;
        }
        Ok(())
    }

    /// Whether any bucket intersecting `[lo, hi]` holds a non-zero count.
    ///
    /// Both bounds are clamped into the domain before bucket lookup, so
    /// the edge buckets (which also hold clamped out-of-domain inserts)
    /// are always consulted. `false` is an exact "no value in range can
    /// exist"; `true` is not a guarantee. An incomparable (NaN) bound
    /// conservatively matches.
    pub fn overlaps(&self, lo: T, hi: T) -> bool {
        if lo.partial_cmp(&hi).is_none() {
            return true;
        }
        let lo_idx = self.bucket_of(lo);
        let hi_idx = self.bucket_of(hi);
        if lo_idx > hi_idx {
            return false;
        }
        self.buckets[lo_idx..=hi_idx].iter().any(|&count| count > 0)
    }

    /// Approximate count of values in `[lo, hi]`: the sum over every
    /// intersecting bucket, counting partially-covered buckets in full.
    pub fn selectivity(&self, lo: T, hi: T) -> u64 {
        if lo.partial_cmp(&hi).is_none() {
            return self.buckets.iter().sum();
        }
        let lo_idx = self.bucket_of(lo);
        let hi_idx = self.bucket_of(hi);
        if lo_idx > hi_idx {
            return 0;
        }
        self.buckets[lo_idx..=hi_idx].iter().sum()
    }

    /// Self-describing little-endian encoding:
    /// `[bucket_count: u32][domain_min][domain_max][counts: u64 ...]`,
    /// with the domain edges in the scalar codec's fixed width.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + 2 * T::WIDTH + self.buckets.len() * 8);
        out.extend_from_slice(&(self.buckets.len() as u32).to_le_bytes());
        out.extend_from_slice(self.domain_min.encode().as_ref());
        out.extend_from_slice(self.domain_max.encode().as_ref());
        for count in &self.buckets {
            out.extend_from_slice(&count.to_le_bytes());
        }
        out
    }

    /// Decode a histogram previously produced by
    /// [`RangeHistogram::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SieveError> {
        let malformed = |reason: String| SieveError::MalformedBlob {
            what: "histogram",
            reason,
        };
        let header = 4 + 2 * T::WIDTH;
        if bytes.len() < header {
            return Err(malformed(format!("{} bytes is shorter than the header", bytes.len())));
        }
        let bucket_count = u32::from_le_bytes(bytes[0..4].try_into().unwrap()) as usize;
        if bucket_count == 0 {
            return Err(malformed("zero bucket count".to_string()));
        }
        let expected = header + bucket_count * 8;
        if bytes.len() != expected {
            return Err(malformed(format!(
                "expected {} bytes for {} buckets, got {}",
                expected,
                bucket_count,
                bytes.len()
            )));
        }
        let domain_min = T::decode(&bytes[4..4 + T::WIDTH])?;
        let domain_max = T::decode(&bytes[4 + T::WIDTH..header])?;
        let buckets = bytes[header..]
            .chunks_exact(8)
            .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()))
            .collect();
        Ok(Self {
            domain_min,
            domain_max,
            buckets,
        })
    }

    /// Bucket index covering `value`, clamping below the domain to the
    /// first bucket and at-or-above the domain's upper edge to the last.
    fn bucket_of(&self, value: T) -> usize {
        let n = self.buckets.len();
        let min = self.domain_min.to_f64();
        let max = self.domain_max.to_f64();
        let v = value.to_f64();
        // `!(v > min)` also routes NaN into the first bucket
        if !(v > min) {
            return 0;
        }
        if v >= max {
            return n - 1;
        }
        let frac = (v - min) / (max - min);
        ((frac * n as f64) as usize).min(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram() -> RangeHistogram<i32> {
        RangeHistogram::new(0, 150, 5).unwrap()
    }

    #[test]
    fn rejects_degenerate_construction() {
        assert!(RangeHistogram::new(0i32, 150, 0).is_err());
        assert!(RangeHistogram::new(150i32, 0, 5).is_err());
        assert!(RangeHistogram::new(5i32, 5, 5).is_err());
        assert!(RangeHistogram::<f64>::new(f64::NAN, 1.0, 4).is_err());
    }

    #[test]
    fn insert_lands_in_covering_bucket() {
        let mut h = histogram();
        h.insert(0); // first bucket
        h.insert(29);
        h.insert(33); // second bucket
        h.insert(90); // fourth bucket
        h.insert(150); // last bucket
        assert_eq!(h.buckets(), &[2, 1, 0, 1, 1]);
    }

    #[test]
    fn out_of_domain_values_clamp_to_edge_buckets() {
        let mut h = histogram();
        h.insert(-1000);
        h.insert(1000);
        assert_eq!(h.buckets(), &[1, 0, 0, 0, 1]);
        // ... and clamped values stay reachable through clamped queries
        assert!(h.overlaps(-500, -100));
        assert!(h.overlaps(500, 900));
    }

    #[test]
    fn overlaps_is_exact_on_empty_buckets() {
        let mut h = histogram();
        h.insert(12);
        h.insert(28);
        h.insert(90);
        assert!(!h.overlaps(30, 40));
        assert!(h.overlaps(0, 29));
        assert!(h.overlaps(85, 95));
        // a range spanning no bucket matches nothing
        assert!(!h.overlaps(100, 60));
    }

    #[test]
    fn selectivity_counts_intersecting_buckets_in_full() {
        let mut h = histogram();
        h.insert(5);
        h.insert(10);
        h.insert(33);
        h.insert(95);
        // [20, 40] touches buckets 0 and 1 entirely
        assert_eq!(h.selectivity(20, 40), 3);
        assert_eq!(h.selectivity(120, 150), 0);
        assert_eq!(h.selectivity(100, 60), 0);
    }

    #[test]
    fn merge_adds_counts_pointwise() {
        let mut a = histogram();
        let mut b = histogram();
        a.insert(10);
        a.insert(40);
        b.insert(40);
        b.insert(149);
        a.merge(&b).unwrap();
        assert_eq!(a.buckets(), &[1, 2, 0, 0, 1]);
    }

    #[test]
    fn merge_rejects_mismatched_shape() {
        let mut a = histogram();
        let b = RangeHistogram::new(0i32, 150, 6).unwrap();
        assert!(matches!(
            a.merge(&b),
            Err(SieveError::HistogramMismatch { .. })
        ));
        let c = RangeHistogram::new(0i32, 200, 5).unwrap();
        assert!(a.merge(&c).is_err());
    }

    #[test]
    fn byte_encoding_round_trips() {
        let mut h = RangeHistogram::new(-4.0f64, 4.0, 8).unwrap();
        h.insert(-3.5);
        h.insert(0.0);
        h.insert(3.9);
        let decoded = RangeHistogram::<f64>::from_bytes(&h.to_bytes()).unwrap();
        assert_eq!(decoded, h);
    }

    #[test]
    fn from_bytes_rejects_truncation() {
        let h = histogram();
        let mut bytes = h.to_bytes();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            RangeHistogram::<i32>::from_bytes(&bytes),
            Err(SieveError::MalformedBlob { .. })
        ));
    }

    #[test]
    fn float_histogram_buckets_fractional_values() {
        let mut h = RangeHistogram::new(0.0f32, 150.0, 5).unwrap();
        h.insert(29.9);
        h.insert(30.1);
        assert_eq!(h.buckets(), &[1, 1, 0, 0, 0]);
        assert!(h.overlaps(30.0, 40.0));
        assert!(!h.overlaps(60.0, 89.9));
    }
}
