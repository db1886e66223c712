//! Probabilistic membership filter attached to column-chunk statistics.

use twox_hash::XxHash64;

use crate::error::SieveError;

/// Default false-positive rate when sizing from an expected-entry count.
const DEFAULT_FPP: f64 = 0.05;

/// Fixed hash seed so filters written by different processes agree.
const HASH_SEED: u64 = 0;

/// A fixed-size bit array probed by `k` derived hash functions.
///
/// `test` never returns a false negative for an inserted value; false
/// positives occur with a probability governed by the bit count, the
/// hash count, and the number of inserted values. There is no deletion.
///
/// Values are hashed through their canonical fixed-width encoding (see
/// [`StatType::encode`](crate::StatType::encode)), so the same logical
/// value always probes the same bits regardless of which writer inserted
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MembershipFilter {
    bits: Vec<u64>,
    num_bits: u64,
    num_hashes: u32,
}

impl MembershipFilter {
    /// Size a filter for `expected_entries` values at the default
    /// false-positive rate.
    pub fn new(expected_entries: u64) -> Self {
        Self::with_fpp(expected_entries, DEFAULT_FPP)
    }

    /// Size a filter for `expected_entries` values at the given
    /// false-positive rate.
    ///
    /// Uses the standard sizing formulas: `m = ceil(-n ln p / ln^2 2)`
    /// bits and `k = max(1, round(m/n ln 2))` hash functions.
    pub fn with_fpp(expected_entries: u64, fpp: f64) -> Self {
        let n = expected_entries.max(1) as f64;
        let p = fpp.clamp(1e-9, 0.5);
        let ln2 = std::f64::consts::LN_2;
        let num_bits = ((-n * p.ln()) / (ln2 * ln2)).ceil().max(64.0) as u64;
        let num_hashes = ((num_bits as f64 / n) * ln2).round().max(1.0) as u32;
        let words = num_bits.div_ceil(64) as usize;
        Self {
            bits: vec![0; words],
            num_bits,
            num_hashes,
        }
    }

    /// Length of the bit array.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Number of hash functions probed per value.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Set the `k` bit positions for one encoded value.
    pub fn insert(&mut self, data: &[u8]) {
        let (mut combined, step) = self.hash_pair(data);
        for _ in 0..self.num_hashes {
            let bit = combined % self.num_bits;
            self.bits[(bit / 64) as usize] |= 1u64 << (bit % 64);
            combined = combined.wrapping_add(step);
        }
    }

    /// Whether all `k` bit positions for one encoded value are set.
    pub fn test(&self, data: &[u8]) -> bool {
        let (mut combined, step) = self.hash_pair(data);
        for _ in 0..self.num_hashes {
            let bit = combined % self.num_bits;
            if self.bits[(bit / 64) as usize] & (1u64 << (bit % 64)) == 0 {
                return false;
            }
            combined = combined.wrapping_add(step);
        }
        true
    }

    /// Bitwise-OR another filter of identical sizing into this one.
    pub fn merge(&mut self, other: &Self) -> Result<(), SieveError> {
        if self.num_bits != other.num_bits || self.num_hashes != other.num_hashes {
            return Err(SieveError::FilterSizeMismatch {
                left_bits: self.num_bits,
                left_hashes: self.num_hashes,
                right_bits: other.num_bits,
                right_hashes: other.num_hashes,
            });
        }
        for (word, other_word) in self.bits.iter_mut().zip(&other.bits) {
            *word |= other_word;
        }
        Ok(())
    }

    /// Self-describing little-endian encoding:
    /// `[num_hashes: u32][num_bits: u64][bit words: u64 ...]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(12 + self.bits.len() * 8);
        out.extend_from_slice(&self.num_hashes.to_le_bytes());
        out.extend_from_slice(&self.num_bits.to_le_bytes());
        for word in &self.bits {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Decode a filter previously produced by [`MembershipFilter::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SieveError> {
        let malformed = |reason: String| SieveError::MalformedBlob {
            what: "membership filter",
            reason,
        };
        if bytes.len() < 12 {
            return Err(malformed(format!("{} bytes is shorter than the header", bytes.len())));
        }
        let num_hashes = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let num_bits = u64::from_le_bytes(bytes[4..12].try_into().unwrap());
        if num_bits == 0 || num_hashes == 0 {
            return Err(malformed("zero bit or hash count".to_string()));
        }
        let words = num_bits.div_ceil(64) as usize;
        let expected = 12 + words * 8;
        if bytes.len() != expected {
            return Err(malformed(format!(
                "expected {} bytes for {} bits, got {}",
                expected,
                num_bits,
                bytes.len()
            )));
        }
        let bits = bytes[12..]
            .chunks_exact(8)
            .map(|chunk| u64::from_le_bytes(chunk.try_into().unwrap()))
            .collect();
        Ok(Self {
            bits,
            num_bits,
            num_hashes,
        })
    }

    /// Derive the double-hashing pair from one 64-bit digest. The step is
    /// forced odd so successive probes do not collapse onto a short cycle.
    fn hash_pair(&self, data: &[u8]) -> (u64, u64) {
        let hash = XxHash64::oneshot(HASH_SEED, data);
        (hash, (hash >> 32) | 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::StatType;

    #[test]
    fn inserted_values_always_test_positive() {
        let mut filter = MembershipFilter::new(1000);
        for v in 0i32..200 {
            filter.insert(v.encode().as_ref());
        }
        for v in 0i32..200 {
            assert!(filter.test(v.encode().as_ref()), "false negative for {v}");
        }
    }

    #[test]
    fn distinct_values_mostly_test_negative() {
        let mut filter = MembershipFilter::new(1000);
        for v in 0i64..100 {
            filter.insert(v.encode().as_ref());
        }
        let false_positives = (10_000i64..11_000)
            .filter(|v| filter.test(v.encode().as_ref()))
            .count();
        // fpp is 5% at full load; at 10% load it should be far lower
        assert!(false_positives < 100, "{false_positives} false positives");
    }

    #[test]
    fn merge_preserves_both_sides() {
        let mut a = MembershipFilter::new(100);
        let mut b = MembershipFilter::new(100);
        a.insert(1i32.encode().as_ref());
        b.insert(2i32.encode().as_ref());
        a.merge(&b).unwrap();
        assert!(a.test(1i32.encode().as_ref()));
        assert!(a.test(2i32.encode().as_ref()));
    }

    #[test]
    fn merge_rejects_mismatched_sizing() {
        let mut a = MembershipFilter::new(100);
        let b = MembershipFilter::new(100_000);
        let err = a.merge(&b).unwrap_err();
        assert!(matches!(err, SieveError::FilterSizeMismatch { .. }));
    }

    #[test]
    fn byte_encoding_round_trips() {
        let mut filter = MembershipFilter::new(500);
        for v in [3i64, 7, 11, 13] {
            filter.insert(v.encode().as_ref());
        }
        let decoded = MembershipFilter::from_bytes(&filter.to_bytes()).unwrap();
        assert_eq!(decoded, filter);
    }

    #[test]
    fn from_bytes_rejects_truncation() {
        let filter = MembershipFilter::new(500);
        let mut bytes = filter.to_bytes();
        bytes.pop();
        assert!(matches!(
            MembershipFilter::from_bytes(&bytes),
            Err(SieveError::MalformedBlob { .. })
        ));
        assert!(MembershipFilter::from_bytes(&bytes[..4]).is_err());
    }

    #[test]
    fn sizing_tracks_expected_entries() {
        let small = MembershipFilter::new(10);
        let large = MembershipFilter::new(10_000);
        assert!(large.num_bits() > small.num_bits());
        assert!(small.num_hashes() >= 1);
    }
}
