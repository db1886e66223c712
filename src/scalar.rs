//! Scalar values and their fixed-width byte encoding.
//!
//! Statistics are generic over [`StatType`], the ordered-scalar contract
//! shared by the four supported column types. The byte encoding is the
//! value's native bit pattern in little-endian order; floating-point
//! values round-trip without canonicalization, so negative zero and every
//! NaN payload survive persistence bit-for-bit.

use arrow_schema::DataType;

use crate::error::SieveError;

/// A typed literal, possibly null.
///
/// The payload `None` is a typed null: `Scalar::Int32(None)` compares as
/// an int32 column's null literal, not as a bare NULL of unknown type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
}

impl Scalar {
    /// The scalar type this literal carries, independent of nullness.
    pub fn data_type(&self) -> DataType {
        match self {
            Scalar::Int32(_) => DataType::Int32,
            Scalar::Int64(_) => DataType::Int64,
            Scalar::Float32(_) => DataType::Float32,
            Scalar::Float64(_) => DataType::Float64,
        }
    }

    /// Whether the literal is a (typed) null.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Scalar::Int32(None) | Scalar::Int64(None) | Scalar::Float32(None) | Scalar::Float64(None)
        )
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int32(Some(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int64(Some(value))
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float32(Some(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float64(Some(value))
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Int32(Some(v)) => write!(f, "Int32({v})"),
            Scalar::Int64(Some(v)) => write!(f, "Int64({v})"),
            Scalar::Float32(Some(v)) => write!(f, "Float32({v})"),
            Scalar::Float64(Some(v)) => write!(f, "Float64({v})"),
            Scalar::Int32(None) => write!(f, "Int32(NULL)"),
            Scalar::Int64(None) => write!(f, "Int64(NULL)"),
            Scalar::Float32(None) => write!(f, "Float32(NULL)"),
            Scalar::Float64(None) => write!(f, "Float64(NULL)"),
        }
    }
}

/// The ordered, fixed-width scalar contract statistics are built over.
///
/// Capabilities: comparison (`PartialOrd`; NaN-aware callers use
/// `partial_cmp`), bit-exact fixed-width encoding, and an `f64` view used
/// for histogram bucket interpolation and for converting configured
/// domain bounds to the column's native type at the boundary.
pub trait StatType: Copy + PartialOrd + Send + Sync + std::fmt::Debug + std::fmt::Display + 'static {
    /// Encoded byte width (4 or 8).
    const WIDTH: usize;

    /// Fixed-width encoded form, avoiding a heap allocation per value.
    type Bytes: AsRef<[u8]>;

    /// The schema-level type this scalar corresponds to.
    fn data_type() -> DataType;

    /// Encode the native bit pattern, little-endian.
    fn encode(self) -> Self::Bytes;

    /// Decode a value previously produced by [`StatType::encode`].
    ///
    /// Rejects input whose length is not exactly [`StatType::WIDTH`].
    fn decode(bytes: &[u8]) -> Result<Self, SieveError>;

    /// Lossy numeric view for bucket interpolation.
    fn to_f64(self) -> f64;

    /// Saturating conversion from an `f64` bound.
    fn from_f64(value: f64) -> Self;

    /// Extract a native value from a literal of the same kind.
    ///
    /// Returns `None` for nulls and for literals of a different kind;
    /// no cross-type coercion is performed.
    fn from_scalar(scalar: &Scalar) -> Option<Self>;

    /// Wrap the value back into a literal.
    fn into_scalar(self) -> Scalar;
}

macro_rules! int_stat_type {
    ($ty:ty, $width:expr, $data_type:expr, $variant:ident) => {
        impl StatType for $ty {
            const WIDTH: usize = $width;

            type Bytes = [u8; $width];

            fn data_type() -> DataType {
                $data_type
            }

            fn encode(self) -> Self::Bytes {
                self.to_le_bytes()
            }

            fn decode(bytes: &[u8]) -> Result<Self, SieveError> {
                let bytes: [u8; $width] = bytes.try_into().map_err(|_| SieveError::InvalidLength {
                    expected: $width,
                    actual: bytes.len(),
                })?;
                Ok(<$ty>::from_le_bytes(bytes))
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$variant(value) => *value,
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(Some(self))
            }
        }
    };
}

macro_rules! float_stat_type {
    ($ty:ty, $bits:ty, $width:expr, $data_type:expr, $variant:ident) => {
        impl StatType for $ty {
            const WIDTH: usize = $width;

            type Bytes = [u8; $width];

            fn data_type() -> DataType {
                $data_type
            }

            fn encode(self) -> Self::Bytes {
                // Raw bit pattern: -0.0 and NaN payloads are preserved.
                self.to_bits().to_le_bytes()
            }

            fn decode(bytes: &[u8]) -> Result<Self, SieveError> {
                let bytes: [u8; $width] = bytes.try_into().map_err(|_| SieveError::InvalidLength {
                    expected: $width,
                    actual: bytes.len(),
                })?;
                Ok(<$ty>::from_bits(<$bits>::from_le_bytes(bytes)))
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $ty
            }

            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$variant(value) => *value,
                    _ => None,
                }
            }

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(Some(self))
            }
        }
    };
}

int_stat_type!(i32, 4, DataType::Int32, Int32);
int_stat_type!(i64, 8, DataType::Int64, Int64);
float_stat_type!(f32, u32, 4, DataType::Float32, Float32);
float_stat_type!(f64, u64, 8, DataType::Float64, Float64);
