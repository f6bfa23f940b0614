//! Int8 quantization of embeddings.
//!
//! Indexes store embeddings as signed 8-bit integers: every component of a
//! unit-length float vector is multiplied by [`QUANTIZATION_SCALE`] and
//! rounded to the nearest integer, ties away from zero. This is lossy and
//! bounds the precision of every similarity score computed downstream, so
//! query embeddings must go through the same step as the index did.

use serde::{Deserialize, Serialize};

/// Scale applied before rounding. Components of a normalized vector lie in
/// [-1, 1], which maps onto [-127, 127].
pub const QUANTIZATION_SCALE: f32 = 127.0;

/// Quantized int8 embedding.
///
/// Serializes as a plain JSON integer array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantizedEmbedding(Vec<i8>);

impl QuantizedEmbedding {
    pub fn new(values: Vec<i8>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[i8] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<i8> {
        self.0
    }
}

impl From<Vec<i8>> for QuantizedEmbedding {
    fn from(values: Vec<i8>) -> Self {
        Self(values)
    }
}

impl AsRef<[i8]> for QuantizedEmbedding {
    fn as_ref(&self) -> &[i8] {
        &self.0
    }
}

/// Quantize a single component.
///
/// `f32::round` rounds half away from zero. Out-of-range inputs saturate at
/// the i8 bounds and NaN maps to 0.
pub fn quantize_value(x: f32) -> i8 {
    (x * QUANTIZATION_SCALE)
        .round()
        .clamp(i8::MIN as f32, i8::MAX as f32) as i8
}

/// Quantize a float vector component-wise.
pub fn quantize(values: &[f32]) -> QuantizedEmbedding {
    QuantizedEmbedding(values.iter().copied().map(quantize_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(quantize_value(1.0), 127);
        assert_eq!(quantize_value(-1.0), -127);
        assert_eq!(quantize_value(0.0), 0);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 0.5 * 127 = 63.5
        assert_eq!(quantize_value(0.5), 64);
        assert_eq!(quantize_value(-0.5), -64);
        // 0.1 * 127 = 12.7
        assert_eq!(quantize_value(0.1), 13);
        // 0.7071 * 127 = 89.80
        assert_eq!(quantize_value(0.7071), 90);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        // 63.5 / 127 is exactly 0.5, so the scaled value is an exact tie
        assert_eq!(quantize_value(63.5 / QUANTIZATION_SCALE), 64);
        assert_eq!(quantize_value(-63.5 / QUANTIZATION_SCALE), -64);
    }

    #[test]
    fn test_saturates_out_of_range() {
        assert_eq!(quantize_value(2.0), 127);
        assert_eq!(quantize_value(-2.0), -128);
        assert_eq!(quantize_value(f32::NAN), 0);
    }

    #[test]
    fn test_quantize_vector() {
        let q = quantize(&[1.0, -0.25, 0.0]);
        assert_eq!(q.values(), &[127, -32, 0]);
        assert_eq!(q.dimension(), 3);
    }

    #[test]
    fn test_serializes_as_int_array() {
        let q = QuantizedEmbedding::new(vec![127, 0, -5]);
        assert_eq!(serde_json::to_string(&q).unwrap(), "[127,0,-5]");
        let decoded: QuantizedEmbedding = serde_json::from_str("[90,90,0]").unwrap();
        assert_eq!(decoded.values(), &[90, 90, 0]);
    }

    #[test]
    fn test_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<QuantizedEmbedding>("[128]").is_err());
    }
}
