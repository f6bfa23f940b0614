//! Vector similarity functions.

use crate::error::RankError;

/// Calculate cosine similarity between two vectors.
///
/// Accepts quantized (`i8`) or float vectors; sums are accumulated in
/// `f64`. Returns a value in [-1.0, 1.0] up to rounding, where 1.0 means
/// identical direction. If either vector has zero magnitude the similarity
/// is 0.0 rather than an error, so degenerate entries simply rank last.
///
/// # Errors
/// `DimensionMismatch` if the vectors differ in length, with `expected`
/// set to the length of `a`.
pub fn cosine_similarity<T>(a: &[T], b: &[T]) -> Result<f32, RankError>
where
    T: Copy + Into<f64>,
{
    if a.len() != b.len() {
        return Err(RankError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y): (f64, f64) = (x.into(), y.into());
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_vector(rng: &mut impl Rng, len: usize) -> Vec<i8> {
        (0..len).map(|_| rng.random_range(-127..=127)).collect()
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a: Vec<i8> = vec![127, 0, 0];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a: Vec<i8> = vec![127, 0];
        let b: Vec<i8> = vec![0, 127];
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0f32, 0.0];
        let b = vec![-1.0f32, 0.0];
        assert!((cosine_similarity(&a, &b).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_diagonal() {
        let a: Vec<i8> = vec![127, 0, 0];
        let b: Vec<i8> = vec![90, 90, 0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a: Vec<i8> = vec![0, 0, 0];
        let b: Vec<i8> = vec![12, -5, 3];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&b, &a).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_empty_vectors() {
        let a: Vec<i8> = vec![];
        assert_eq!(cosine_similarity(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_different_dimensions() {
        let a: Vec<i8> = vec![1, 0];
        let b: Vec<i8> = vec![1, 0, 0];
        let err = cosine_similarity(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            RankError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_self_similarity_is_one() {
        let mut rng = rand::rng();
        for len in [1, 3, 384] {
            let a = random_vector(&mut rng, len);
            if a.iter().all(|&x| x == 0) {
                continue;
            }
            let sim = cosine_similarity(&a, &a).unwrap();
            assert!((sim - 1.0).abs() < 1e-5, "len {} sim {}", len, sim);
        }
    }

    #[test]
    fn test_symmetry_and_bounds() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let a = random_vector(&mut rng, 16);
            let b = random_vector(&mut rng, 16);
            let ab = cosine_similarity(&a, &b).unwrap();
            let ba = cosine_similarity(&b, &a).unwrap();
            assert_eq!(ab, ba);
            assert!((-1.0 - 1e-5..=1.0 + 1e-5).contains(&ab));
        }
    }

    #[test]
    fn test_mismatch_for_any_unequal_lengths() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let la = rng.random_range(0..10);
            let lb = rng.random_range(0..10);
            if la == lb {
                continue;
            }
            let a = random_vector(&mut rng, la);
            let b = random_vector(&mut rng, lb);
            assert!(cosine_similarity(&a, &b).is_err());
        }
    }
}
