//! Scalar distance kernels.
//!
//! These kernels assume equal-length inputs. Length checks happen once in
//! [`DistanceMetric::calculate`](super::DistanceMetric::calculate).

/// Euclidean (L2) distance.
#[inline]
#[must_use]
pub(crate) fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}

/// Manhattan (L1) distance.
#[inline]
#[must_use]
pub(crate) fn manhattan_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Chebyshev (L-infinity) distance. Zero for empty inputs.
#[inline]
#[must_use]
pub(crate) fn chebyshev_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).fold(0.0, f32::max)
}

/// Minkowski distance of order `p`. The caller guarantees `p >= 1`.
#[inline]
#[must_use]
pub(crate) fn minkowski_distance(a: &[f32], b: &[f32], p: f32) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs().powf(p)).sum::<f32>().powf(p.recip())
}

/// Bray-Curtis dissimilarity: `sum|a-b| / sum|a+b|`.
///
/// Returns 0.0 when both sums are zero and infinity when only the
/// denominator is zero.
#[inline]
#[must_use]
pub(crate) fn bray_curtis_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let (numerator, denominator) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32), |(num, den), (x, y)| (num + (x - y).abs(), den + (x + y).abs()));

    if denominator == 0.0 {
        return if numerator == 0.0 { 0.0 } else { f32::INFINITY };
    }

    numerator / denominator
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns 0.0 if either vector has zero magnitude.
#[inline]
#[must_use]
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_near(a: f32, b: f32) {
        assert!((a - b).abs() < EPSILON, "assertion failed: {a} !~ {b} (diff: {})", (a - b).abs());
    }

    #[test]
    fn test_euclidean_distance() {
        assert_near(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_manhattan_distance() {
        assert_near(manhattan_distance(&[1.0, -2.0, 3.0], &[4.0, 2.0, 3.0]), 7.0);
    }

    #[test]
    fn test_chebyshev_distance() {
        assert_near(chebyshev_distance(&[1.0, -2.0, 3.0], &[4.0, 2.0, 3.0]), 4.0);
        assert_near(chebyshev_distance(&[], &[]), 0.0);
    }

    #[test]
    fn test_minkowski_distance() {
        // (1^3 + 2^3)^(1/3) = 9^(1/3)
        assert_near(minkowski_distance(&[0.0, 0.0], &[1.0, 2.0], 3.0), 9.0f32.cbrt());
        assert_near(minkowski_distance(&[0.0, 0.0], &[3.0, 4.0], 1.0), 7.0);
    }

    #[test]
    fn test_bray_curtis_distance() {
        // |1-3| + |2-2| = 2, |1+3| + |2+2| = 8
        assert_near(bray_curtis_distance(&[1.0, 2.0], &[3.0, 2.0]), 0.25);
        assert_near(bray_curtis_distance(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert!(bray_curtis_distance(&[1.0], &[-1.0]).is_infinite());
    }

    #[test]
    fn test_cosine_similarity() {
        assert_near(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
        assert_near(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_near(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
        assert_near(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
