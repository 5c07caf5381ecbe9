//! Distance and similarity metrics for descriptor matching.
//!
//! Every metric carries a [`Directionality`] tag that says whether a smaller
//! or a larger value means two descriptors are closer. Matching code ranks
//! values through [`Directionality::compare`] and never assumes a fixed
//! ordering sense.
//!
//! | metric | directionality |
//! |---|---|
//! | `euclidean` | lower is closer |
//! | `manhattan` | lower is closer |
//! | `chebyshev` | lower is closer |
//! | `minkowski:<p>` | lower is closer |
//! | `bray_curtis` | lower is closer |
//! | `cosine` | higher is closer |
//!
//! Metrics are resolved from their names once per query:
//!
//! ```
//! use placematch_vector::distance::{Directionality, DistanceMetric};
//!
//! let metric: DistanceMetric = "minkowski:2".parse().unwrap();
//! assert_eq!(metric.directionality(), Directionality::LowerIsCloser);
//!
//! let d = metric.calculate(&[0.0, 0.0], &[3.0, 4.0]).unwrap();
//! assert!((d - 5.0).abs() < 1e-4);
//! ```

mod scalar;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VectorError;

/// Default order of the Minkowski metric.
pub const DEFAULT_MINKOWSKI_P: f32 = 3.0;

/// Which end of a metric's range means "closer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directionality {
    /// Smaller values mean closer descriptors (distances).
    LowerIsCloser,
    /// Larger values mean closer descriptors (similarities).
    HigherIsCloser,
}

impl Directionality {
    /// Order two metric values best-first.
    ///
    /// `Ordering::Less` means `a` is closer than `b`. Values that compare
    /// equal are ties. NaN always ranks after every other value.
    #[inline]
    #[must_use]
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ascending = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    Self::LowerIsCloser => ascending,
                    Self::HigherIsCloser => ascending.reverse(),
                }
            }
        }
    }

    /// Whether `candidate` is strictly closer than `current`.
    #[inline]
    #[must_use]
    pub fn is_closer(self, candidate: f32, current: f32) -> bool {
        self.compare(candidate, current) == Ordering::Less
    }
}

/// A named metric for comparing descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Manhattan (L1) distance.
    Manhattan,
    /// Chebyshev (L-infinity) distance.
    Chebyshev,
    /// Minkowski distance of order `p` (`p >= 1`).
    Minkowski {
        /// The order of the norm.
        p: f32,
    },
    /// Bray-Curtis dissimilarity.
    BrayCurtis,
    /// Cosine similarity.
    Cosine,
}

impl DistanceMetric {
    /// Every metric name accepted by [`FromStr`].
    pub const ALL_NAMES: [&'static str; 6] =
        ["euclidean", "manhattan", "chebyshev", "minkowski", "bray_curtis", "cosine"];

    /// Create a Minkowski metric of order `p`.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::InvalidMetricArgument`] if `p < 1` or `p` is not finite.
    pub fn minkowski(p: f32) -> Result<Self, VectorError> {
        check_minkowski_order(p)?;
        Ok(Self::Minkowski { p })
    }

    /// The metric's registry name, without parameters.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
            Self::Minkowski { .. } => "minkowski",
            Self::BrayCurtis => "bray_curtis",
            Self::Cosine => "cosine",
        }
    }

    /// Whether smaller or larger values of this metric mean "closer".
    #[must_use]
    pub const fn directionality(&self) -> Directionality {
        match self {
            Self::Cosine => Directionality::HigherIsCloser,
            _ => Directionality::LowerIsCloser,
        }
    }

    /// Evaluate the metric on two vectors.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionMismatch`] if the vectors differ in
    /// length, or [`VectorError::InvalidMetricArgument`] for a Minkowski
    /// order below 1.
    pub fn calculate(&self, a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
        if a.len() != b.len() {
            return Err(VectorError::DimensionMismatch { expected: a.len(), actual: b.len() });
        }

        Ok(match *self {
            Self::Euclidean => scalar::euclidean_distance(a, b),
            Self::Manhattan => scalar::manhattan_distance(a, b),
            Self::Chebyshev => scalar::chebyshev_distance(a, b),
            Self::Minkowski { p } => {
                check_minkowski_order(p)?;
                scalar::minkowski_distance(a, b, p)
            }
            Self::BrayCurtis => scalar::bray_curtis_distance(a, b),
            Self::Cosine => scalar::cosine_similarity(a, b),
        })
    }
}

fn check_minkowski_order(p: f32) -> Result<(), VectorError> {
    if !p.is_finite() || p < 1.0 {
        return Err(VectorError::InvalidMetricArgument(format!(
            "minkowski order must be a finite number >= 1, got {p}"
        )));
    }
    Ok(())
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minkowski { p } => write!(f, "minkowski:{p}"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let (name, param) = match normalized.split_once(':') {
            Some((name, param)) => (name, Some(param.trim())),
            None => (normalized.as_str(), None),
        };

        let metric = match name.trim() {
            "euclidean" | "l2" => Self::Euclidean,
            "manhattan" | "l1" => Self::Manhattan,
            "chebyshev" => Self::Chebyshev,
            "minkowski" => {
                let p = match param {
                    Some(raw) => raw.parse::<f32>().map_err(|_| {
                        VectorError::InvalidMetricArgument(format!(
                            "minkowski order '{raw}' is not a number"
                        ))
                    })?,
                    None => DEFAULT_MINKOWSKI_P,
                };
                return Self::minkowski(p);
            }
            "bray_curtis" | "bray-curtis" | "braycurtis" => Self::BrayCurtis,
            "cosine" => Self::Cosine,
            other => {
                return Err(VectorError::InvalidArgument(format!(
                    "unknown metric '{other}', expected one of: {}",
                    Self::ALL_NAMES.join(", ")
                )))
            }
        };

        if param.is_some() {
            return Err(VectorError::InvalidArgument(format!(
                "metric '{}' takes no parameter",
                metric.name()
            )));
        }

        Ok(metric)
    }
}

impl TryFrom<String> for DistanceMetric {
    type Error = VectorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DistanceMetric> for String {
    fn from(metric: DistanceMetric) -> Self {
        metric.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_near(a: f32, b: f32, epsilon: f32) {
        assert!(
            (a - b).abs() < epsilon,
            "assertion failed: {} !~ {} (diff: {})",
            a,
            b,
            (a - b).abs()
        );
    }

    #[test]
    fn test_directionality_tags() {
        for name in ["euclidean", "manhattan", "chebyshev", "minkowski", "bray_curtis"] {
            let metric: DistanceMetric = name.parse().unwrap();
            assert_eq!(metric.directionality(), Directionality::LowerIsCloser, "{name}");
        }
        assert_eq!(DistanceMetric::Cosine.directionality(), Directionality::HigherIsCloser);
    }

    #[test]
    fn test_compare_respects_direction() {
        assert_eq!(Directionality::LowerIsCloser.compare(0.1, 0.9), Ordering::Less);
        assert_eq!(Directionality::HigherIsCloser.compare(0.1, 0.9), Ordering::Greater);
        assert_eq!(Directionality::HigherIsCloser.compare(0.5, 0.5), Ordering::Equal);
        assert_eq!(Directionality::LowerIsCloser.compare(0.0, -0.0), Ordering::Equal);
    }

    #[test]
    fn test_nan_ranks_last_in_both_directions() {
        for direction in [Directionality::LowerIsCloser, Directionality::HigherIsCloser] {
            assert_eq!(direction.compare(f32::NAN, 1.0), Ordering::Greater);
            assert_eq!(direction.compare(1.0, f32::NAN), Ordering::Less);
            assert!(!direction.is_closer(f32::NAN, f32::NAN));
        }
    }

    #[test]
    fn test_calculate_dimension_mismatch() {
        for name in DistanceMetric::ALL_NAMES {
            let metric: DistanceMetric = name.parse().unwrap();
            let err = metric.calculate(&[1.0, 2.0], &[1.0]).unwrap_err();
            assert!(
                matches!(err, VectorError::DimensionMismatch { expected: 2, actual: 1 }),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn test_minkowski_order_validation() {
        assert!(matches!(
            DistanceMetric::minkowski(0.5),
            Err(VectorError::InvalidMetricArgument(_))
        ));
        assert!(matches!(
            DistanceMetric::minkowski(f32::NAN),
            Err(VectorError::InvalidMetricArgument(_))
        ));
        assert!(matches!(
            "minkowski:0".parse::<DistanceMetric>(),
            Err(VectorError::InvalidMetricArgument(_))
        ));

        // A hand-built variant is still checked at evaluation time
        let bad = DistanceMetric::Minkowski { p: 0.0 };
        assert!(matches!(bad.calculate(&[1.0], &[2.0]), Err(VectorError::InvalidMetricArgument(_))));
    }

    #[test]
    fn test_minkowski_default_order() {
        let metric: DistanceMetric = "minkowski".parse().unwrap();
        assert_eq!(metric, DistanceMetric::Minkowski { p: DEFAULT_MINKOWSKI_P });
    }

    #[test]
    fn test_minkowski_two_matches_euclidean() {
        let a = [0.3, -1.2, 4.0, 0.0];
        let b = [1.0, 0.5, -2.0, 0.25];
        let m2 = DistanceMetric::minkowski(2.0).unwrap().calculate(&a, &b).unwrap();
        let l2 = DistanceMetric::Euclidean.calculate(&a, &b).unwrap();
        assert_near(m2, l2, 1e-4);
    }

    #[test]
    fn test_parse_rejects_unknown_and_stray_parameters() {
        assert!(matches!("hamming".parse::<DistanceMetric>(), Err(VectorError::InvalidArgument(_))));
        assert!(matches!(
            "cosine:2".parse::<DistanceMetric>(),
            Err(VectorError::InvalidArgument(_))
        ));
        assert!(matches!(
            "minkowski:abc".parse::<DistanceMetric>(),
            Err(VectorError::InvalidMetricArgument(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for metric in [
            DistanceMetric::Euclidean,
            DistanceMetric::Manhattan,
            DistanceMetric::Chebyshev,
            DistanceMetric::Minkowski { p: 2.5 },
            DistanceMetric::BrayCurtis,
            DistanceMetric::Cosine,
        ] {
            assert_eq!(metric.to_string().parse::<DistanceMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_serde_uses_metric_names() {
        let json = serde_json::to_string(&DistanceMetric::BrayCurtis).unwrap();
        assert_eq!(json, "\"bray_curtis\"");

        let parsed: DistanceMetric = serde_json::from_str("\"Cosine\"").unwrap();
        assert_eq!(parsed, DistanceMetric::Cosine);

        assert!(serde_json::from_str::<DistanceMetric>("\"nope\"").is_err());
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = [0.2, 0.4, -0.8];
        assert_near(DistanceMetric::Cosine.calculate(&a, &a).unwrap(), 1.0, EPSILON);
    }
}
