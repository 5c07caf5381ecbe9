//! Service configuration.
//!
//! # Example Configuration
//!
//! ```toml
//! root = "/var/lib/placematch"
//! metric = "cosine"
//! top_n = 5
//!
//! [extractor]
//! program = "netvlad-describe"
//! args = ["--model", "pitts30k"]
//! ```

use std::path::{Path, PathBuf};

use placematch_storage::backends::RedbConfig;
use placematch_vector::DistanceMetric;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of neighbours consulted by a top-N vote.
pub const DEFAULT_TOP_N: usize = 5;

/// Configuration for stores, matching and extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding one store file per dataset.
    pub root: PathBuf,
    /// Whether to create `root` if it doesn't exist.
    pub create_if_missing: bool,
    /// Page cache size in bytes for each store.
    pub cache_size: Option<usize>,
    /// Metric used when a query doesn't name one.
    pub metric: DistanceMetric,
    /// Neighbours consulted by a top-N vote.
    pub top_n: usize,
    /// External feature extractor.
    pub extractor: Option<ExtractorConfig>,
}

/// An external feature extractor program.
///
/// The program is run with `args` followed by the image path and must print
/// a JSON array of floats on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Program to run.
    pub program: String,
    /// Arguments placed before the image path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("descriptors"),
            create_if_missing: true,
            cache_size: None,
            metric: DistanceMetric::default(),
            top_n: DEFAULT_TOP_N,
            extractor: None,
        }
    }
}

impl Config {
    /// Create a configuration rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), ..Self::default() }
    }

    /// Load and validate a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file can't be read or parsed, or if
    /// validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values that can never work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `top_n` is zero or the extractor program
    /// is empty.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::config("top_n must be at least 1"));
        }
        if let Some(extractor) = &self.extractor {
            if extractor.program.trim().is_empty() {
                return Err(Error::config("extractor program must not be empty"));
            }
        }
        Ok(())
    }

    /// Set the store directory.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set whether to create the store directory if it doesn't exist.
    #[must_use]
    pub const fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set the per-store cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set the default metric.
    #[must_use]
    pub const fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the number of neighbours consulted by a vote.
    #[must_use]
    pub const fn top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Set the external extractor.
    #[must_use]
    pub fn extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Backend configuration for each store.
    #[must_use]
    pub fn redb_config(&self) -> RedbConfig {
        match self.cache_size {
            Some(size) => RedbConfig::new().cache_size(size),
            None => RedbConfig::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.metric, DistanceMetric::Euclidean);
        assert!(config.create_if_missing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            root = "/tmp/stores"
            metric = "minkowski:2"
            top_n = 3

            [extractor]
            program = "describe"
            args = ["--gpu"]
            "#,
        )
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/tmp/stores"));
        assert_eq!(config.metric, DistanceMetric::Minkowski { p: 2.0 });
        assert_eq!(config.top_n, 3);
        let extractor = config.extractor.unwrap();
        assert_eq!(extractor.program, "describe");
        assert_eq!(extractor.args, vec!["--gpu"]);
    }

    #[test]
    fn test_unknown_metric_rejected() {
        assert!(toml::from_str::<Config>(r#"metric = "hamming""#).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().top_n(0).validate().is_err());

        let config = Config::default()
            .extractor(ExtractorConfig { program: "  ".to_string(), args: Vec::new() });
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placematch.toml");
        std::fs::write(&path, "top_n = 7\ncache_size = 1048576\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.top_n, 7);
        assert_eq!(config.cache_size, Some(1_048_576));

        std::fs::write(&path, "top_n = 0\n").unwrap();
        assert!(Config::load(&path).is_err());
        assert!(Config::load(dir.path().join("missing.toml")).is_err());
    }
}
