//! Command implementations.

pub mod datasets;
pub mod describe;
pub mod recognize;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use placematch::ingest::{CommandExtractor, Extractor};
use placematch::{Config, StoreRegistry};

use crate::error::{CliError, Result};

/// Resolved configuration and the store registry built from it.
pub struct Context {
    pub config: Config,
    pub registry: Arc<StoreRegistry>,
}

impl Context {
    /// Load the config file if given, apply command line overrides and open
    /// the registry.
    pub fn load(config_path: Option<&Path>, root: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(root) = root {
            config.root = root;
        }

        let registry = Arc::new(StoreRegistry::from_config(&config)?);
        Ok(Self { config, registry })
    }

    /// The extractor named on the command line, falling back to the config.
    pub fn extractor(&self, program: Option<String>, args: Vec<String>) -> Result<Arc<dyn Extractor>> {
        let extractor = match (program, &self.config.extractor) {
            (Some(program), _) => CommandExtractor::new(program).args(args),
            (None, Some(config)) => CommandExtractor::from(config),
            (None, None) => return Err(CliError::NoExtractor),
        };
        Ok(Arc::new(extractor))
    }
}

/// Require that `path` exists.
pub fn existing_file(path: &Path) -> Result<&Path> {
    if path.exists() {
        Ok(path)
    } else {
        Err(CliError::FileNotFound(path.to_path_buf()))
    }
}
