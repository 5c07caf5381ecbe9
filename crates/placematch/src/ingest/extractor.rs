//! Feature extraction capability.
//!
//! The core only needs `extract(image) -> vector`; how the vector is made
//! (a CNN, NetVLAD, a test stub) is up to the [`Extractor`] implementation.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::trace;

use crate::config::ExtractorConfig;

/// Errors raised by an [`Extractor`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The image could not be read.
    #[error("cannot read image {path}: {source}")]
    Unreadable {
        /// The image path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The extractor failed on the image.
    #[error("extractor failed on {path}: {message}")]
    Failed {
        /// The image path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The extractor produced something other than a float vector.
    #[error("invalid extractor output for {path}: {message}")]
    InvalidOutput {
        /// The image path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

impl ExtractionError {
    /// Create a failure for `path`.
    #[must_use]
    pub fn failed(path: &Path, message: impl Into<String>) -> Self {
        Self::Failed { path: path.to_path_buf(), message: message.into() }
    }
}

/// Turns an image into a fixed-length descriptor.
///
/// Implementations may block for a long time; callers must not hold shared
/// locks across [`extract`](Extractor::extract).
pub trait Extractor: Send + Sync {
    /// Extract a descriptor from the image at `image`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] if the image is unreadable or corrupt,
    /// or if the extractor fails internally.
    fn extract(&self, image: &Path) -> Result<Vec<f32>, ExtractionError>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<Vec<f32>, ExtractionError> + Send + Sync,
{
    fn extract(&self, image: &Path) -> Result<Vec<f32>, ExtractionError> {
        self(image)
    }
}

/// Runs an external program per image and parses its JSON output.
///
/// The program is invoked as `program args... <image>` and must print a
/// JSON array of numbers on stdout and exit with status zero.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
}

impl CommandExtractor {
    /// Create an extractor running `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    /// Add arguments placed before the image path.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl From<&ExtractorConfig> for CommandExtractor {
    fn from(config: &ExtractorConfig) -> Self {
        Self::new(config.program.clone()).args(config.args.iter().cloned())
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, image: &Path) -> Result<Vec<f32>, ExtractionError> {
        std::fs::metadata(image)
            .map_err(|source| ExtractionError::Unreadable { path: image.to_path_buf(), source })?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .output()
            .map_err(|e| ExtractionError::failed(image, format!("cannot run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::failed(
                image,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let vector: Vec<f32> = serde_json::from_slice(&output.stdout).map_err(|e| {
            ExtractionError::InvalidOutput { path: image.to_path_buf(), message: e.to_string() }
        })?;

        trace!(image = %image.display(), dimension = vector.len(), "extracted descriptor");
        Ok(vector)
    }
}
