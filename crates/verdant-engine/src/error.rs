//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the run.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: verdant_core::ConfigError,
    },

    /// The simulation could not be built from the configuration.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: verdant_core::SetupError,
    },

    /// An environment variable holds an unusable value.
    #[error("environment variable {name}={value} is invalid")]
    Env {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// A file could not be read or written.
    #[error("cannot access {}: {source}", .path.display())]
    File {
        /// File path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A JSON document is malformed.
    #[error("cannot parse {}: {source}", .path.display())]
    Json {
        /// File path.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The world document failed boundary validation.
    #[error("invalid world: {source}")]
    World {
        /// The underlying validation error.
        #[from]
        source: verdant_core::WorldValidationError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: verdant_core::RunnerError,
    },

    /// Hashing failed or the run drifted from the golden master.
    #[error("golden master: {source}")]
    Golden {
        /// The underlying golden error.
        #[from]
        source: verdant_core::GoldenError,
    },
}
