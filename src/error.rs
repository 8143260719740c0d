//! Error type shared by the config readers, providers and manifest resolver

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong while deriving options or resolving files.
///
/// A missing config file is never an error: lookups return `None` and the
/// callers fall back to the options they were given.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a config or source file failed
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `tslint.json` or `tsconfig.json` is not valid JSON (comments and
    /// trailing commas are accepted)
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    /// `lintfmt.toml` is not valid TOML or has wrongly typed keys
    #[error("failed to parse {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A manifest that cannot select any files
    #[error("invalid configuration in {}: {message}", .path.display())]
    Configuration { path: PathBuf, message: String },

    /// The resolver was built without a collaborator it now needs
    #[error("missing capability: {0}")]
    MissingCapability(String),

    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
