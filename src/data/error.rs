use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce catalog or chapter data from the bundled files. The
/// top-level message names the operation; the source carries the cause.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load table of contents")]
    Catalog {
        #[source]
        source: ContentError,
    },
    #[error("failed to load extra chapter summaries")]
    ExtraSummaries {
        #[source]
        source: ContentError,
    },
    #[error("failed to load sura {number} data")]
    Chapter {
        number: u32,
        #[source]
        source: ContentError,
    },
}

/// Why a bundled file could not be used.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("could not read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed content JSON")]
    Decode(#[from] serde_json::Error),
    #[error("inconsistent chapter content: {0}")]
    Invalid(String),
}
