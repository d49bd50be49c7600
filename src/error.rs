use std::path::PathBuf;

use thiserror::Error;

/// Per-file failures. None of these abort the batch on their own.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not parse media filename: {0}")]
    Parse(String),

    #[error("search failed: {0}")]
    Search(String),

    #[error("login failed: {0}")]
    Login(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download failed: {0}")]
    Download(String),

    #[error("content type not supported: {0}")]
    UnsupportedContentType(String),

    #[error("site answered with an HTML page instead of an archive, saved in {}", saved_to.display())]
    HtmlPayload { saved_to: PathBuf },

    #[error("couldn't get file list from archive: {0}")]
    ArchiveListing(String),

    #[error("archive has no entries")]
    NoEntrySelected,

    #[error("couldn't extract {entry}: {reason}")]
    Extract { entry: String, reason: String },

    #[error("couldn't write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
