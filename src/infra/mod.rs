pub mod archive;
pub mod legendas_divx;
pub mod scrape;

use crate::domain::models::{MediaMetadata, RawCandidate};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Download {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// An authenticated subtitle site. Shared read-only between worker threads.
pub trait SubtitleSite: Sync {
    fn search(&self, metadata: &MediaMetadata) -> Result<Vec<RawCandidate>>;

    fn download(&self, url: &str) -> Result<Download>;
}
