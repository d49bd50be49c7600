use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::resolver::{extract_subtitle, Extracted};
use crate::domain::models::MediaMetadata;
use crate::error::{Error, Result};
use crate::infra::archive::rar::RarSource;
use crate::infra::archive::zip::ZipSource;
use crate::infra::archive::PayloadKind;
use crate::infra::SubtitleSite;

pub fn fetch_and_extract(
    site: &dyn SubtitleSite,
    metadata: &MediaMetadata,
    url: &str,
) -> Result<Extracted> {
    let download = site.download(url)?;
    let kind = PayloadKind::from_content_type(&download.content_type)
        .ok_or_else(|| Error::UnsupportedContentType(download.content_type.clone()))?;
    debug!(title = %metadata.raw_title, ?kind, "Dispatching payload");

    match kind {
        PayloadKind::Rar => {
            let mut source = RarSource::open(&download.bytes)?;
            extract_subtitle(metadata, &mut source)
        }
        PayloadKind::Zip => {
            let mut source = ZipSource::open(download.bytes)?;
            extract_subtitle(metadata, &mut source)
        }
        PayloadKind::Html => {
            let saved_to = keep_payload(&download.bytes, kind)?;
            warn!(title = %metadata.raw_title, path = %saved_to.display(), "HTML file saved");
            Err(Error::HtmlPayload { saved_to })
        }
    }
}

// Persisted past the end of the run.
fn keep_payload(bytes: &[u8], kind: PayloadKind) -> Result<PathBuf> {
    let suffix = format!(".{}", kind.extension());
    let write_error = |source: std::io::Error| Error::Write {
        path: std::env::temp_dir(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix("legendas-divx-")
        .suffix(&suffix)
        .tempfile()
        .map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    let (_, path) = file.keep().map_err(|e| write_error(e.error))?;
    Ok(path)
}
