use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

use crate::domain::models::{MediaKind, MediaMetadata};
use crate::domain::releases::{self, DEFAULT_QUALITY};
use crate::error::{Error, Result};

// Drops a trailing "[tag]" and/or ".ext" (3+ word characters).
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?)(-?\[.*?\])?(\.\w{3,})?$").expect("title pattern is valid")
});

// prefix, sNNeNN or year, optional quality (tags like PROPER may precede it), release
static SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(.*)\W+(s\d\de\d\d|\d{4})(?:.*?(\d{3,4}p))?\.(\w+)")
        .expect("split pattern is valid")
});

/// Parses a video path such as `dir/Show.Name.S02E05.720p.GRP.mkv`.
///
/// Fails with [`Error::Parse`] when the filename does not fit the
/// `<title>.<year|SxxExx>[.<quality>].<release>` grammar.
pub fn parse(raw_path: &str) -> Result<MediaMetadata> {
    let (path, raw_title) = match raw_path.rfind(std::path::is_separator) {
        Some(idx) => (&raw_path[..=idx], &raw_path[idx + 1..]),
        None => ("./", raw_path),
    };

    let title = TITLE_RE
        .captures(raw_title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw_title);

    let caps = SPLIT_RE
        .captures(title)
        .ok_or_else(|| Error::Parse(raw_title.to_string()))?;

    let (Some(prefix), Some(marker), Some(release)) = (caps.get(1), caps.get(2), caps.get(4))
    else {
        return Err(Error::Parse(raw_title.to_string()));
    };

    let quality = caps
        .get(3)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_QUALITY.to_string());

    let release = releases::find_release(&title[marker.end()..])
        .map(str::to_string)
        .unwrap_or_else(|| release.as_str().trim().to_string());

    let marker_text = marker.as_str().trim().to_string();
    let kind = if marker.as_str().len() == 4 {
        MediaKind::Movie { year: marker_text }
    } else {
        MediaKind::Show {
            episode: marker_text,
        }
    };

    Ok(MediaMetadata {
        path: PathBuf::from(path),
        raw_title: raw_title.to_string(),
        title: title.to_string(),
        short_title: prefix.as_str().replace('.', " ").trim().to_string(),
        quality,
        release,
        kind,
    })
}
