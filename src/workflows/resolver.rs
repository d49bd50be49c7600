use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::matchers::{full_match, partial_match};
use crate::domain::models::MediaMetadata;
use crate::error::{Error, Result};
use crate::infra::archive::ArchiveSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Full,
    Partial,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub entry: String,
    pub pass: Pass,
    pub destination: PathBuf,
}

/// Picks the archive entry to extract: the first full match, else the
/// first partial match, else simply the first entry.
pub fn resolve<'a>(metadata: &MediaMetadata, entry_names: &'a [String]) -> Option<(&'a str, Pass)> {
    let find = |pass: Pass, matches: &dyn Fn(&str) -> bool| {
        entry_names
            .iter()
            .find(|name| matches(name.as_str()))
            .map(|name| (name.as_str(), pass))
    };

    find(Pass::Full, &|name: &str| full_match(metadata, name))
        .or_else(|| find(Pass::Partial, &|name: &str| partial_match(metadata, name)))
        .or_else(|| find(Pass::Fallback, &|_: &str| true))
}

pub fn extract_subtitle(
    metadata: &MediaMetadata,
    source: &mut dyn ArchiveSource,
) -> Result<Extracted> {
    let names = source.entry_names()?;
    debug!(title = %metadata.raw_title, entries = ?names, "Archive listing");

    let (entry, pass) = resolve(metadata, &names).ok_or(Error::NoEntrySelected)?;
    let bytes = source.read_entry(entry)?;

    let destination = metadata.subtitle_path();
    fs::write(&destination, bytes).map_err(|e| Error::Write {
        path: destination.clone(),
        source: e,
    })?;

    info!(
        title = %metadata.raw_title,
        entry,
        ?pass,
        destination = %destination.display(),
        "Subtitle extracted"
    );

    Ok(Extracted {
        entry: entry.to_string(),
        pass,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::filename::parse;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Records which entries were read.
    struct FakeArchive {
        entries: Vec<(String, Vec<u8>)>,
        reads: Vec<String>,
        listing_fails: bool,
    }

    impl FakeArchive {
        fn new(entries: &[&str]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|name| (name.to_string(), name.as_bytes().to_vec()))
                    .collect(),
                reads: Vec::new(),
                listing_fails: false,
            }
        }
    }

    impl ArchiveSource for FakeArchive {
        fn entry_names(&mut self) -> Result<Vec<String>> {
            if self.listing_fails {
                return Err(Error::ArchiveListing("corrupt".to_string()));
            }
            Ok(self.entries.iter().map(|(name, _)| name.clone()).collect())
        }

        fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
            self.reads.push(name.to_string());
            let entries: HashMap<_, _> = self.entries.iter().cloned().collect();
            entries.get(name).cloned().ok_or_else(|| Error::Extract {
                entry: name.to_string(),
                reason: "missing".to_string(),
            })
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn show_in(dir: &TempDir) -> MediaMetadata {
        let path = dir.path().join("Show.S01E02.720p.GRP.mkv");
        parse(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_resolve_full_match_first() {
        let metadata = parse("Show.S01E02.720p.GRP.mkv").unwrap();
        let entries = names(&[
            "Show.S01E02.1080p.GRP.srt",
            "Show.S01E02.720p.GRP.srt",
        ]);
        assert_eq!(
            resolve(&metadata, &entries),
            Some(("Show.S01E02.720p.GRP.srt", Pass::Full))
        );
    }

    #[test]
    fn test_resolve_partial_then_fallback() {
        let metadata = parse("Show.S01E02.720p.GRP.mkv").unwrap();
        let entries = names(&["readme.txt", "Show.S01E02.WEB.GRP.srt"]);
        assert_eq!(
            resolve(&metadata, &entries),
            Some(("Show.S01E02.WEB.GRP.srt", Pass::Partial))
        );

        let entries = names(&["first.srt", "second.srt"]);
        assert_eq!(
            resolve(&metadata, &entries),
            Some(("first.srt", Pass::Fallback))
        );

        assert_eq!(resolve(&metadata, &[]), None);
    }

    #[test]
    fn test_extract_stops_at_first_full_match() {
        let dir = TempDir::new().unwrap();
        let metadata = show_in(&dir);
        let mut archive = FakeArchive::new(&[
            "Show.S01E02.720p.GRP.fre.srt",
            "Show.S01E02.720p.GRP.en.srt",
        ]);

        let extracted = extract_subtitle(&metadata, &mut archive).unwrap();

        assert_eq!(extracted.entry, "Show.S01E02.720p.GRP.fre.srt");
        assert_eq!(extracted.pass, Pass::Full);
        assert_eq!(archive.reads, vec!["Show.S01E02.720p.GRP.fre.srt"]);
        assert_eq!(
            extracted.destination,
            dir.path().join("Show.S01E02.720p.GRP.srt")
        );
        assert_eq!(
            fs::read_to_string(&extracted.destination).unwrap(),
            "Show.S01E02.720p.GRP.fre.srt"
        );
    }

    #[test]
    fn test_extract_never_reads_second_entry_after_exact_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Show.S01E02.fre.mkv");
        let metadata = parse(path.to_str().unwrap()).unwrap();
        assert_eq!(metadata.title, "Show.S01E02.fre");
        let mut archive = FakeArchive::new(&["Show.S01E02.fre.srt", "Show.S01E02.en.srt"]);

        let extracted = extract_subtitle(&metadata, &mut archive).unwrap();

        assert_eq!(extracted.entry, "Show.S01E02.fre.srt");
        assert_eq!(extracted.pass, Pass::Full);
        assert_eq!(archive.reads, vec!["Show.S01E02.fre.srt"]);
    }

    #[test]
    fn test_extract_fallback_uses_first_entry() {
        let dir = TempDir::new().unwrap();
        let metadata = show_in(&dir);
        let mut archive = FakeArchive::new(&["legenda.srt", "outra.srt"]);

        let extracted = extract_subtitle(&metadata, &mut archive).unwrap();

        assert_eq!(extracted.pass, Pass::Fallback);
        assert_eq!(archive.reads, vec!["legenda.srt"]);
    }

    #[test]
    fn test_extract_overwrites_existing_subtitle() {
        let dir = TempDir::new().unwrap();
        let metadata = show_in(&dir);
        fs::write(metadata.subtitle_path(), "old").unwrap();
        let mut archive = FakeArchive::new(&["new.srt"]);

        extract_subtitle(&metadata, &mut archive).unwrap();

        assert_eq!(fs::read_to_string(metadata.subtitle_path()).unwrap(), "new.srt");
    }

    #[test]
    fn test_empty_archive_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let metadata = show_in(&dir);
        let mut archive = FakeArchive::new(&[]);

        let result = extract_subtitle(&metadata, &mut archive);

        assert!(matches!(result, Err(Error::NoEntrySelected)));
        assert!(archive.reads.is_empty());
        assert!(!metadata.subtitle_path().exists());
    }

    #[test]
    fn test_listing_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let metadata = show_in(&dir);
        let mut archive = FakeArchive::new(&["a.srt"]);
        archive.listing_fails = true;

        let result = extract_subtitle(&metadata, &mut archive);

        assert!(matches!(result, Err(Error::ArchiveListing(_))));
        assert!(!metadata.subtitle_path().exists());
    }

    #[test]
    fn test_write_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing").join("Show.S01E02.720p.GRP.mkv");
        let metadata = parse(missing.to_str().unwrap()).unwrap();
        let mut archive = FakeArchive::new(&["a.srt"]);

        let result = extract_subtitle(&metadata, &mut archive);

        assert!(matches!(result, Err(Error::Write { .. })));
    }
}
