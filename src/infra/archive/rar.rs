use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::NamedTempFile;
use tracing::debug;

use super::ArchiveSource;
use crate::error::{Error, Result};

/// RAR archives are read through the `unrar` command line tool.
pub struct RarSource {
    file: NamedTempFile,
}

impl RarSource {
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let listing_error = |e: std::io::Error| Error::ArchiveListing(e.to_string());
        let mut file = tempfile::Builder::new()
            .prefix("legendas-divx-")
            .suffix(".rar")
            .tempfile()
            .map_err(listing_error)?;
        file.write_all(bytes).map_err(listing_error)?;
        file.flush().map_err(listing_error)?;
        Ok(Self { file })
    }

    fn unrar(&self, args: &[&str], entry: Option<&str>) -> std::io::Result<Output> {
        debug!(archive = %self.file.path().display(), ?args, ?entry, "Running unrar");
        Command::new("unrar")
            .args(unrar_args(args, self.file.path(), entry))
            .output()
    }
}

fn describe_failure(e: std::io::Error) -> String {
    if e.kind() == std::io::ErrorKind::NotFound {
        "unrar not found. Please install unrar and ensure it's in your PATH.".to_string()
    } else {
        format!("failed to execute unrar: {e}")
    }
}

impl ArchiveSource for RarSource {
    fn entry_names(&mut self) -> Result<Vec<String>> {
        let output = self
            .unrar(&["lt"], None)
            .map_err(|e| Error::ArchiveListing(describe_failure(e)))?;

        if !output.status.success() {
            return Err(Error::ArchiveListing(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_technical_listing(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let extract_error = |reason: String| Error::Extract {
            entry: name.to_string(),
            reason,
        };

        // unrar expands these as masks
        if name.contains(['*', '?']) {
            return Err(extract_error("wildcard characters in entry name".to_string()));
        }

        let output = self
            .unrar(&["p", "-inul"], Some(name))
            .map_err(|e| extract_error(describe_failure(e)))?;

        if !output.status.success() {
            return Err(extract_error(format!("unrar exited with {}", output.status)));
        }

        Ok(output.stdout)
    }
}

// -p- never prompts for a password; -- ends switch parsing.
fn unrar_args(args: &[&str], archive: &Path, entry: Option<&str>) -> Vec<OsString> {
    let mut all: Vec<OsString> = args.iter().map(OsString::from).collect();
    all.push("-p-".into());
    all.push("--".into());
    all.push(archive.into());
    if let Some(entry) = entry {
        all.push(entry.into());
    }
    all
}

/// Collects file names from `unrar lt` output, skipping directories.
fn parse_technical_listing(listing: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current: Option<String> = None;

    for line in listing.lines().map(str::trim) {
        if let Some(name) = line.strip_prefix("Name: ") {
            current = Some(name.to_string());
        } else if let Some(kind) = line.strip_prefix("Type: ") {
            if let Some(name) = current.take() {
                if kind.trim() == "File" {
                    names.push(name);
                }
            }
        }
    }

    names
}
