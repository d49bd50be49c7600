use std::io::{Cursor, Read};

use ::zip::ZipArchive;

use super::ArchiveSource;
use crate::error::{Error, Result};

const MAX_PREALLOC: u64 = 1 << 20;

pub struct ZipSource {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl ZipSource {
    pub fn open(bytes: Vec<u8>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ArchiveListing(e.to_string()))?;
        Ok(Self { archive })
    }
}

impl ArchiveSource for ZipSource {
    fn entry_names(&mut self) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let entry = self
                .archive
                .by_index(i)
                .map_err(|e| Error::ArchiveListing(e.to_string()))?;
            // Directory names end with '/'
            if entry.is_dir() || entry.name().ends_with('/') {
                continue;
            }
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let extract_error = |reason: String| Error::Extract {
            entry: name.to_string(),
            reason,
        };
        let mut entry = self
            .archive
            .by_name(name)
            .map_err(|e| extract_error(e.to_string()))?;
        // the declared size is untrusted
        let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| extract_error(e.to_string()))?;
        Ok(bytes)
    }
}
