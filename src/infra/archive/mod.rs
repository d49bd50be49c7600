pub mod rar;
pub mod zip;

use crate::error::Result;

/// Read access to a downloaded subtitle archive.
pub trait ArchiveSource {
    fn entry_names(&mut self) -> Result<Vec<String>>;

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Rar,
    Zip,
    Html,
}

impl PayloadKind {
    /// Maps a `Content-Type` header value, ignoring parameters such as `charset`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match media_type.as_str() {
            "application/x-rar-compressed" => Some(PayloadKind::Rar),
            "application/zip" => Some(PayloadKind::Zip),
            "text/html" => Some(PayloadKind::Html),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            PayloadKind::Rar => "rar",
            PayloadKind::Zip => "zip",
            PayloadKind::Html => "html",
        }
    }
}
