use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaKind {
    Movie { year: String },
    Show { episode: String },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    pub path: PathBuf,
    pub raw_title: String,
    pub title: String,
    pub short_title: String,
    pub quality: String,
    pub release: String,
    pub kind: MediaKind,
}

impl MediaMetadata {
    pub fn is_movie(&self) -> bool {
        matches!(self.kind, MediaKind::Movie { .. })
    }

    pub fn year_or_episode(&self) -> &str {
        match &self.kind {
            MediaKind::Movie { year } => year,
            MediaKind::Show { episode } => episode,
        }
    }

    pub fn subtitle_path(&self) -> PathBuf {
        let file_name = Path::new(&self.raw_title).with_extension("srt");
        self.path.join(file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub user: String,
    pub badge: Option<String>,
    pub description_html: String,
    pub url: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SubtitleCandidate {
    pub user: String,
    pub rank: u32,
    pub desc: String,
    pub url: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct SearchResults {
    pub metadata: MediaMetadata,
    pub hits: Vec<SubtitleCandidate>,
    pub partial_hits: Vec<SubtitleCandidate>,
    pub others: Vec<SubtitleCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    Optimal,
    Partial,
    Manual,
}

impl MatchQuality {
    pub fn label(&self) -> &'static str {
        match self {
            MatchQuality::Optimal => "optimal",
            MatchQuality::Partial => "partial match",
            MatchQuality::Manual => "manual",
        }
    }
}

impl SearchResults {
    pub fn empty(metadata: MediaMetadata) -> Self {
        Self {
            metadata,
            hits: Vec::new(),
            partial_hits: Vec::new(),
            others: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty() && self.partial_hits.is_empty() && self.others.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len() + self.partial_hits.len() + self.others.len()
    }

    pub fn best(&self) -> Option<(&SubtitleCandidate, MatchQuality)> {
        self.hits
            .first()
            .map(|c| (c, MatchQuality::Optimal))
            .or_else(|| self.partial_hits.first().map(|c| (c, MatchQuality::Partial)))
    }
}
