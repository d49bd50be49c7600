use scraper::Html;
use tracing::debug;

use super::matchers::{full_match, partial_match};
use crate::domain::models::{MediaMetadata, RawCandidate, SearchResults, SubtitleCandidate};
use crate::domain::releases::{self, DEFAULT_RANK, TRUSTED_RANK};

/// Splits the scraped candidates into hits, partial hits and the rest.
///
/// Hits and partial hits are sorted by rank, highest first; equal ranks keep
/// the order the site listed them in. `others` is left as listed.
pub fn rank<I>(metadata: MediaMetadata, raw_candidates: I) -> SearchResults
where
    I: IntoIterator<Item = RawCandidate>,
{
    let mut results = SearchResults::empty(metadata);

    for raw in raw_candidates {
        let candidate = SubtitleCandidate {
            rank: candidate_rank(&raw.user, raw.badge.as_deref()),
            desc: strip_html(&raw.description_html),
            user: raw.user,
            url: raw.url,
        };

        if full_match(&results.metadata, &candidate.desc) {
            results.hits.push(candidate);
        } else if partial_match(&results.metadata, &candidate.desc) {
            results.partial_hits.push(candidate);
        } else {
            results.others.push(candidate);
        }
    }

    // sort_by is stable
    results.hits.sort_by(|a, b| b.rank.cmp(&a.rank));
    results.partial_hits.sort_by(|a, b| b.rank.cmp(&a.rank));

    debug!(
        title = %results.metadata.raw_title,
        total = results.len(),
        hits = results.hits.len(),
        partial_hits = results.partial_hits.len(),
        others = results.others.len(),
        "Ranked search results"
    );

    results
}

fn candidate_rank(user: &str, badge: Option<&str>) -> u32 {
    if releases::is_trusted(user) {
        return TRUSTED_RANK;
    }
    badge
        .and_then(|b| b.trim().parse().ok())
        .unwrap_or(DEFAULT_RANK)
}

/// Text of an HTML fragment with entities decoded, one line per text node.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
