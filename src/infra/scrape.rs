use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::domain::models::RawCandidate;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static SUB_BOX: Lazy<Selector> = Lazy::new(|| selector("div.sub_box"));
static USER_LINK: Lazy<Selector> = Lazy::new(|| selector(r#"a[href*="User_Info"]"#));
static RANK_IMG: Lazy<Selector> = Lazy::new(|| selector(r#"img[src*="rank"]"#));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector("td.td_desc"));
static DOWNLOAD_LINK: Lazy<Selector> =
    Lazy::new(|| selector("a.sub_download[href], .sub_download a[href]"));

static USER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"username=(\w+)").expect("user pattern is valid"));
static RANK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"rank(\d+)\.gif").expect("rank pattern is valid"));

/// Pulls the subtitle entries out of a search results page.
///
/// Entries without an uploader or a download link are skipped.
pub fn parse_candidates(html: &str) -> Vec<RawCandidate> {
    let document = Html::parse_document(html);
    let candidates: Vec<_> = document
        .select(&SUB_BOX)
        .filter_map(candidate_from_box)
        .collect();
    debug!(count = candidates.len(), "Scraped search results");
    candidates
}

fn candidate_from_box(sub_box: ElementRef<'_>) -> Option<RawCandidate> {
    let user = sub_box
        .select(&USER_LINK)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| USER_RE.captures(href))
        .map(|caps| caps[1].to_string())?;

    let badge = sub_box
        .select(&RANK_IMG)
        .filter_map(|img| img.value().attr("src"))
        .find_map(|src| RANK_RE.captures(src))
        .map(|caps| caps[1].to_string());

    let description_html = sub_box
        .select(&DESCRIPTION)
        .next()
        .map(|td| td.inner_html())
        .unwrap_or_default();

    let url = sub_box
        .select(&DOWNLOAD_LINK)
        .filter_map(|a| a.value().attr("href"))
        .next()?
        .replace("&amp;", "&");

    Some(RawCandidate {
        user,
        badge,
        description_html,
        url,
    })
}
