use crate::domain::models::{SearchResults, SubtitleCandidate};
use crate::domain::releases::releases_mentioned;
use crate::infra::legendas_divx::absolute_url;

use super::pipeline::DownloadOutcome;
use super::resolver::Pass;

pub fn print_no_results(results: &[SearchResults]) {
    if results.is_empty() {
        return;
    }
    println!("\nNo results found:");
    for result in results {
        println!("  {}", result.metadata.raw_title);
    }
}

pub fn print_other_results(results: &[SearchResults]) {
    if results.is_empty() {
        return;
    }
    println!("\nNon optimal subtitles:");
    for result in results {
        println!("  {}", result.metadata.raw_title);
        for candidate in &result.others {
            println!("    {}", other_line(candidate));
        }
    }
}

pub fn print_downloads(outcomes: &[DownloadOutcome]) {
    if outcomes.is_empty() {
        return;
    }
    println!("\nDownloads:");
    for outcome in outcomes {
        println!("{}", download_line(outcome));
    }
}

pub fn print_dump(results: &[SearchResults]) {
    match serde_json::to_string_pretty(results) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!("Could not serialize search results: {e}"),
    }
}

fn user_and_rank(candidate: &SubtitleCandidate) -> String {
    format!("[{} / {}]", candidate.user, candidate.rank)
}

fn other_line(candidate: &SubtitleCandidate) -> String {
    let url = absolute_url(&candidate.url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| candidate.url.clone());
    let releases = releases_mentioned(&candidate.desc);

    let mut line = format!("{url} {}", user_and_rank(candidate));
    if !releases.is_empty() {
        line.push(' ');
        line.push_str(&releases.join(", "));
    }
    line
}

fn download_line(outcome: &DownloadOutcome) -> String {
    let selection = &outcome.selection;
    let prefix = format!(
        "{}\t[{}] {}",
        selection.metadata.raw_title,
        selection.quality.label(),
        user_and_rank(&selection.candidate)
    );
    match &outcome.result {
        Ok(extracted) if extracted.pass == Pass::Fallback => {
            format!("{prefix} (no name matched, took {})", extracted.entry)
        }
        Ok(_) => prefix,
        Err(e) => format!("{prefix} failed: {e}"),
    }
}
