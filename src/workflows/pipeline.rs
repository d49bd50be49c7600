use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{debug, warn};

use super::download::fetch_and_extract;
use super::ranker;
use super::resolver::Extracted;
use crate::domain::models::{MatchQuality, MediaMetadata, SearchResults, SubtitleCandidate};
use crate::error::Result;
use crate::infra::SubtitleSite;

#[derive(Debug, Clone)]
pub struct Selection {
    pub metadata: MediaMetadata,
    pub candidate: SubtitleCandidate,
    pub quality: MatchQuality,
}

#[derive(Debug)]
pub struct DownloadOutcome {
    pub selection: Selection,
    pub result: Result<Extracted>,
}

#[derive(Debug, Default)]
pub struct Split {
    pub no_results: Vec<SearchResults>,
    pub with_results: Vec<SearchResults>,
    pub other_results: Vec<SearchResults>,
}

pub fn worker_pool(jobs: usize) -> std::result::Result<ThreadPool, ThreadPoolBuildError> {
    ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|idx| format!("legendas-divx-{idx}"))
        .build()
}

/// Runs `work` over `items` on `pool`, keeping input order.
///
/// Once `cancel` is set no new item is started. Items already running
/// finish and their results are kept.
pub fn fan_out<T, R, F>(pool: &ThreadPool, items: &[T], cancel: &AtomicBool, work: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    pool.install(|| {
        items
            .par_iter()
            .filter_map(|item| (!cancel.load(Ordering::Acquire)).then(|| work(item)))
            .collect()
    })
}

pub fn search_all(
    site: &dyn SubtitleSite,
    metadata: &[MediaMetadata],
    pool: &ThreadPool,
    cancel: &AtomicBool,
) -> Vec<SearchResults> {
    fan_out(pool, metadata, cancel, |metadata| {
        match site.search(metadata) {
            Ok(candidates) => ranker::rank(metadata.clone(), candidates),
            Err(e) => {
                warn!(title = %metadata.raw_title, "{e}");
                SearchResults::empty(metadata.clone())
            }
        }
    })
}

pub fn split_results(results: Vec<SearchResults>) -> Split {
    let mut split = Split::default();
    for result in results {
        if result.best().is_some() {
            split.with_results.push(result);
        } else if result.is_empty() {
            split.no_results.push(result);
        } else {
            split.other_results.push(result);
        }
    }
    split
}

pub fn best_selections(results: &[SearchResults]) -> Vec<Selection> {
    results
        .iter()
        .filter_map(|result| {
            result.best().map(|(candidate, quality)| Selection {
                metadata: result.metadata.clone(),
                candidate: candidate.clone(),
                quality,
            })
        })
        .collect()
}

pub fn download_all(
    site: &dyn SubtitleSite,
    selections: &[Selection],
    pool: &ThreadPool,
    cancel: &AtomicBool,
) -> Vec<DownloadOutcome> {
    fan_out(pool, selections, cancel, |selection| {
        let result = fetch_and_extract(site, &selection.metadata, &selection.candidate.url);
        match &result {
            Ok(extracted) => debug!(
                title = %selection.metadata.raw_title,
                destination = %extracted.destination.display(),
                "Download finished"
            ),
            Err(e) => warn!(title = %selection.metadata.raw_title, "{e}"),
        }
        DownloadOutcome {
            selection: selection.clone(),
            result,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RawCandidate;
    use crate::infra::archive::zip::tests::build_zip;
    use crate::infra::Download;
    use crate::media::filename::parse;
    use crate::workflows::download::tests::FakeSite;
    use std::fs;
    use tempfile::TempDir;

    fn raw(user: &str, badge: &str, desc: &str, url: &str) -> RawCandidate {
        RawCandidate {
            user: user.to_string(),
            badge: Some(badge.to_string()),
            description_html: desc.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_fan_out_keeps_order() {
        let items: Vec<u32> = (0..50).collect();
        let cancel = AtomicBool::new(false);
        let doubled = fan_out(&worker_pool(8).unwrap(), &items, &cancel, |n| n * 2);
        assert_eq!(doubled, items.iter().map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_fan_out_handles_empty_input_and_default_pool() {
        let cancel = AtomicBool::new(false);
        let pool = worker_pool(4).unwrap();
        assert!(fan_out(&pool, &[] as &[u32], &cancel, |n| *n).is_empty());

        // zero lets rayon pick the thread count
        let default_pool = worker_pool(0).unwrap();
        assert_eq!(fan_out(&default_pool, &[1, 2, 3], &cancel, |n| n + 1), vec![2, 3, 4]);
    }

    #[test]
    fn test_fan_out_stops_starting_work_after_cancel() {
        let items: Vec<u32> = (0..10).collect();
        let cancel = AtomicBool::new(false);
        let processed = fan_out(&worker_pool(1).unwrap(), &items, &cancel, |n| {
            if *n == 2 {
                cancel.store(true, Ordering::Release);
            }
            *n
        });
        assert_eq!(processed, vec![0, 1, 2]);
    }

    #[test]
    fn test_cancelled_before_start_does_nothing() {
        let cancel = AtomicBool::new(true);
        assert!(fan_out(&worker_pool(2).unwrap(), &[1, 2, 3], &cancel, |n| *n).is_empty());
    }

    #[test]
    #[should_panic(expected = "worker failed")]
    fn test_worker_panic_reaches_caller() {
        let cancel = AtomicBool::new(false);
        fan_out(&worker_pool(2).unwrap(), &[1, 2, 3], &cancel, |n| {
            if *n == 2 {
                panic!("worker failed");
            }
            *n
        });
    }

    #[test]
    fn test_split_results() {
        let metadata = parse("Movie.Title.2021.1080p.RLSGRP.mkv").unwrap();
        let exact = "Movie.Title.2021.1080p.RLSGRP";

        let with_hit = ranker::rank(metadata.clone(), vec![raw("a", "5", exact, "1")]);
        let only_others = ranker::rank(metadata.clone(), vec![raw("a", "5", "nope", "2")]);
        let nothing = SearchResults::empty(metadata);

        let split = split_results(vec![nothing, only_others, with_hit]);

        assert_eq!(split.no_results.len(), 1);
        assert_eq!(split.other_results.len(), 1);
        assert_eq!(split.with_results.len(), 1);
        assert_eq!(best_selections(&split.with_results)[0].candidate.url, "1");
        assert!(best_selections(&split.other_results).is_empty());
    }

    #[test]
    fn test_search_then_download_end_to_end() {
        let dir = TempDir::new().unwrap();
        let movie_path = dir.path().join("Movie.Title.2021.1080p.RLSGRP.mkv");
        let show_path = dir.path().join("Show.Name.S02E05.720p.GRP.mkv");
        let movie = parse(movie_path.to_str().unwrap()).unwrap();
        let show = parse(show_path.to_str().unwrap()).unwrap();

        let mut site = FakeSite::default();
        site.searches.insert(
            movie.raw_title.clone(),
            vec![
                raw("low", "2", "Movie.Title.2021.1080p.RLSGRP", "lid=low"),
                raw("razor2911", "1", "Movie.Title.2021.1080p.RLSGRP", "lid=trusted"),
                raw("x", "9", "Movie.Title.DVDRip", "lid=other"),
            ],
        );
        site.downloads.insert(
            "lid=trusted".to_string(),
            Download {
                content_type: "application/zip".to_string(),
                bytes: build_zip(&[("legenda.srt", "1\n00:00:01,000 --> 00:00:02,000\nOla\n")]),
            },
        );

        let pool = worker_pool(2).unwrap();
        let cancel = AtomicBool::new(false);
        let results = search_all(&site, &[movie, show], &pool, &cancel);
        assert_eq!(results.len(), 2);
        // the show search fails and is reported as having no results
        assert!(results[1].is_empty());

        let split = split_results(results);
        let selections = best_selections(&split.with_results);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].candidate.url, "lid=trusted");
        assert_eq!(selections[0].quality, MatchQuality::Optimal);

        let outcomes = download_all(&site, &selections, &pool, &cancel);
        assert_eq!(outcomes.len(), 1);
        let extracted = outcomes[0].result.as_ref().unwrap();
        assert_eq!(extracted.destination, movie_path.with_extension("srt"));
        assert!(fs::read_to_string(&extracted.destination)
            .unwrap()
            .contains("Ola"));
        assert!(!show_path.with_extension("srt").exists());
    }

    #[test]
    fn test_failed_download_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let first = parse(dir.path().join("A.Movie.2020.720p.GRP.mkv").to_str().unwrap()).unwrap();
        let second = parse(dir.path().join("B.Movie.2020.720p.GRP.mkv").to_str().unwrap()).unwrap();

        let mut site = FakeSite::default();
        site.downloads.insert(
            "lid=b".to_string(),
            Download {
                content_type: "application/zip".to_string(),
                bytes: build_zip(&[("b.srt", "b")]),
            },
        );

        let selection = |metadata: MediaMetadata, url: &str| Selection {
            metadata,
            candidate: SubtitleCandidate {
                user: "u".to_string(),
                rank: 5,
                desc: String::new(),
                url: url.to_string(),
            },
            quality: MatchQuality::Partial,
        };

        let cancel = AtomicBool::new(false);
        let outcomes = download_all(
            &site,
            &[selection(first, "lid=a"), selection(second.clone(), "lid=b")],
            &worker_pool(1).unwrap(),
            &cancel,
        );

        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert!(second.subtitle_path().exists());
    }

    #[test]
    fn test_cancel_between_search_and_download_skips_downloads() {
        let dir = TempDir::new().unwrap();
        let movie_path = dir.path().join("Movie.Title.2021.1080p.RLSGRP.mkv");
        let movie = parse(movie_path.to_str().unwrap()).unwrap();

        let mut site = FakeSite::default();
        site.searches.insert(
            movie.raw_title.clone(),
            vec![raw("a", "5", "Movie.Title.2021.1080p.RLSGRP", "lid=1")],
        );
        site.downloads.insert(
            "lid=1".to_string(),
            Download {
                content_type: "application/zip".to_string(),
                bytes: build_zip(&[("a.srt", "a")]),
            },
        );

        let pool = worker_pool(2).unwrap();
        let cancel = AtomicBool::new(false);
        let results = search_all(&site, &[movie.clone()], &pool, &cancel);
        let selections = best_selections(&split_results(results).with_results);
        assert_eq!(selections.len(), 1);

        cancel.store(true, Ordering::Release);
        let outcomes = download_all(&site, &selections, &pool, &cancel);

        assert!(outcomes.is_empty());
        assert!(!movie.subtitle_path().exists());
        assert!(!site
            .requested
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.starts_with("download:")));
    }
}
