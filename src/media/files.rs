use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi"];

pub fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

pub fn has_subtitle(path: &Path) -> bool {
    path.with_extension("srt").exists()
}

/// Expands the inputs into the video files to process.
///
/// Directories are scanned (recursively if asked). Unless `force` is set,
/// videos that already have an `.srt` next to them are skipped.
pub fn collect_videos(inputs: &[PathBuf], recursive: bool, force: bool) -> Vec<PathBuf> {
    let mut videos = Vec::new();

    for input in inputs {
        if input.is_dir() {
            if let Err(e) = collect_videos_helper(input, recursive, &mut videos) {
                warn!(path = %input.display(), "Error scanning directory: {e}");
            }
        } else if !input.exists() {
            warn!(path = %input.display(), "Input path does not exist");
        } else if is_video(input) {
            videos.push(input.clone());
        } else {
            warn!(path = %input.display(), "Skipping (Bad Format)");
        }
    }

    videos.retain(|video| {
        if force || !has_subtitle(video) {
            return true;
        }
        info!(
            path = %video.display(),
            "Subtitle exists already, skipping. Use -f to force download."
        );
        false
    });

    videos
}

fn collect_videos_helper(dir_path: &Path, recurse: bool, videos: &mut Vec<PathBuf>) -> Result<()> {
    let mut found = Vec::new();

    for entry in fs::read_dir(dir_path)? {
        let path = entry?.path();

        if path.is_file() {
            if is_video(&path) {
                found.push(path);
            }
        } else if path.is_dir() && recurse {
            collect_videos_helper(&path, recurse, &mut found)?;
        }
    }

    found.sort();
    videos.extend(found);
    Ok(())
}
