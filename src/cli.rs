use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "legendas-divx")]
#[command(version)]
#[command(about = "Download subtitles from legendasdivx.pt for local video files")]
pub struct Cli {
    /// Video files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Download even when a subtitle already exists
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Recursively scan directories for video files
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Debug logging and a dump of every search result
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Number of concurrent searches/downloads
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Pick manually among non-optimal results
    #[arg(short = 'i', long)]
    pub interactive: bool,
}
