mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod logging;
mod media;
mod workflows;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use cli::Cli;
use infra::legendas_divx::LegendasDivxClient;
use media::{filename, files};
use workflows::{pick, pipeline, report};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose || config::debug_requested());

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load()?;
    let jobs = cli.jobs.filter(|j| *j > 0).unwrap_or(config.jobs);
    let verbose = cli.verbose || config::debug_requested();

    let videos = files::collect_videos(&cli.inputs, cli.recursive, cli.force);
    if videos.is_empty() {
        bail!("No files to process");
    }

    let metadata: Vec<_> = videos
        .iter()
        .filter_map(|video| match filename::parse(&video.to_string_lossy()) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(path = %video.display(), "{e}");
                None
            }
        })
        .collect();
    if metadata.is_empty() {
        bail!("None of the {} files could be parsed", videos.len());
    }
    info!(files = metadata.len(), jobs, "Searching subtitles");

    let client = LegendasDivxClient::new().context("Failed to build HTTP client")?;
    client
        .login(&config.credentials.username, &config.credentials.password)
        .context("Failed to log in to legendasdivx.pt")?;

    let pool = pipeline::worker_pool(jobs).context("Failed to start worker threads")?;
    let cancel = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(Arc::clone(&cancel))?;

    let results = pipeline::search_all(&client, &metadata, &pool, &cancel);
    if verbose {
        report::print_dump(&results);
    }

    let split = pipeline::split_results(results);
    report::print_no_results(&split.no_results);
    report::print_other_results(&split.other_results);

    let mut selections = pipeline::best_selections(&split.with_results);
    if cli.interactive {
        selections.extend(pick::pick_manually(&split.other_results, &cancel)?);
    }
    if cancel.load(Ordering::Acquire) {
        info!("Cancelled, no subtitles downloaded");
        return Ok(());
    }

    let outcomes = pipeline::download_all(&client, &selections, &pool, &cancel);
    report::print_downloads(&outcomes);

    let written = outcomes.iter().filter(|o| o.result.is_ok()).count();
    info!(
        written,
        failed = outcomes.len() - written,
        no_results = split.no_results.len(),
        "Done"
    );
    Ok(())
}

// First Ctrl-C stops new searches and downloads; a second one exits.
fn install_interrupt_handler(cancel: Arc<AtomicBool>) -> Result<()> {
    ctrlc::set_handler(move || {
        if cancel.swap(true, Ordering::AcqRel) {
            std::process::exit(130);
        }
        warn!("Interrupted, finishing the files already in progress");
    })
    .context("Failed to install the Ctrl-C handler")
}
