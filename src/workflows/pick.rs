use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::pipeline::Selection;
use crate::domain::models::{MatchQuality, SearchResults};

/// Asks which of the non-optimal candidates to download for each file.
///
/// Ctrl-C sets `cancel` and stops asking; Ctrl-D skips the remaining files.
pub fn pick_manually(results: &[SearchResults], cancel: &AtomicBool) -> Result<Vec<Selection>> {
    let mut selections = Vec::new();
    if results.is_empty() {
        return Ok(selections);
    }

    let mut rl = DefaultEditor::new()?;
    for result in results {
        println!("\n{}", result.metadata.raw_title);
        for (i, candidate) in result.others.iter().enumerate() {
            let first_line = candidate.desc.lines().next().unwrap_or_default();
            println!(
                "  {}. [{} / {}] {}",
                i + 1,
                candidate.user,
                candidate.rank,
                first_line
            );
        }

        loop {
            let input = match rl.readline("Choose a number (Enter to skip): ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    cancel.store(true, Ordering::Release);
                    return Ok(selections);
                }
                Err(ReadlineError::Eof) => return Ok(selections),
                Err(e) => return Err(e.into()),
            };

            match parse_choice(&input, result.others.len()) {
                Ok(Some(index)) => {
                    selections.push(Selection {
                        metadata: result.metadata.clone(),
                        candidate: result.others[index].clone(),
                        quality: MatchQuality::Manual,
                    });
                    break;
                }
                Ok(None) => break,
                Err(e) => println!("{e}"),
            }
        }
    }

    Ok(selections)
}

fn parse_choice(input: &str, len: usize) -> Result<Option<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(Some(n - 1)),
        _ => bail!("Please enter a number between 1 and {len}."),
    }
}
