//! Per-album confirmation input
//!
//! Confirmation is an input to the orchestrator, not a terminal concern: any
//! delivery mechanism can implement `AlbumConfirmer`. The binary wires the
//! stdin prompt; tests wire scripted decisions.

use crate::Result;
use std::io::Write;

/// Decision for one album prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    Upload,
    Skip,
    /// Upload this album and stop prompting for the rest of the run
    UploadAll,
}

/// Source of per-album confirmation decisions.
pub trait AlbumConfirmer {
    fn confirm(&mut self, album_title: &str) -> Result<ConfirmDecision>;
}

/// Interactive y/N/a prompt on stdin.
pub struct StdinConfirmer;

impl AlbumConfirmer for StdinConfirmer {
    fn confirm(&mut self, album_title: &str) -> Result<ConfirmDecision> {
        loop {
            print!("Upload album \"{}\"? [y/N/a] ", album_title);
            std::io::stdout().flush()?;

            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;

            match line.trim().to_lowercase().as_str() {
                "y" => return Ok(ConfirmDecision::Upload),
                "n" | "" => return Ok(ConfirmDecision::Skip),
                "a" => return Ok(ConfirmDecision::UploadAll),
                _ => continue,
            }
        }
    }
}
