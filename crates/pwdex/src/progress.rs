// SPDX-FileCopyrightText: 2026 Pwdex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal progress bar for imports.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pwdex_import::{ImportBatch, ImportObserver, Progress};

/// Shows `processed/total` while the insertion pipeline runs.
pub struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    /// A visible bar on an interactive stderr, a hidden one otherwise.
    pub fn new(plain: bool) -> Self {
        let bar = ProgressBar::new(0);
        if plain || !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else if let Ok(style) =
            ProgressStyle::default_bar().template("{bar:30.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }
}

impl ImportObserver for BarObserver {
    fn on_progress(&mut self, progress: Progress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.processed as u64);
        self.bar.set_message(format!("{} imported", progress.inserted));
    }

    fn on_complete(&mut self, _batch: &ImportBatch) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_bar_tracks_progress() {
        let mut observer = BarObserver::new(true);
        observer.on_progress(Progress {
            processed: 3,
            inserted: 2,
            total: 5,
        });
        assert_eq!(observer.bar.position(), 3);
        assert_eq!(observer.bar.length(), Some(5));
        observer.on_complete(&ImportBatch::default());
        assert!(observer.bar.is_finished());
    }
}
