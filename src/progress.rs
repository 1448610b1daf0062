//! Progress bar display for install runs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for catalog installs and staging copies
pub struct ProgressDisplay {
    /// Main progress bar for catalog entries
    entry_pb: ProgressBar,
    /// Optional copy progress bar (shown while staging samples)
    copy_pb: Option<ProgressBar>,
}

impl ProgressDisplay {
    /// Create a new progress display with total catalog entry count
    pub fn new(total_entries: u64) -> Self {
        let entry_style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-");

        let entry_pb = ProgressBar::new(total_entries);
        entry_pb.set_style(entry_style);

        Self {
            entry_pb,
            copy_pb: None,
        }
    }

    /// Initialize copy progress bar with total file count
    pub fn init_copy_progress(&mut self, total_copies: u64) {
        let copy_style = ProgressStyle::default_bar()
            .template("  [{bar:40.green/yellow}] {pos}/{len} staged {msg}")
            .unwrap()
            .progress_chars("█▉▊▋▌▍▎▏  ");

        let copy_pb = ProgressBar::new(total_copies);
        copy_pb.set_style(copy_style);
        self.copy_pb = Some(copy_pb);
    }

    /// Update to show the current catalog entry
    pub fn update_entry(&self, entry_name: &str, current: usize, total: usize) {
        let msg = format!("({}/{}) {}", current, total, entry_name);
        self.entry_pb.set_message(msg);
    }

    /// Increment entry progress
    pub fn inc_entry(&self) {
        self.entry_pb.inc(1);
    }

    /// Update copy progress
    pub fn update_copy(&self, path: &str) {
        if let Some(ref copy_pb) = self.copy_pb {
            // Truncate long paths for display
            let display_path = if path.len() > 50 {
                format!("...{}", &path[path.len() - 47..])
            } else {
                path.to_string()
            };
            copy_pb.set_message(display_path);
            copy_pb.inc(1);
        }
    }

    /// Finish all bars
    pub fn finish(&self) {
        if let Some(ref copy_pb) = self.copy_pb {
            copy_pb.finish();
        }
        self.entry_pb.finish();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        if let Some(ref copy_pb) = self.copy_pb {
            copy_pb.abandon();
        }
        self.entry_pb.abandon();
    }
}
