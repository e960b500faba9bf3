//! Progress reporting for the long preprocessing phases.
//!
//! Draws to stderr and stays silent when stderr is not a terminal,
//! so piped runs and the test suite see no extra output.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for the all-pairs distance-table phase (one tick per
/// source vertex).
pub fn table_bar(sources: u64) -> ProgressBar {
    let pb = ProgressBar::new(sources);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} sources ({per_sec})")
            .expect("progress template is valid")
            .progress_chars("#>-"),
    );
    pb
}
