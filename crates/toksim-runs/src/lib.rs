//! # toksim-runs
//!
//! Run extraction: walking the forward-reference chains, extending
//! candidate windows into maximal runs, and folding runs into per-file-pair
//! coverage percentages.

use anyhow::Result;
use toksim_index::ForwardRefs;
use toksim_tokens::Corpus;

mod percentages;
mod scan;

pub use percentages::{PercentLine, Percentages};
pub use scan::{scan_runs, CompareMode};

/// A contiguous slice `[first, last)` of the token array, inside one text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Chunk {
    /// Index into the corpus text table.
    pub text: usize,
    pub first: usize,
    pub last: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.last - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }
}

/// A maximal pair of equal token slices. The earlier-starting chunk is
/// always `chunk0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub chunk0: Chunk,
    pub chunk1: Chunk,
    pub size: usize,
}

/// Orders runs for reporting: largest first, then by the first chunk's
/// file and position. The sort is stable, so equal keys keep discovery
/// order.
pub fn sort_runs(runs: &mut [Run]) {
    runs.sort_by(|a, b| {
        b.size
            .cmp(&a.size)
            .then_with(|| a.chunk0.text.cmp(&b.chunk0.text))
            .then_with(|| a.chunk0.first.cmp(&b.chunk0.first))
    });
}

/// Convenience for the driver: scan, then order for the run reports.
pub fn collect_sorted_runs(
    corpus: &Corpus,
    fwd: &ForwardRefs,
    mode: CompareMode,
) -> Result<Vec<Run>> {
    let mut runs = scan_runs(corpus, fwd, mode)?;
    sort_runs(&mut runs);
    Ok(runs)
}
