//! Per-file-pair coverage totals derived from the run stream.
//!
//! Every run between two different texts contributes its size twice: once
//! to the ordered pair (file of chunk0, file of chunk1) and once the other
//! way around. Overlapping runs may push a total past the file size; the
//! printed percentage clamps at 100.

use toksim_tokens::Corpus;

use crate::Run;

/// Cumulative coverage of one ordered text pair: how many tokens of
/// `text0` were found in `text1`.
#[derive(Debug, Clone)]
struct MatchTotal {
    text0: usize,
    text1: usize,
    covered: u64,
    size0: u64,
}

impl MatchTotal {
    /// `floor(100 * covered / size0)`, clamped to 100. `size0` is never 0
    /// here: a pair exists only once a run was added, and a run implies
    /// tokens.
    fn percentage(&self) -> u64 {
        (self.covered * 100 / self.size0).min(100)
    }
}

/// One line of the percentage report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentLine {
    pub fname0: String,
    pub percent: u64,
    pub fname1: String,
}

/// The match list: ordered text pairs with their accumulated coverage.
#[derive(Debug, Default)]
pub struct Percentages {
    totals: Vec<MatchTotal>,
}

impl Percentages {
    pub fn new() -> Percentages {
        Percentages::default()
    }

    /// Folds one run in. Runs inside a single text carry no cross-file
    /// information and are ignored.
    pub fn add_run(&mut self, corpus: &Corpus, run: &Run) {
        if run.chunk0.text == run.chunk1.text {
            return;
        }
        self.add_one(corpus, run.chunk0.text, run.chunk1.text, run.size);
        self.add_one(corpus, run.chunk1.text, run.chunk0.text, run.size);
    }

    fn add_one(&mut self, corpus: &Corpus, text0: usize, text1: usize, size: usize) {
        if let Some(m) = self
            .totals
            .iter_mut()
            .find(|m| m.text0 == text0 && m.text1 == text1)
        {
            m.covered += size as u64;
            return;
        }
        self.totals.push(MatchTotal {
            text0,
            text1,
            covered: size as u64,
            size0: corpus.texts()[text0].len() as u64,
        });
    }

    /// Produces the report lines: pairs ordered by coverage ratio
    /// (descending, ties keeping insertion order), grouped so that all
    /// remaining contributors of the top entry's file follow it
    /// immediately. `main_only` keeps just the top contributor of each
    /// group; entries below `threshold` percent are suppressed.
    pub fn into_lines(self, corpus: &Corpus, threshold: u64, main_only: bool) -> Vec<PercentLine> {
        let mut totals = self.totals;
        // ratio compare without floats: covered/size0 > covered'/size0'
        // iff covered * size0' > covered' * size0
        totals.sort_by(|a, b| {
            let left = u128::from(b.covered) * u128::from(a.size0);
            let right = u128::from(a.covered) * u128::from(b.size0);
            left.cmp(&right)
        });

        let mut lines = Vec::new();
        let mut pending = std::collections::VecDeque::from(totals);
        while let Some(top) = pending.pop_front() {
            let group = top.text0;
            push_line(&mut lines, corpus, &top, threshold);
            pending.retain(|m| {
                if m.text0 != group {
                    return true;
                }
                if !main_only {
                    push_line(&mut lines, corpus, m, threshold);
                }
                false
            });
        }
        lines
    }
}

fn push_line(lines: &mut Vec<PercentLine>, corpus: &Corpus, m: &MatchTotal, threshold: u64) {
    let percent = m.percentage();
    if percent >= threshold {
        lines.push(PercentLine {
            fname0: corpus.texts()[m.text0].name.clone(),
            percent,
            fname1: corpus.texts()[m.text1].name.clone(),
        });
    }
}
