//! The run scanner: extends forward-reference candidates into maximal runs.

use anyhow::Result;
use toksim_index::ForwardRefs;
use toksim_tokens::Corpus;

use crate::{Chunk, Run};

/// Which file pairings may produce runs, and how exhaustively the chains
/// are mined.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareMode {
    /// `-e`: emit every admissible chain partner of a position. Without it
    /// a position contributes only its largest match and the scan skips
    /// past the emitted run.
    pub each_to_each: bool,
    /// `-s`: drop runs whose chunks lie in the same text.
    pub no_self: bool,
    /// `-S`: keep only runs crossing the new/old boundary.
    pub new_old_only: bool,
}

/// Walks the forward-reference chains and emits maximal runs.
///
/// A candidate `(i, j)` survives when the mode admits the file pair, the
/// two windows are token-for-token equal (the hashes are probabilistic),
/// and the run cannot be extended left: either end sits at a text start or
/// the preceding tokens differ. The right extension then fixes the size.
///
/// In each-to-each mode every admissible partner along the chain is
/// emitted and the scan moves one position at a time; left-to-right order
/// plus the left-maximality test gives exactly one emission per maximal
/// match. In the default mode a position contributes its largest match
/// only and the scan continues past the run, so a file of one repeated
/// token yields a single self-run at offset one instead of a quadratic
/// pile.
pub fn scan_runs(corpus: &Corpus, fwd: &ForwardRefs, mode: CompareMode) -> Result<Vec<Run>> {
    let min_run = fwd.min_run();
    let mut runs = Vec::new();

    for (ti, text) in corpus.texts().iter().enumerate() {
        let mut i = text.start;
        while i + min_run <= text.limit {
            let mut best: Option<Run> = None;
            let mut j = fwd.forward(i)?;
            while j != 0 {
                if let Some(run) = try_match(corpus, mode, min_run, i, ti, j)? {
                    if mode.each_to_each {
                        runs.push(run);
                    } else if best.map_or(true, |b| run.size > b.size) {
                        best = Some(run);
                    }
                }
                j = fwd.forward(j)?;
            }
            match best {
                Some(run) if !mode.each_to_each => {
                    let size = run.size;
                    runs.push(run);
                    i += size;
                }
                _ => i += 1,
            }
        }
    }
    Ok(runs)
}

fn try_match(
    corpus: &Corpus,
    mode: CompareMode,
    min_run: usize,
    i: usize,
    ti: usize,
    j: usize,
) -> Result<Option<Run>> {
    let tj = corpus.text_of(j)?;
    let text_i = &corpus.texts()[ti];
    let text_j = &corpus.texts()[tj];
    if j + min_run > text_j.limit {
        return Ok(None);
    }

    if mode.no_self && ti == tj {
        return Ok(None);
    }
    if mode.new_old_only && corpus.is_new(ti) == corpus.is_new(tj) {
        return Ok(None);
    }

    let toks = corpus.tokens().as_slice();
    if toks[i..i + min_run] != toks[j..j + min_run] {
        return Ok(None);
    }

    // left-maximality: a run extendable to the left is a tail of a larger
    // one anchored further left
    if i > text_i.start && j > text_j.start && toks[i - 1] == toks[j - 1] {
        return Ok(None);
    }

    let mut size = min_run;
    while i + size < text_i.limit && j + size < text_j.limit && toks[i + size] == toks[j + size] {
        size += 1;
    }

    Ok(Some(Run {
        chunk0: Chunk {
            text: ti,
            first: i,
            last: i + size,
        },
        chunk1: Chunk {
            text: tj,
            first: j,
            last: j + size,
        },
        size,
    }))
}
