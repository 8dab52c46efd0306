//! # toksim-format
//!
//! Renders the comparison results: the run listings (default with source
//! excerpts, headings only, terse, diff-style), the percentage table, and
//! the `--` lexical dump. Every format is deterministic; identical inputs
//! render identical bytes.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};
use toksim_lang::LexRow;
use toksim_runs::{Chunk, PercentLine, Run};
use toksim_tokens::{Corpus, Text};

/// Which run listing to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunFormat {
    /// Header lines plus source excerpts.
    #[default]
    Listing,
    /// `-n`: header lines only.
    HeadingsOnly,
    /// `-T`: one line per run.
    Terse,
    /// `-d`: diff-style.
    Diff,
}

/// Lazily re-reads input files for excerpt printing; the token store keeps
/// positions, not source bytes.
#[derive(Debug, Default)]
struct SourceCache {
    files: HashMap<String, Vec<String>>,
}

impl SourceCache {
    fn lines(&mut self, name: &str) -> Result<&[String]> {
        if !self.files.contains_key(name) {
            let bytes = std::fs::read(name)
                .with_context(|| format!("cannot reread `{name}' for output"))?;
            let text = String::from_utf8_lossy(&bytes);
            let lines: Vec<String> = text.lines().map(str::to_string).collect();
            self.files.insert(name.to_string(), lines);
        }
        Ok(self.files[name].as_slice())
    }
}

fn line_span(text: &Text, chunk: &Chunk) -> (usize, usize) {
    let first = text.line_of(chunk.first);
    let last = text.line_of(chunk.last - 1);
    (first, last)
}

fn truncated(line: &str, width: usize) -> String {
    line.chars().take(width).collect()
}

/// Writes the run report in the requested format.
pub fn write_runs(
    out: &mut dyn Write,
    corpus: &Corpus,
    runs: &[Run],
    format: RunFormat,
    page_width: usize,
) -> Result<()> {
    let mut cache = SourceCache::default();
    for run in runs {
        let t0 = &corpus.texts()[run.chunk0.text];
        let t1 = &corpus.texts()[run.chunk1.text];
        let (l0, l1) = line_span(t0, &run.chunk0);
        let (m0, m1) = line_span(t1, &run.chunk1);
        match format {
            RunFormat::Terse => {
                writeln!(
                    out,
                    "{}:{}-{} == {}:{}-{} [{}]",
                    t0.name, l0, l1, t1.name, m0, m1, run.size
                )?;
            }
            RunFormat::HeadingsOnly => {
                writeln!(out, "{}: line {}-{} [{} tokens]", t0.name, l0, l1, run.size)?;
                writeln!(out, "{}: line {}-{}", t1.name, m0, m1)?;
                writeln!(out)?;
            }
            RunFormat::Listing => {
                writeln!(out, "{}: line {}-{} [{} tokens]", t0.name, l0, l1, run.size)?;
                excerpt(out, &mut cache, &t0.name, l0, l1, "\t", page_width)?;
                writeln!(out, "{}: line {}-{}", t1.name, m0, m1)?;
                excerpt(out, &mut cache, &t1.name, m0, m1, "\t", page_width)?;
                writeln!(out)?;
            }
            RunFormat::Diff => {
                writeln!(out, "{}:{},{}c{}:{},{}", t0.name, l0, l1, t1.name, m0, m1)?;
                excerpt(out, &mut cache, &t0.name, l0, l1, "< ", page_width)?;
                writeln!(out, "---")?;
                excerpt(out, &mut cache, &t1.name, m0, m1, "> ", page_width)?;
            }
        }
    }
    Ok(())
}

fn excerpt(
    out: &mut dyn Write,
    cache: &mut SourceCache,
    name: &str,
    first_line: usize,
    last_line: usize,
    prefix: &str,
    page_width: usize,
) -> Result<()> {
    let lines = cache.lines(name)?;
    let width = page_width.saturating_sub(prefix.len()).max(1);
    for n in first_line..=last_line {
        let line = lines.get(n - 1).map(String::as_str).unwrap_or("");
        writeln!(out, "{prefix}{}", truncated(line, width))?;
    }
    Ok(())
}

/// Writes the percentage table: one sentence per surviving ordered pair.
pub fn write_percentages(out: &mut dyn Write, lines: &[PercentLine]) -> Result<()> {
    for l in lines {
        writeln!(
            out,
            "{} consists for {} % of {} material",
            l.fname0, l.percent, l.fname1
        )?;
    }
    Ok(())
}

/// Writes the `--` lexical dump for one file.
pub fn write_lex_rows(out: &mut dyn Write, name: &str, rows: &[LexRow]) -> Result<()> {
    writeln!(out, "{name}:")?;
    for row in rows {
        writeln!(out, "\t{}\t{}", row.line, row.lexeme)?;
    }
    Ok(())
}
