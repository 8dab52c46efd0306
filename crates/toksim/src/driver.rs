//! The pipeline: read and tokenize the input files, build the
//! forward-reference index, extract runs, and hand the result to the
//! requested formatter.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use toksim_format::{write_lex_rows, write_percentages, write_runs, RunFormat};
use toksim_index::ForwardRefs;
use toksim_lang::{dump, language_for_path, lex, Interner, LexEvent, LexOptions};
use toksim_runs::{collect_sorted_runs, scan_runs, CompareMode, Percentages};
use toksim_tokens::{Corpus, CorpusBuilder};
use toksim_walk::{args_from_reader, expand_recursive, is_new_old_separator};

use crate::cli::Cli;
use crate::config;

const DEFAULT_MIN_RUN_SIZE: u32 = 24;
const DEFAULT_PAGE_WIDTH: u32 = 80;
const DEFAULT_THRESHOLD: u32 = 1;

/// Effective numeric settings after flags and the user config are merged.
struct Settings {
    min_run_size: usize,
    page_width: usize,
    threshold: u64,
}

pub fn run(cli: Cli, lex_only: bool) -> Result<()> {
    check_compatibility(&cli)?;

    if cli.version {
        println!("toksim {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = resolve_settings(&cli)?;
    let percentage_mode = cli.percentages || cli.main_contributor_only;
    let mode = CompareMode {
        each_to_each: cli.each_to_each || percentage_mode,
        no_self: cli.no_self || percentage_mode,
        new_old_only: cli.new_old_only,
    };
    let lex_opts = LexOptions {
        functions_only: cli.functions_only,
        keep_call_identifiers: cli.keep_function_identifiers,
    };

    let mut files = cli.files.clone();
    if cli.stdin_args {
        if !files.is_empty() {
            bail!("-i option conflicts with file arguments");
        }
        files = args_from_reader(&mut io::stdin().lock())?;
    }
    if cli.recurse {
        files = expand_recursive(&files)?;
    }

    let mut out = open_output(cli.output.as_deref())?;

    if lex_only {
        let mut interner = Interner::new();
        for name in files.iter().filter(|f| !is_new_old_separator(f)) {
            let source = read_source(name)?;
            let rows = dump(&source, language_for_path(name), &lex_opts, &mut interner);
            write_lex_rows(&mut out, name, &rows)?;
        }
        out.flush()?;
        if cli.memory_report {
            eprintln!("toksim: interned symbols: {}", interner.len());
        }
        return Ok(());
    }

    let (corpus, interner) = read_input_files(&files, &lex_opts)?;
    let fwd = ForwardRefs::build(&corpus, settings.min_run_size)?;
    let fwd_bytes = fwd.footprint();

    if percentage_mode {
        let runs = scan_runs(&corpus, &fwd, mode)?;
        drop(fwd);
        let mut percentages = Percentages::new();
        for run in &runs {
            percentages.add_run(&corpus, run);
        }
        let lines = percentages.into_lines(&corpus, settings.threshold, cli.main_contributor_only);
        write_percentages(&mut out, &lines)?;
    } else {
        let runs = collect_sorted_runs(&corpus, &fwd, mode)?;
        drop(fwd);
        let format = if cli.diff_format {
            RunFormat::Diff
        } else if cli.terse {
            RunFormat::Terse
        } else if cli.headings_only {
            RunFormat::HeadingsOnly
        } else {
            RunFormat::Listing
        };
        write_runs(&mut out, &corpus, &runs, format, settings.page_width)?;
    }
    out.flush()?;

    if cli.memory_report {
        report_memory(&corpus, &interner, fwd_bytes);
    }
    Ok(())
}

/// At most one output format flag may be given.
fn check_compatibility(cli: &Cli) -> Result<()> {
    let exclusive = [
        ('d', cli.diff_format),
        ('n', cli.headings_only),
        ('p', cli.percentages),
        ('P', cli.main_contributor_only),
        ('T', cli.terse),
    ];
    for (n, &(first, first_set)) in exclusive.iter().enumerate() {
        for &(second, second_set) in &exclusive[n + 1..] {
            if first_set && second_set {
                bail!("options -{first} and -{second} are incompatible");
            }
        }
    }
    if cli.threshold.is_some() && !(cli.percentages || cli.main_contributor_only) {
        bail!("option -t requires -p or -P");
    }
    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    if let Some(r) = cli.min_run_size {
        if r == 0 {
            bail!("bad or zero run size; form is: -r N");
        }
    }
    if let Some(w) = cli.page_width {
        if w == 0 {
            bail!("bad or zero page width");
        }
    }
    if let Some(t) = cli.threshold {
        if t == 0 || t > 100 {
            bail!("threshold must be between 1 and 100");
        }
    }

    let user = config::load().unwrap_or_default();
    let min_run_size = cli
        .min_run_size
        .or(user.min_run_size.filter(|&v| v > 0))
        .unwrap_or(DEFAULT_MIN_RUN_SIZE);
    let page_width = cli
        .page_width
        .or(user.page_width.filter(|&v| v > 0))
        .unwrap_or(DEFAULT_PAGE_WIDTH);
    let threshold = cli
        .threshold
        .or(user.threshold.filter(|&v| (1..=100).contains(&v)))
        .unwrap_or(DEFAULT_THRESHOLD);

    Ok(Settings {
        min_run_size: min_run_size as usize,
        page_width: page_width as usize,
        threshold: u64::from(threshold),
    })
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .map_err(|_| anyhow!("cannot open output file `{}'", p.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

fn read_source(name: &str) -> Result<String> {
    let bytes = std::fs::read(name).with_context(|| format!("cannot open `{name}'"))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Tokenizes every input file into one corpus; the `/` or `|` separator
/// marks everything before it as "new".
fn read_input_files(files: &[String], opts: &LexOptions) -> Result<(Corpus, Interner)> {
    let mut builder = CorpusBuilder::new();
    let mut interner = Interner::new();
    for name in files {
        if is_new_old_separator(name) {
            builder.mark_old_boundary();
            continue;
        }
        let source = read_source(name)?;
        let language = language_for_path(name);
        builder.begin_text(name);
        lex(&source, language, opts, &mut interner, &mut |ev| match ev {
            LexEvent::Token { token, .. } => builder.push_token(token),
            LexEvent::Newline => builder.end_line(),
        });
        builder.end_text();
    }
    Ok((builder.finish(), interner))
}

fn report_memory(corpus: &Corpus, interner: &Interner, fwd_bytes: usize) {
    eprintln!(
        "toksim: token array: {} tokens, {} bytes",
        corpus.tokens().len(),
        corpus.tokens().footprint()
    );
    eprintln!("toksim: forward references: {fwd_bytes} bytes");
    eprintln!(
        "toksim: texts: {}, interned symbols: {}",
        corpus.texts().len(),
        interner.len()
    );
}
