use std::path::PathBuf;

use clap::Parser;

/// `toksim` — reports runs of matching tokens between input files, or the
/// percentage of each file found in the others.
///
/// The file list may contain a `/` or `|` separator splitting it into
/// "new" and "old" files for `-S`. A bare `--` argument switches to the
/// lexical-dump mode (handled ahead of parsing).
#[derive(Parser, Debug, Clone)]
#[command(name = "toksim", disable_version_flag = true, about, long_about = None)]
pub struct Cli {
    /// Minimum run size in tokens (0 is invalid).
    #[arg(short = 'r', value_name = "N")]
    pub min_run_size: Option<u32>,

    /// Output page width.
    #[arg(short = 'w', value_name = "N")]
    pub page_width: Option<u32>,

    /// Function-like forms only (code scanner toggle).
    #[arg(short = 'f')]
    pub functions_only: bool,

    /// Keep function identifiers intact (code scanner toggle).
    #[arg(short = 'F')]
    pub keep_function_identifiers: bool,

    /// Use diff format for output.
    #[arg(short = 'd')]
    pub diff_format: bool,

    /// Terse output.
    #[arg(short = 'T')]
    pub terse: bool,

    /// Display headings only.
    #[arg(short = 'n')]
    pub headings_only: bool,

    /// Use percentage format for output (implies -e and -s).
    #[arg(short = 'p')]
    pub percentages: bool,

    /// Percentage format, main contributor only (implies -p).
    #[arg(short = 'P')]
    pub main_contributor_only: bool,

    /// Threshold level of percentage to show (1..100); requires -p or -P.
    #[arg(short = 't', value_name = "N")]
    pub threshold: Option<u32>,

    /// Compare each file to each file separately.
    #[arg(short = 'e')]
    pub each_to_each: bool,

    /// Do not compare a file to itself.
    #[arg(short = 's')]
    pub no_self: bool,

    /// Compare new files to old files only (uses the / or | separator).
    #[arg(short = 'S')]
    pub new_old_only: bool,

    /// Recurse into subdirectories.
    #[arg(short = 'R')]
    pub recurse: bool,

    /// Read arguments (file names) from standard input.
    #[arg(short = 'i')]
    pub stdin_args: bool,

    /// Write output to file F.
    #[arg(short = 'o', value_name = "F")]
    pub output: Option<PathBuf>,

    /// Show version number and exit.
    #[arg(short = 'v')]
    pub version: bool,

    /// Show memory usage info.
    #[arg(short = 'M')]
    pub memory_report: bool,

    /// Input files: new_file* [ ('/' | '|') old_file* ].
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_combined_short_flags() {
        let cli = Cli::parse_from(["toksim", "-ps", "a.txt", "b.txt"]);
        assert!(cli.percentages);
        assert!(cli.no_self);
        assert_eq!(cli.files, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn parses_value_options() {
        let cli = Cli::parse_from(["toksim", "-r", "16", "-w", "100", "-o", "out.txt", "x"]);
        assert_eq!(cli.min_run_size, Some(16));
        assert_eq!(cli.page_width, Some(100));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn separator_is_an_ordinary_argument() {
        let cli = Cli::parse_from(["toksim", "-S", "new.txt", "/", "old.txt"]);
        assert_eq!(cli.files, vec!["new.txt", "/", "old.txt"]);
    }
}
