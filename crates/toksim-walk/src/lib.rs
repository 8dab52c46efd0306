//! # toksim-walk
//!
//! Turns the raw file arguments into the final input list: `-i` reads the
//! names from standard input, `-R` expands directories recursively. The
//! `/` and `|` separator tokens split the list into its "new" and "old"
//! halves and are preserved in place by both expansions.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// Whether an argument is the new/old separator rather than a file name.
pub fn is_new_old_separator(arg: &str) -> bool {
    arg == "/" || arg == "|"
}

/// Reads whitespace-separated file names from `input` (the `-i` mode).
pub fn args_from_reader(input: &mut dyn Read) -> Result<Vec<String>> {
    let mut buf = String::new();
    input
        .read_to_string(&mut buf)
        .context("cannot read file names from standard input")?;
    Ok(buf.split_whitespace().map(str::to_string).collect())
}

/// Expands every directory argument into the sorted list of files below it
/// (the `-R` mode). Plain files and separators pass through unchanged, in
/// their original order.
pub fn expand_recursive(args: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for arg in args {
        if !is_new_old_separator(arg) && Path::new(arg).is_dir() {
            out.extend(files_under(arg)?);
        } else {
            out.push(arg.clone());
        }
    }
    Ok(out)
}

/// All files reachable from `root`, honoring the usual ignore files, as
/// sorted path strings. Sorting keeps the output independent of directory
/// iteration order.
fn files_under(root: &str) -> Result<Vec<String>> {
    let mut builder = WalkBuilder::new(root);
    builder.hidden(false);
    builder.git_ignore(true);
    builder.git_exclude(true);
    builder.git_global(true);
    builder.follow_links(false);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.with_context(|| format!("cannot scan directory `{root}'"))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            files.push(entry.path().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn separators_are_recognized() {
        assert!(is_new_old_separator("/"));
        assert!(is_new_old_separator("|"));
        assert!(!is_new_old_separator("a/b"));
        assert!(!is_new_old_separator("||"));
    }

    #[test]
    fn reader_args_split_on_whitespace() {
        let mut input = "a.txt  b.txt\nsub/c.txt\n".as_bytes();
        let args = args_from_reader(&mut input).unwrap();
        assert_eq!(args, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn recursion_expands_directories_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("sub/c.txt"), "c").unwrap();

        let root = dir.path().to_str().unwrap().to_string();
        let out = expand_recursive(&[root.clone()]).unwrap();
        let rel: Vec<String> = out
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().trim_start_matches('/').to_string())
            .collect();
        assert_eq!(rel, vec!["a.txt", "b.txt", "sub/c.txt"]);
    }

    #[test]
    fn plain_files_and_separators_pass_through() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("x.txt");
        fs::write(&file, "x").unwrap();
        let args = vec![file.to_str().unwrap().to_string(), "/".to_string()];
        let out = expand_recursive(&args).unwrap();
        assert_eq!(out, args);
    }
}
