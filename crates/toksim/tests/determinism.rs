use tempfile::TempDir;

mod common;
use common::{toksim_in, words, write_file};

fn run_bytes(dir: &TempDir, args: &[&str]) -> Vec<u8> {
    let output = toksim_in(dir.path()).args(args).output().unwrap();
    assert!(output.status.success());
    output.stdout
}

/// Identical inputs with identical flags produce identical bytes.
#[test]
fn repeated_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let shared = words("w", 120);
    write_file(dir.path(), "a.txt", &shared);
    write_file(dir.path(), "b.txt", &shared);
    write_file(
        dir.path(),
        "c.txt",
        &format!("{}{}", words("w", 60), words("z", 60)),
    );

    for args in [
        vec!["a.txt", "b.txt", "c.txt"],
        vec!["-T", "a.txt", "b.txt", "c.txt"],
        vec!["-p", "a.txt", "b.txt", "c.txt"],
        vec!["-d", "a.txt", "b.txt", "c.txt"],
    ] {
        let first = run_bytes(&dir, &args);
        let second = run_bytes(&dir, &args);
        assert_eq!(first, second, "non-deterministic output for {args:?}");
    }
}

/// Reordering the input files permutes the report but keeps the same
/// matches: the multiset of run sizes is invariant.
#[test]
fn file_order_does_not_change_the_match_set() {
    let dir = TempDir::new().unwrap();
    let shared = words("w", 120);
    write_file(dir.path(), "a.txt", &shared);
    write_file(dir.path(), "b.txt", &shared);
    write_file(
        dir.path(),
        "c.txt",
        &format!("{}{}", words("w", 60), words("z", 60)),
    );

    let sizes = |args: &[&str]| -> Vec<String> {
        let stdout = String::from_utf8(run_bytes(&dir, args)).unwrap();
        let mut sizes: Vec<String> = stdout
            .lines()
            .filter_map(|l| l.rsplit_once('[').map(|(_, s)| s.to_string()))
            .collect();
        sizes.sort();
        sizes
    };

    let forward = sizes(&["-T", "-e", "-s", "a.txt", "b.txt", "c.txt"]);
    let reversed = sizes(&["-T", "-e", "-s", "c.txt", "b.txt", "a.txt"]);
    assert_eq!(forward, reversed);
}
