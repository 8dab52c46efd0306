use std::path::Path;

use assert_cmd::Command;

/// A command running in the given fixture directory.
pub fn toksim_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("toksim").unwrap();
    cmd.current_dir(dir);
    cmd
}

pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// `count` distinct words, ten per line; the text scanner makes one token
/// per word.
pub fn words(prefix: &str, count: usize) -> String {
    let mut s = String::new();
    for n in 0..count {
        s.push_str(&format!("{prefix}{n}"));
        s.push(if n % 10 == 9 { '\n' } else { ' ' });
    }
    s.push('\n');
    s
}
