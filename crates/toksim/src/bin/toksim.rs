fn main() {
    if let Err(err) = toksim::run() {
        eprintln!("toksim: {err:#}");
        std::process::exit(1);
    }
}
