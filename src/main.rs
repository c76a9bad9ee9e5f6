fn main() {
    if let Err(err) = mflow::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
