//! Wavegen binary entry point.

fn main() {
    if let Err(err) = wavegen::cli::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
