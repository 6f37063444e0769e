//! tasktree - hierarchical task store CLI.

fn main() {
    if let Err(e) = tasktree::cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
