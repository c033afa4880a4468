//! tabingest entry point
//!
//! Parses arguments, dispatches to the CLI and exits non-zero on failure.

use tabingest::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
