//! `retiff`: command-line front-end for the `retiff` library.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    cli::run()
}
