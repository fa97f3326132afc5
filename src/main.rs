//! gear - Local-first inventory and lending tracker

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = gear_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = gear_cli::cli::hint(&e) {
            eprintln!("Hint: {}", hint);
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
