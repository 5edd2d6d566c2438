//! qcinput command-line interface
//!
//! Generates ORCA or Gaussian input decks from XYZ/GJF structures.
//!
//! # Examples
//!
//! ```bash
//! # Write a starter config for a transition state search
//! qcinput init-config --kind ts
//!
//! # Generate water.inp (ORCA) or water.gjf (Gaussian) from ./qcinput.toml
//! qcinput water.xyz
//!
//! # Explicit config and output
//! qcinput generate ts_guess.gjf -c ts.toml -o ts_guess.inp
//! ```
//!
//! The written path is printed to stdout. Logs go to stderr; set `RUST_LOG`
//! (e.g. `RUST_LOG=debug`) to see parser and resolver decisions.

use env_logger::Env;
use qcinput::cli::{execute, parse_args, Command};
use qcinput::help::{print_global_help, version_string};
use std::env;
use std::process;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run `qcinput --help` for usage.");
            process::exit(1);
        }
    };

    match command {
        Command::Help => print_global_help(),
        Command::Version => println!("{}", version_string()),
        _ => match execute(&command) {
            Ok(Some(path)) => println!("{}", path.display()),
            Ok(None) => {}
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        },
    }
}
