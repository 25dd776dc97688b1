//! Stamina launcher - boots the runtime and dispatches one-shot commands
//!
//! This is the main entry point for the Stamina process.

mod cli;
mod commands;
mod launcher;
mod modules;
mod output;
mod runtime;
mod version;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    match launcher::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}
