//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::Parser;

/// Stamina - runtime launcher and addon installer
#[derive(Parser, Debug)]
#[command(name = "stamina")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Home directory (defaults to $STAMINA_HOME, then the current directory)
    #[arg(long)]
    pub home: Option<Utf8PathBuf>,

    /// Framework property definitions, overriding configuration files
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub define: Vec<String>,

    /// Command to dispatch once the platform is up (e.g. addon:install)
    pub command: Option<String>,

    /// Command arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
