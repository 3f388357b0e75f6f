//! Viewcraft CLI
//!
//! Inspect stored view-editor commands and histories

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use viewcraft_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "viewcraft")]
#[command(about = "Viewcraft - View editor command tooling", long_about = None)]
struct Cli {
    /// Editor configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a command or undoable and print its canonical JSON
    Decode(commands::decode::DecodeArgs),
    /// Print the undo command of a command
    Inverse(commands::inverse::InverseArgs),
    /// Replay a saved editor state onto an empty view
    Replay(commands::replay::ReplayArgs),
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Decode(args) => commands::decode::execute(args),
        Commands::Inverse(args) => commands::inverse::execute(args),
        Commands::Replay(args) => commands::replay::execute(args, cli.config.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
