//! Inverse command
//!
//! Usage: viewcraft inverse <FILE>

use clap::Args;
use std::path::PathBuf;
use viewcraft_core::commands::{factory, wire};

use super::{read_json, CliResult};

#[derive(Debug, Args)]
pub struct InverseArgs {
    /// JSON file holding a command (`-` for stdin)
    pub file: PathBuf,
}

pub fn execute(args: InverseArgs) -> CliResult {
    let cmd = factory::decode(&read_json(&args.file)?)?;
    let undo = factory::create_undo_command(&cmd)?;
    println!("{}", serde_json::to_string_pretty(&wire::encode(&undo))?);
    Ok(())
}
