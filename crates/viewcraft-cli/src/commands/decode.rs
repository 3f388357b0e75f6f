//! Decode command
//!
//! Usage: viewcraft decode <FILE>

use clap::Args;
use std::path::PathBuf;
use viewcraft_core::commands::{factory, Undoable};

use super::{read_json, CliResult};

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// JSON file holding a command or an undoable (`-` for stdin)
    pub file: PathBuf,
}

/// Documents carrying an `undo` or `redo` member are undoables
fn is_undoable(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|o| o.contains_key(Undoable::UNDO_PROP) || o.contains_key(Undoable::REDO_PROP))
}

pub fn execute(args: DecodeArgs) -> CliResult {
    let value = read_json(&args.file)?;

    let canonical = if is_undoable(&value) {
        factory::decode_undoable(&value)?.to_json()
    } else {
        let cmd = factory::decode(&value)?;
        eprintln!("{} ({})", cmd.kind().as_str(), cmd.id());
        viewcraft_core::commands::wire::encode(&cmd)
    };

    println!("{}", serde_json::to_string_pretty(&canonical)?);
    Ok(())
}
