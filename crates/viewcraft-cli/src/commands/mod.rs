pub mod decode;
pub mod inverse;
pub mod replay;

use std::path::Path;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Read a JSON document from a file, or from stdin when the path is `-`
pub fn read_json(path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let raw = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?
    };
    Ok(serde_json::from_str(&raw)?)
}
