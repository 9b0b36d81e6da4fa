//! CLI support for formula-kit
//!
//! The `fkit` binary is a thin shell over these functions, which take plain
//! option structs so they can be driven from other tools as well.

mod complete;
mod eval;
mod highlight;

pub use complete::{CompleteOptions, execute_complete};
pub use eval::{EvalOptions, execute_eval};
pub use highlight::{HighlightOptions, HighlightedLine, HighlightedToken, execute_highlight};

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaSnapshot;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No input provided. Use --input or pipe text to stdin.")]
    NoInput,

    #[error("{0}")]
    UnknownLanguage(String),

    #[error("Cursor {cursor} is past the end of the input ({len} bytes)")]
    CursorOutOfRange { cursor: usize, len: usize },
}

/// Reads a schema snapshot from a JSON file; no path yields an empty snapshot.
pub fn load_schema(path: Option<&PathBuf>) -> Result<SchemaSnapshot, CliError> {
    let Some(path) = path else {
        return Ok(SchemaSnapshot::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.clone(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}
