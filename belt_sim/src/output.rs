//! JSON export of a [`MotionBundle`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::pipeline::MotionBundle;

/// Errors writing a run to disk.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output file could not be created or written.
    #[error("Failed to write output file: {0}")]
    Io(#[from] std::io::Error),

    /// Bundle could not be serialized.
    #[error("Failed to serialize bundle: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `bundle` to `path` as pretty-printed JSON, replacing any existing file.
pub fn write_bundle(path: &Path, bundle: &MotionBundle) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, bundle)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
