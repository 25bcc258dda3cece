//! JSONL persistence for dialogue records.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::DialogueRecord;

/// Write records one JSON object per line, creating parent directories as
/// needed.
pub fn write_jsonl(path: &Path, records: &[DialogueRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
