use crate::Result;

use std::{fs::File, path::PathBuf};

use csv::{Reader, ReaderBuilder, Trim};

/// Scenario files may annotate their steps with `#` comment lines
pub fn build_scenario_reader(filepath: PathBuf) -> Result<Reader<File>> {
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .comment(Some(b'#'))
        .from_path(filepath)?;

    return Ok(reader);
}
