use crate::output::traits::{OutputError, OutputResult};
use crate::output::{OutputRecord, ResultLog};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the full log as a JSON array of output records
///
/// The file is written next to its destination and renamed into place, so readers see
/// either the previous complete file or the new one.
pub fn write_results_file(path: &Path, log: &ResultLog) -> OutputResult<()> {
    let records: Vec<OutputRecord> = log.iter().map(|r| r.to_record()).collect();
    let json = serde_json::to_string_pretty(&records)?;

    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, json).map_err(|source| OutputError::Write {
        path: tmp_path.display().to_string(),
        source,
    })?;
    fs::rename(&tmp_path, path).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;

    tracing::trace!("Results file {} now holds {} rows", path.display(), records.len());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
