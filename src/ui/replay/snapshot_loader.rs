use std::path::PathBuf;

use log::info;

use crate::{PitwallError, dashboard::ViewModel};

/// Load a recorded dashboard session from a JSON lines snapshot file, as
/// written by the snapshot writer during a live run.
pub(crate) fn load_snapshots_jsonl(source_file: &PathBuf) -> Result<Vec<ViewModel>, PitwallError> {
    let snapshots = serde_jsonlines::json_lines(source_file)
        .map_err(|e| PitwallError::SnapshotLoaderError { source: e })?
        .collect::<Result<Vec<ViewModel>, std::io::Error>>()
        .map_err(|e| PitwallError::SnapshotLoaderError { source: e })?;

    if snapshots.is_empty() {
        return Err(PitwallError::InvalidSnapshotFile {
            path: format!("{:?}", source_file),
        });
    }

    info!(
        "Loaded {:?}, found {} snapshots",
        source_file,
        snapshots.len()
    );
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_recorded_snapshots() {
        let mut file = NamedTempFile::new().unwrap();
        let mut first = ViewModel::default();
        first.fail_cycle("banner");
        let second = ViewModel::default();
        writeln!(file, "{}", serde_json::to_string(&first).unwrap()).unwrap();
        writeln!(file, "{}", serde_json::to_string(&second).unwrap()).unwrap();
        file.flush().unwrap();

        let snapshots = load_snapshots_jsonl(&file.path().to_path_buf()).unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].error.as_deref(), Some("banner"));
        assert!(snapshots[1].error.is_none());
    }

    #[test]
    fn test_empty_file_is_invalid() {
        let file = NamedTempFile::new().unwrap();

        let result = load_snapshots_jsonl(&file.path().to_path_buf());
        match result {
            Err(PitwallError::InvalidSnapshotFile { .. }) => {}
            _ => panic!("Expected InvalidSnapshotFile error"),
        }
    }

    #[test]
    fn test_garbage_line_is_a_loader_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not a snapshot").unwrap();
        file.flush().unwrap();

        let result = load_snapshots_jsonl(&file.path().to_path_buf());
        match result {
            Err(PitwallError::SnapshotLoaderError { .. }) => {}
            _ => panic!("Expected SnapshotLoaderError"),
        }
    }
}
