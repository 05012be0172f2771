use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    sync::mpsc::Receiver,
};

use crate::{PitwallError, dashboard::ViewModel};

/// Records every settled dashboard snapshot to a JSON lines file until the
/// sending side hangs up. The resulting file can be played back with the
/// `replay` command.
pub fn write_snapshots(
    file: &PathBuf,
    snapshot_receiver: Receiver<ViewModel>,
) -> Result<(), PitwallError> {
    let snapshot_file = File::create(file).map_err(|e| PitwallError::WriterError { source: e })?;
    let mut snapshot_writer = BufWriter::new(snapshot_file);
    for snapshot in &snapshot_receiver {
        let _ = writeln!(
            snapshot_writer,
            "{}",
            serde_json::to_string(&snapshot).expect("snapshot serialization cannot fail")
        )
        .map_err(|e| {
            println!("Error while writing snapshot to output file: {}", e);
        });
    }
    snapshot_writer
        .flush()
        .map_err(|e| PitwallError::WriterError { source: e })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn test_written_snapshots_round_trip_as_json_lines() {
        let output = tempfile::NamedTempFile::new().unwrap();
        let path = output.path().to_path_buf();
        let (sender, receiver) = mpsc::channel::<ViewModel>();

        let writer = thread::spawn(move || write_snapshots(&path, receiver));

        let mut first = ViewModel::default();
        first.fail_cycle("banner");
        let second = ViewModel::default();
        sender.send(first.clone()).unwrap();
        sender.send(second.clone()).unwrap();
        drop(sender);
        writer.join().unwrap().unwrap();

        let written = serde_jsonlines::json_lines(output.path())
            .unwrap()
            .collect::<Result<Vec<ViewModel>, std::io::Error>>()
            .unwrap();
        assert_eq!(written, vec![first, second]);
    }
}
