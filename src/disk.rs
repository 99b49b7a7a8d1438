use crate::drain::{RecordSink, RecordSource};
use std::collections::VecDeque;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PENDING_EXTENSION: &str = "txt";
const CONSUMED_EXTENSION: &str = "done";
const OUTPUT_EXTENSION: &str = "dat";

/// Reads every pending `.txt` file in a directory, one file per record.
///
/// The listing is snapshotted once at construction; files that appear later
/// are left for the next run. A yielded file is renamed to `.done` only on
/// the pull after the one that yielded it, so a caller that stops pulling
/// after a failed downstream write leaves that file pending and it is
/// delivered again on the next run.
pub struct DirSource {
    pending: VecDeque<PathBuf>,
    in_flight: Option<PathBuf>,
}

impl DirSource {
    pub fn new(path: &Path) -> Result<DirSource, Box<dyn Error>> {
        let mut pending = VecDeque::new();
        for entry in fs::read_dir(path)? {
            let file = entry?.path();
            if file.is_file() && file.extension().is_some_and(|ext| ext == PENDING_EXTENSION) {
                pending.push_back(file);
            }
        }

        Ok(DirSource {
            pending,
            in_flight: None,
        })
    }

    fn mark_consumed(&mut self) -> Result<(), Box<dyn Error>> {
        if let Some(file) = self.in_flight.take() {
            fs::rename(&file, file.with_extension(CONSUMED_EXTENSION))?;
        }
        Ok(())
    }
}

impl RecordSource for DirSource {
    fn next_record(&mut self) -> Result<Option<String>, Box<dyn Error>> {
        self.mark_consumed()?;

        match self.pending.pop_front() {
            Some(file) => {
                let record = fs::read_to_string(&file)?;
                self.in_flight = Some(file);
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

/// Writes each record to a freshly named `.dat` file in the target
/// directory. Names are random, so nothing is ever overwritten.
pub struct DirSink {
    path: PathBuf,
}

impl DirSink {
    pub fn new(path: &Path) -> DirSink {
        DirSink {
            path: path.to_path_buf(),
        }
    }
}

impl RecordSink for DirSink {
    fn write(&mut self, record: &str) -> Result<(), Box<dyn Error>> {
        let name = format!("{}.{}", Uuid::new_v4(), OUTPUT_EXTENSION);
        fs::write(self.path.join(name), record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn yields_every_pending_file_and_marks_it_done() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::write(dir.path().join("b.txt"), "world").unwrap();

        let mut source = DirSource::new(dir.path()).unwrap();
        let mut records = Vec::new();
        while let Some(record) = source.next_record().unwrap() {
            records.push(record);
        }
        records.sort();

        assert_eq!(records, ["hello", "world"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("a.done")).unwrap(),
            "hello"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("b.done")).unwrap(),
            "world"
        );
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
    }

    #[test]
    fn rename_is_deferred_until_the_next_pull() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let mut source = DirSource::new(dir.path()).unwrap();

        assert_eq!(source.next_record().unwrap(), Some("hello".to_string()));
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("a.done").exists());

        assert_eq!(source.next_record().unwrap(), None);
        assert!(!dir.path().join("a.txt").exists());
        assert!(dir.path().join("a.done").exists());
    }

    #[test]
    fn abandoned_source_leaves_the_last_file_pending() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let mut source = DirSource::new(dir.path()).unwrap();
        assert_eq!(source.next_record().unwrap(), Some("hello".to_string()));
        drop(source);

        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("a.done").exists());
    }

    #[test]
    fn ignores_files_with_other_extensions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::write(dir.path().join("notes.log"), "skip me").unwrap();
        fs::write(dir.path().join("old.done"), "already consumed").unwrap();

        let mut source = DirSource::new(dir.path()).unwrap();
        assert_eq!(source.next_record().unwrap(), Some("hello".to_string()));
        assert_eq!(source.next_record().unwrap(), None);

        assert_eq!(
            fs::read_to_string(dir.path().join("notes.log")).unwrap(),
            "skip me"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("old.done")).unwrap(),
            "already consumed"
        );
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempdir().unwrap();

        let mut source = DirSource::new(dir.path()).unwrap();
        assert_eq!(source.next_record().unwrap(), None);
    }

    #[test]
    fn missing_directory_fails_on_construction() {
        assert!(DirSource::new(Path::new("/does/not/exist")).is_err());
    }

    #[test]
    fn sink_writes_one_uniquely_named_file_per_record() {
        let dir = tempdir().unwrap();

        let mut sink = DirSink::new(dir.path());
        sink.write("x").unwrap();
        sink.write("y").unwrap();

        let mut contents = Vec::new();
        for entry in fs::read_dir(dir.path()).unwrap() {
            let file = entry.unwrap().path();
            assert!(file.extension().is_some_and(|ext| ext == "dat"));
            contents.push(fs::read_to_string(file).unwrap());
        }
        contents.sort();

        assert_eq!(contents, ["x", "y"]);
    }
}
