use std::error::Error;
use std::io::Write;

/// Produces records one at a time from a medium. A source is driven by a
/// single caller and is not restartable; construct a new one to read again.
pub trait RecordSource {
    /// Returns the next record, or `None` once the medium is drained.
    ///
    /// At which point a record is marked consumed on the medium is part of
    /// each implementation's contract and is documented there.
    fn next_record(&mut self) -> Result<Option<String>, Box<dyn Error>>;
}

/// Durably accepts one record into a medium. The call returns only once the
/// record has been handed to the medium.
pub trait RecordSink {
    fn write(&mut self, record: &str) -> Result<(), Box<dyn Error>>;
}

/// Moves every record the source yields into the sink, one at a time, in
/// pull order. Each write completes before the next record is requested.
/// The first error from either side aborts the drain. Returns the number of
/// records moved.
pub fn drain(
    source: &mut dyn RecordSource,
    sink: &mut dyn RecordSink,
) -> Result<u64, Box<dyn Error>> {
    let mut moved = 0u64;

    while let Some(record) = source.next_record()? {
        sink.write(&record)?;
        moved += 1;
        print!(".");
        std::io::stdout().flush()?;
    }

    if moved > 0 {
        println!();
    }

    Ok(moved)
}
