mod args;
mod disk;
mod drain;
mod queue;

pub use crate::args::{Action, Args};
use crate::disk::{DirSink, DirSource};
use crate::drain::drain;
use crate::queue::{QueueSink, QueueSource};
use std::error::Error;

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match args.action {
        Action::Enqueue {
            input_path,
            url,
            queue,
        } => {
            let mut source = DirSource::new(&input_path)?;
            let mut sink = QueueSink::open(&url, &args.vhost, &queue)?;

            let moved = drain(&mut source, &mut sink)?;
            println!(
                "Enqueued {} records from '{}' to queue '{}'",
                moved,
                input_path.display(),
                queue
            );
        }
        Action::Dequeue {
            url,
            queue,
            output_path,
        } => {
            let mut source = QueueSource::open(&url, &args.vhost, &queue)?;
            let mut sink = DirSink::new(&output_path);

            let moved = drain(&mut source, &mut sink)?;
            println!(
                "Dequeued {} records from queue '{}' to '{}'",
                moved,
                queue,
                output_path.display()
            );
        }
    }

    Ok(())
}
