use clap::Parser;
use queuectl::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    queuectl::run(args)
}
