use clap::Parser;
use ducatify::{cli, logging};

fn main() {
    let args = cli::Args::parse();

    if let Err(err) = logging::init(args.transform.config.as_deref(), args.transform.verbose) {
        eprintln!("failed to initialize logging: {:#}", err);
        std::process::exit(1);
    }

    if let Err(err) = cli::run(args) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
