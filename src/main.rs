mod args;
mod picker;

use clap::Parser;
use log::{info, LevelFilter};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    info!("args: {:?}", args);

    let res = picker::run_picker(&args);

    if let Err(e) = res {
        eprintln!("An error occured: {}", e);
        std::process::exit(1);
    }
}
