use clap::Parser;
use mediatidy::cli::{Cli, run_cli};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run_cli(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
