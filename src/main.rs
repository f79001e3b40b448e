use clap::Parser;
use std::process;

mod cli;

fn main() {
    let cli = self::cli::Cli::parse();
    match cli.run() {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(error) => {
            eprintln!("{error:?}");
            process::exit(1);
        }
    }
}
