use clap::Parser;
use cryptotrack::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
