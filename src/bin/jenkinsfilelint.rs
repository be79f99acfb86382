use clap::Parser;
use std::process::ExitCode;

use jenkinsfilelint::cli::{exit_code, init_logging, run};
use jenkinsfilelint::config::Args;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    let mut stdout = std::io::stdout().lock();
    exit_code(run(&args, |key| std::env::var(key).ok(), &mut stdout))
}
