//! Command-line driver
//!
//! Resolves the server, opens one session and lints every Jenkinsfile
//! through it.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::{Args, ServerSettings};
use crate::error::Result;
use crate::jenkins::{Credentials, Session};
use crate::validation::lint_files;

/// Initialize logging: `error` by default, `debug` with `--debug`
pub fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

/// Lint all files named in `args`.
///
/// Configuration and connection errors abort before any file is linted.
/// Otherwise returns whether every file is valid.
pub fn run<F>(args: &Args, lookup: F, out: &mut dyn Write) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = ServerSettings::resolve(args, lookup)?;
    let credentials = Credentials::from_parts(settings.username, settings.password);

    let mut session = Session::connect(
        &settings.url,
        credentials,
        args.insecure,
        Duration::from_secs(args.timeout),
    )?;
    let status = lint_files(&mut session, args.jenkinsfile.as_slice(), out);
    session.close();

    Ok(status)
}

/// Map the outcome of [`run`] to the process exit status: 0 iff every file is valid
pub fn exit_status(outcome: Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            log::error!("{}", e);
            1
        }
    }
}

pub fn exit_code(outcome: Result<bool>) -> ExitCode {
    ExitCode::from(exit_status(outcome))
}
