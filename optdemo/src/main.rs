mod arguments;
mod error;

use std::io::{self, Write};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use arguments::Outcome;
use error::Result;

/// Log filter variable, e.g. `OPTDEMO_LOG=optparser=debug`.
const LOG_ENV: &str = "OPTDEMO_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run() -> Result<ExitCode> {
    match arguments::parse_arguments(std::env::args().skip(1))? {
        Outcome::Help(text) => {
            print!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Invalid(text) => {
            eprint!("{}", text);
            Ok(ExitCode::from(2))
        }
        Outcome::Run(cmdline) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            cmdline.print(&mut out)?;
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("optdemo: {}", e);
            ExitCode::FAILURE
        }
    }
}
