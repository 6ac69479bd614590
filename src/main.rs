//! `msh` entry point.
//!
//! ```bash
//! msh              # interactive, prompts with "msh> "
//! msh script.txt   # batch mode, one command per line
//! ```
//!
//! Set `MSH_LOG` (e.g. `MSH_LOG=debug`) to get diagnostics on standard error.

use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use msh::command::{EXIT_FAILURE, as_positionals};
use msh::error::report_error;
use msh::{Interpreter, Mode};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(FromArgs)]
/// A minimal command interpreter.
struct Cli {
    #[argh(positional)]
    /// script to run in batch mode; reads from standard input when omitted.
    batch_file: Option<String>,
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("MSH_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let args: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let (cmd, rest) = args.split_first().map_or(("msh", &[][..]), |(cmd, rest)| {
        (cmd.as_str(), rest)
    });
    let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

    if rest.len() > 1 {
        report_error();
        std::process::exit(EXIT_FAILURE);
    }
    let cli = match Cli::from_args(&[cmd], &as_positionals(&rest)) {
        Ok(cli) => cli,
        Err(EarlyExit { .. }) => {
            report_error();
            std::process::exit(EXIT_FAILURE);
        }
    };

    let mode = match cli.batch_file {
        Some(path) => Mode::Batch(PathBuf::from(path)),
        None => Mode::Interactive,
    };
    let code = Interpreter::default().run(mode);
    std::process::exit(code)
}
