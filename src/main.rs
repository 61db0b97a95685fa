//! Binary entry point for the `lzip` command-line tool.
//!
//! 1. [`Cli::parse`] reads the command line.
//! 2. `-q` / `-v` set the display level; `RUST_LOG` drives the tracing
//!    subscriber on stderr.
//! 3. [`lzip::cli::run`] performs the operation; any error is printed and
//!    turned into exit code 1.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lzip::cli::args::Cli;
use lzip::cli::constants::{display_level_from_flags, set_display_level, COMPRESSOR_NAME};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber already being set is not an error for the tool.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    set_display_level(display_level_from_flags(cli.quiet, cli.verbose));
    init_tracing();

    lzip::displaylevel!(
        3,
        "*** {} v{}, {}-bit ***\n",
        COMPRESSOR_NAME,
        lzip::version_string(),
        std::mem::size_of::<*const ()>() * 8
    );

    match lzip::cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            lzip::displaylevel!(1, "{}: {:#}\n", COMPRESSOR_NAME, error);
            ExitCode::FAILURE
        }
    }
}
