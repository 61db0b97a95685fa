//! Command-line interface for the `lzip` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity, sweep grid defaults, `DISPLAY_LEVEL` and the display macros. |
//! | [`args`]      | `clap` definition of the three subcommands and their mapping onto library options. |
//! | [`ops`]       | `compress` / `decompress`: output naming, streaming, leftover policy. |
//! | [`sweep`]     | Parallel preset sweep over one file. |
//!
//! Typical call sequence: `Cli::parse` → `set_display_level` → [`run`].

pub mod constants;
pub mod args;
pub mod ops;
pub mod sweep;

use args::{Cli, Command};

/// Dispatch the parsed command line.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Compress(args) => ops::run_compress(args),
        Command::Decompress(args) => ops::run_decompress(args),
        Command::Sweep(args) => sweep::run_sweep(args).map(|_| ()),
    }
}
