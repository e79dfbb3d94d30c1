//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::args::Cli;

/// Write the completion script for `shell` to stdout.
pub fn print(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
