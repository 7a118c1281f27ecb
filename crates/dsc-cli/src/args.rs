use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the dsc binary.
#[derive(Parser, Debug)]
#[command(
    name = "dsc",
    version,
    about = "Build, freeze and specialize declaration descriptors from a resolver stream"
)]
pub struct CliArgs {
    /// Declaration stream (JSON). Use `-` to read from stdin.
    pub input: Option<PathBuf>,

    /// How duplicate declarations are settled at freeze time.
    #[arg(long, value_enum, default_value_t = ConflictMode::FirstWins)]
    pub conflicts: ConflictMode,

    /// Key of a generic class to specialize and print instead of the module.
    #[arg(long)]
    pub specialize: Option<String>,

    /// Type argument for `--specialize`, by intrinsic name (repeatable).
    #[arg(long = "arg", requires = "specialize")]
    pub type_args: Vec<String>,

    /// Append descriptor ids to every rendered line.
    #[arg(long)]
    pub ids: bool,

    /// Model options file (JSON); missing fields keep their defaults.
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Print the effective model options and exit.
    #[arg(long = "showOptions", alias = "show-options")]
    pub show_options: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConflictMode {
    /// Keep the earliest declaration.
    FirstWins,
    /// Keep the latest declaration.
    LastWins,
    /// Keep the earliest declaration and list every conflict.
    Report,
}

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod tests;
