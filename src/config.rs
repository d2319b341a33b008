//! Command-line options for the `quadc` binary.
//!
//! ```text
//! quadc <INPUT> [-o <FILE>] [--emit code|ast] [--no-color]
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// What the compiler writes on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Emit {
    /// Three-address code listing
    #[default]
    Code,
    /// Debug dump of the statement tree
    Ast,
}

/// Compile a quad program to three-address code
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "quadc")]
#[command(version, about, long_about = None)]
pub struct Options {
    /// Source file to compile
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// What to write on success
    #[arg(long, value_enum, default_value_t = Emit::Code)]
    pub emit: Emit,

    /// Print diagnostics without terminal colors
    #[arg(long)]
    pub no_color: bool,
}

impl Options {
    pub fn color(&self) -> bool {
        !self.no_color
    }
}
