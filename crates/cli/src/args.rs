//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments of the `jaxgen` executable.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "jaxgen",
    version,
    about = "Generate JAX-RS client classes from annotated resource descriptors"
)]
pub struct Cli {
    /// Descriptor files (.json, .yaml, .yml) or directories to search
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Return futures from the clients of concrete resource classes
    #[arg(long = "async")]
    pub async_mode: bool,

    /// Reject ambiguous bindings instead of warning about them
    #[arg(long)]
    pub strict: bool,

    /// Output directory [default: jaxrs-client-gen]
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Config file
    #[arg(
        long,
        value_name = "FILE",
        help = "Config file. Defaults to jaxgen.toml in the working directory when present"
    )]
    pub config: Option<PathBuf>,

    /// Write nothing; print a diff for every client that would change
    #[arg(long)]
    pub check: bool,

    /// Print generated sources instead of writing them
    #[arg(long, conflicts_with = "check")]
    pub stdout: bool,
}
