//! The `jaxgen` executable.

use clap::Parser;
use jaxgen_cli::{Cli, init_tracing, run};

fn main() {
    let cli = Cli::parse();
    init_tracing();
    std::process::exit(run(cli));
}
