//! Batch driver for jaxgen.
//!
//! Loads descriptor files, generates one client per resource type and
//! writes, prints or checks the results. Failures are reported per resource
//! and turn the exit code to 1 without stopping the batch.

use jaxgen_core::{ClientGenerator, TypeIntrospect};
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

pub mod args;
pub mod config;
pub mod load;
mod logging;
pub mod output;

pub use args::Cli;
pub use config::Settings;
pub use logging::{LOG_ENV, init_tracing};
pub use output::GeneratedFile;

/// Counts from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Clients generated successfully.
    pub generated: usize,
    /// Resources whose generation failed.
    pub failed: usize,
    /// Clients that differ from the output directory (`--check` only).
    pub changed: usize,
}

impl Outcome {
    /// 1 when any resource failed or any checked client is stale.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.failed > 0 || self.changed > 0)
    }
}

/// Generate clients for every resource type in `bundle`.
fn generate_all(
    generator: &ClientGenerator,
    bundle: &jaxgen_core::DescriptorBundle,
    outcome: &mut Outcome,
) -> Vec<GeneratedFile> {
    let mut files = Vec::new();
    for resource in bundle.resources() {
        match generator.generate(resource, bundle) {
            Ok(file) => {
                files.push(GeneratedFile {
                    rel_path: file.relative_path(),
                    source: file.to_source(),
                });
                outcome.generated += 1;
            }
            Err(err) => {
                error!("{}: {err}", resource.qualified_name());
                outcome.failed += 1;
            }
        }
    }
    if outcome.generated + outcome.failed == 0 {
        warn!("No resource types found (no type carries a root path)");
    }
    files
}

/// Run with paths resolved against `cwd`.
pub fn execute(cli: &Cli, cwd: &Path) -> Result<Outcome, String> {
    let settings = Settings::resolve(cli, cwd)?;
    let inputs: Vec<_> = cli.paths.iter().map(|path| cwd.join(path)).collect();
    let bundle = load::load_bundle(&inputs)?;

    let mut outcome = Outcome::default();
    let files = generate_all(&ClientGenerator::new(settings.options), &bundle, &mut outcome);

    if cli.stdout {
        output::print_all(&files, &mut io::stdout().lock())
            .map_err(|err| format!("Failed to print sources: {err}"))?;
    } else if cli.check {
        outcome.changed = output::check_all(&files, &settings.out_dir, &mut io::stdout().lock())?;
        if outcome.changed > 0 {
            info!("{} of {} clients are out of date", outcome.changed, files.len());
        }
    } else {
        output::write_all(&files, &settings.out_dir)?;
    }

    if outcome.failed > 0 {
        error!("{} of {} resources failed", outcome.failed, outcome.generated + outcome.failed);
    }
    Ok(outcome)
}

/// Run from the process working directory and map the result to an exit
/// code.
pub fn run(cli: Cli) -> i32 {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("Failed to determine working directory: {err}");
            return 1;
        }
    };
    match execute(&cli, &cwd) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
