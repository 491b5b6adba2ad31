//! Descriptor discovery and loading.
//!
//! Inputs are files or directories searched recursively. Every readable
//! descriptor is merged into one [`DescriptorBundle`] so bean types may live
//! in any file. Unparseable files are skipped with a warning.

use jaxgen_core::DescriptorBundle;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(OsStr::to_str)? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Expand inputs into the sorted list of descriptor files they name.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry
                    .map_err(|err| format!("Failed to walk {}: {err}", input.display()))?;
                if entry.file_type().is_file() && Format::of(entry.path()).is_some() {
                    files.push(entry.into_path());
                }
            }
        } else if input.is_file() {
            if Format::of(input).is_some() {
                files.push(input.clone());
            } else {
                warn!("Skipping {}: not a .json, .yaml or .yml file", input.display());
            }
        } else {
            return Err(format!("Input not found: {}", input.display()));
        }
    }
    Ok(files)
}

/// Parse one descriptor file.
pub fn parse_descriptor(path: &Path) -> Result<DescriptorBundle, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    match Format::of(path) {
        Some(Format::Json) => serde_json::from_str(&contents)
            .map_err(|err| format!("Failed to parse {}: {err}", path.display())),
        Some(Format::Yaml) => {
            // Go through a JSON value so annotations keep the single-key map
            // form instead of YAML tags.
            let value: serde_json::Value = serde_yaml::from_str(&contents)
                .map_err(|err| format!("Failed to parse {}: {err}", path.display()))?;
            serde_json::from_value(value)
                .map_err(|err| format!("Failed to parse {}: {err}", path.display()))
        }
        None => Err(format!("Unsupported descriptor format: {}", path.display())),
    }
}

/// Load and merge every descriptor named by `inputs`.
pub fn load_bundle(inputs: &[PathBuf]) -> Result<DescriptorBundle, String> {
    let mut bundle = DescriptorBundle::default();
    let mut loaded = 0usize;
    for path in discover(inputs)? {
        let parsed = match parse_descriptor(&path) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("{err}, skipping");
                continue;
            }
        };
        debug!("Loaded {} types from {}", parsed.types.len(), path.display());
        for name in bundle.merge(parsed) {
            warn!(
                "Duplicate type {name} in {}, keeping the first definition",
                path.display()
            );
        }
        loaded += 1;
    }
    info!(
        "Loaded {} types from {loaded} descriptor files",
        bundle.types.len()
    );
    Ok(bundle)
}
