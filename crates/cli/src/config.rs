//! Layered settings: built-in defaults, then `jaxgen.toml`, then flags.
//!
//! ```toml
//! [generator]
//! async = false
//! strict = false
//!
//! [output]
//! dir = "jaxrs-client-gen"
//! ```

use jaxgen_core::{BindingPolicy, GeneratorOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::args::Cli;

/// Config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "jaxgen.toml";
/// Output directory used when neither the config nor the flags name one.
pub const DEFAULT_OUTPUT_DIR: &str = "jaxrs-client-gen";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    generator: GeneratorSection,
    output: OutputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GeneratorSection {
    #[serde(rename = "async")]
    async_mode: bool,
    strict: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OutputSection {
    dir: Option<PathBuf>,
}

fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config {}: {err}", path.display()))?;
    toml::from_str(&contents)
        .map_err(|err| format!("Failed to parse config {}: {err}", path.display()))
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Options handed to the generator.
    pub options: GeneratorOptions,
    /// Root of the generated source tree.
    pub out_dir: PathBuf,
}

impl Settings {
    /// Resolve settings for `cli`. Relative paths are taken against `cwd`.
    ///
    /// An explicit `--config` must exist; the working-directory file is
    /// optional.
    pub fn resolve(cli: &Cli, cwd: &Path) -> Result<Self, String> {
        let file = match &cli.config {
            Some(path) => read_config(&cwd.join(path))?,
            None => {
                let path = cwd.join(CONFIG_FILENAME);
                if path.is_file() {
                    debug!("Using config {}", path.display());
                    read_config(&path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let strict = cli.strict || file.generator.strict;
        let options = GeneratorOptions {
            async_mode: cli.async_mode || file.generator.async_mode,
            policy: if strict {
                BindingPolicy::Strict
            } else {
                BindingPolicy::Lenient
            },
        };
        let out_dir = cli
            .out
            .clone()
            .or(file.output.dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            options,
            out_dir: cwd.join(out_dir),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jaxgen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::resolve(&cli(&["api"]), dir.path()).unwrap();
        assert_eq!(settings.options, GeneratorOptions::default());
        assert_eq!(settings.out_dir, dir.path().join(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_working_directory_config_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[generator]\nasync = true\n\n[output]\ndir = \"generated\"\n",
        )
        .unwrap();

        let settings = Settings::resolve(&cli(&["api"]), dir.path()).unwrap();
        assert!(settings.options.async_mode);
        assert_eq!(settings.options.policy, BindingPolicy::Lenient);
        assert_eq!(settings.out_dir, dir.path().join("generated"));

        let settings =
            Settings::resolve(&cli(&["--strict", "--out", "elsewhere", "api"]), dir.path())
                .unwrap();
        assert_eq!(settings.options.policy, BindingPolicy::Strict);
        assert_eq!(settings.out_dir, dir.path().join("elsewhere"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::resolve(&cli(&["--config", "missing.toml", "api"]), dir.path())
            .unwrap_err();
        assert!(err.starts_with("Failed to read config"), "{err}");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("custom.toml"), "[generator]\nasnyc = true\n").unwrap();
        let err = Settings::resolve(&cli(&["--config", "custom.toml", "api"]), dir.path())
            .unwrap_err();
        assert!(err.starts_with("Failed to parse config"), "{err}");
    }
}
