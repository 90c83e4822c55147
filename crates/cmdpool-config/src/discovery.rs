use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cmdpool_utils::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CliArgs, Config, ConfigSource, Defaults, ShellConfig};

/// Directory holding the config file, relative to a project directory.
pub const CONFIG_DIR: &str = ".cmdpool";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

const REPOSITORY_MARKERS: [&str; 3] = [".git", ".hg", ".svn"];

const DEFAULTS_KEYS: [&str; 5] = ["workers", "verbose", "timeout_secs", "output_format", "ordered"];

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    defaults: Option<Defaults>,
    shell: Option<ShellConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery unless
    /// `cli_args.config_path` names a file.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|err| ConfigError::DiscoveryFailed {
            reason: format!("cannot determine current directory: {err}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from `start_dir`.
    ///
    /// Path-driven variant of [`Config::discover`] used by tests.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut defaults = Defaults::default();
        let mut shell = ShellConfig::default();

        for key in DEFAULTS_KEYS {
            source_attribution.insert(key.to_string(), ConfigSource::Defaults);
        }

        let config_file = match &cli_args.config_path {
            Some(explicit) if !explicit.is_file() => {
                return Err(ConfigError::NotFound {
                    path: explicit.clone(),
                });
            }
            Some(explicit) => Some(explicit.clone()),
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_file {
            debug!(path = %path.display(), "Loading config file");
            let file_config = Self::load_config_file(path)?;
            let source = ConfigSource::ConfigFile(path.clone());

            if let Some(file_defaults) = file_config.defaults {
                let mut apply = |key: &str, present: bool| {
                    if present {
                        source_attribution.insert(key.to_string(), source.clone());
                    }
                };
                apply("workers", file_defaults.workers.is_some());
                apply("verbose", file_defaults.verbose.is_some());
                apply("timeout_secs", file_defaults.timeout_secs.is_some());
                apply("output_format", file_defaults.output_format.is_some());
                apply("ordered", file_defaults.ordered.is_some());

                defaults = Defaults {
                    workers: file_defaults.workers.or(defaults.workers),
                    verbose: file_defaults.verbose.or(defaults.verbose),
                    timeout_secs: file_defaults.timeout_secs.or(defaults.timeout_secs),
                    output_format: file_defaults.output_format.or(defaults.output_format),
                    ordered: file_defaults.ordered.or(defaults.ordered),
                };
            }

            if let Some(file_shell) = file_config.shell {
                if file_shell.program.is_some() {
                    source_attribution.insert("shell.program".to_string(), source.clone());
                }
                if file_shell.flag.is_some() {
                    source_attribution.insert("shell.flag".to_string(), source.clone());
                }
                shell = file_shell;
            }
        }

        if let Some(workers) = cli_args.workers {
            defaults.workers = Some(workers);
            source_attribution.insert("workers".to_string(), ConfigSource::Cli);
        }
        // Flags can only turn these on, so `Some(false)` from the CLI keeps
        // whatever the file said.
        if cli_args.verbose == Some(true) {
            defaults.verbose = Some(true);
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }
        if cli_args.ordered == Some(true) {
            defaults.ordered = Some(true);
            source_attribution.insert("ordered".to_string(), ConfigSource::Cli);
        }
        if let Some(timeout_secs) = cli_args.timeout_secs {
            defaults.timeout_secs = Some(timeout_secs);
            source_attribution.insert("timeout_secs".to_string(), ConfigSource::Cli);
        }
        if let Some(format) = &cli_args.output_format {
            defaults.output_format = Some(format.clone());
            source_attribution.insert("output_format".to_string(), ConfigSource::Cli);
        }

        let config = Config {
            defaults,
            shell,
            config_file,
            source_attribution,
        };
        config.validate()?;

        Ok(config)
    }

    /// Search upward from `start_dir` for `.cmdpool/config.toml`, stopping at
    /// a repository root (`.git`, `.hg`, `.svn`) or the filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if REPOSITORY_MARKERS
                .iter()
                .any(|marker| dir.join(marker).exists())
            {
                break;
            }
        }
        None
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|err| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            reason: err.to_string().trim_end().to_string(),
        })
    }
}
