use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use cmdpool_runner::{Shell, ShellRunner};
use cmdpool_utils::ConfigError;
use serde::{Deserialize, Serialize};

/// Effective cmdpool configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dispatch settings from `[defaults]`.
    pub defaults: Defaults,
    /// Interpreter override from `[shell]`.
    pub shell: ShellConfig,
    /// Config file that contributed values, if any.
    pub config_file: Option<PathBuf>,
    /// Source attribution for each setting (for `cmdpool config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// `[defaults]` section. After loading, every field except `timeout_secs` is
/// populated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub workers: Option<usize>,
    pub verbose: Option<bool>,
    /// Per-command timeout. Unset means commands may run forever.
    pub timeout_secs: Option<u64>,
    pub output_format: Option<String>,
    /// Report results in submission order instead of completion order.
    pub ordered: Option<bool>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            workers: Some(default_workers()),
            verbose: Some(false),
            timeout_secs: None,
            output_format: Some(OutputFormat::Text.to_string()),
            ordered: Some(false),
        }
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// `[shell]` section. Either both unset (platform shell) or `program` set.
/// A missing `flag` falls back to the platform shell's flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    pub program: Option<String>,
    pub flag: Option<String>,
}

impl ShellConfig {
    /// Resolve to a runnable [`Shell`].
    pub fn to_shell(&self) -> Result<Shell, ConfigError> {
        let Some(program) = &self.program else {
            return if self.flag.is_some() {
                Err(ConfigError::InvalidValue {
                    key: "shell.program".to_string(),
                    value: "a flag was given without a program".to_string(),
                })
            } else {
                Ok(Shell::platform_default())
            };
        };

        let flag = self
            .flag
            .clone()
            .unwrap_or_else(|| Shell::platform_default().flag().to_string());
        Shell::new(program.as_str(), flag).map_err(|err| ConfigError::InvalidValue {
            key: "shell.program".to_string(),
            value: err.to_string(),
        })
    }
}

/// How `cmdpool run` prints results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: "output_format".to_string(),
                value: format!("unknown format '{other}', expected text or json"),
            }),
        }
    }
}

/// Source of a configuration value for attribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::ConfigFile(path) => write!(f, "config file ({})", path.display()),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

impl Config {
    #[must_use]
    pub fn workers(&self) -> usize {
        self.defaults.workers.unwrap_or_else(default_workers).max(1)
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.defaults.timeout_secs.map(Duration::from_secs)
    }

    /// Output format. Falls back to text; `validate` rejects unknown names.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.defaults
            .output_format
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn ordered(&self) -> bool {
        self.defaults.ordered.unwrap_or(false)
    }

    /// Runner for `cmdpool run`, with the configured shell and timeout.
    pub fn shell_runner(&self) -> Result<ShellRunner, ConfigError> {
        let mut runner = ShellRunner::new().with_shell(self.shell.to_shell()?);
        if let Some(timeout) = self.timeout() {
            runner = runner.with_timeout(timeout);
        }
        Ok(runner)
    }

    /// Effective configuration as `key -> (value, source)`, sorted by key.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add_config = |key: &str, value: String| {
            let source = self
                .source_attribution
                .get(key)
                .map_or_else(|| "defaults".to_string(), ToString::to_string);
            config.insert(key.to_string(), (value, source));
        };

        add_config("workers", self.workers().to_string());
        add_config("verbose", self.verbose().to_string());
        add_config(
            "timeout_secs",
            self.defaults
                .timeout_secs
                .map_or_else(|| "none".to_string(), |secs| secs.to_string()),
        );
        add_config("output_format", self.output_format().to_string());
        add_config("ordered", self.ordered().to_string());

        let shell = self
            .shell
            .to_shell()
            .unwrap_or_else(|_| Shell::platform_default());
        add_config("shell.program", shell.program().to_string());
        add_config("shell.flag", shell.flag().to_string());

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "output_format"
        ));
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_defaults() {
        let defaults = Defaults::default();
        assert!(defaults.workers.unwrap() >= 1);
        assert_eq!(defaults.verbose, Some(false));
        assert_eq!(defaults.timeout_secs, None);
        assert_eq!(defaults.output_format.as_deref(), Some("text"));
        assert_eq!(defaults.ordered, Some(false));
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Defaults.to_string(), "defaults");
        assert_eq!(
            ConfigSource::ConfigFile(PathBuf::from("a/config.toml")).to_string(),
            "config file (a/config.toml)"
        );
    }

    #[test]
    fn test_shell_config_resolution() {
        assert_eq!(
            ShellConfig::default().to_shell().unwrap(),
            Shell::platform_default()
        );

        let bash = ShellConfig {
            program: Some("bash".to_string()),
            flag: Some("-lc".to_string()),
        };
        let shell = bash.to_shell().unwrap();
        assert_eq!(shell.program(), "bash");
        assert_eq!(shell.flag(), "-lc");

        let program_only = ShellConfig {
            program: Some("bash".to_string()),
            flag: None,
        };
        assert_eq!(
            program_only.to_shell().unwrap().flag(),
            Shell::platform_default().flag()
        );
    }

    #[test]
    fn test_shell_config_rejects_flag_without_program() {
        let config = ShellConfig {
            program: None,
            flag: Some("-c".to_string()),
        };
        assert!(config.to_shell().is_err());
    }

    #[test]
    fn test_shell_config_rejects_empty_program() {
        let config = ShellConfig {
            program: Some("  ".to_string()),
            flag: None,
        };
        assert!(matches!(
            config.to_shell(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "shell.program"
        ));
    }
}
