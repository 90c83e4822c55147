use std::collections::HashMap;
use std::time::Duration;

use cmdpool_utils::ConfigError;

use crate::{Config, ConfigSource, Defaults, OutputFormat, ShellConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cmdpool_config::{Config, OutputFormat};
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .workers(4)
    ///     .timeout(Duration::from_secs(60))
    ///     .output_format(OutputFormat::Json)
    ///     .build()?;
    ///
    /// assert_eq!(config.workers(), 4);
    /// # Ok::<(), cmdpool_utils::ConfigError>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for a [`Config`] that never touches the filesystem or environment.
///
/// Values set on the builder are attributed to the CLI source; everything
/// else comes from the defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    workers: Option<usize>,
    verbose: Option<bool>,
    timeout_secs: Option<u64>,
    output_format: Option<OutputFormat>,
    ordered: Option<bool>,
    shell_program: Option<String>,
    shell_flag: Option<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Per-command timeout, rounded up to whole seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout
            .as_secs()
            .saturating_add(u64::from(timeout.subsec_nanos() > 0));
        self.timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    #[must_use]
    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = Some(ordered);
        self
    }

    #[must_use]
    pub fn shell(mut self, program: impl Into<String>, flag: impl Into<String>) -> Self {
        self.shell_program = Some(program.into());
        self.shell_flag = Some(flag.into());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut defaults = Defaults::default();
        let mut source_attribution = HashMap::new();

        let mut set = |key: &str, is_set: bool| {
            let source = if is_set {
                ConfigSource::Cli
            } else {
                ConfigSource::Defaults
            };
            source_attribution.insert(key.to_string(), source);
        };
        set("workers", self.workers.is_some());
        set("verbose", self.verbose.is_some());
        set("timeout_secs", self.timeout_secs.is_some());
        set("output_format", self.output_format.is_some());
        set("ordered", self.ordered.is_some());
        set("shell.program", self.shell_program.is_some());
        set("shell.flag", self.shell_flag.is_some());

        defaults.workers = self.workers.or(defaults.workers);
        defaults.verbose = self.verbose.or(defaults.verbose);
        defaults.timeout_secs = self.timeout_secs;
        if let Some(format) = self.output_format {
            defaults.output_format = Some(format.to_string());
        }
        defaults.ordered = self.ordered.or(defaults.ordered);

        let config = Config {
            defaults,
            shell: ShellConfig {
                program: self.shell_program,
                flag: self.shell_flag,
            },
            config_file: None,
            source_attribution,
        };
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = Config::builder().build().unwrap();
        assert!(config.workers() >= 1);
        assert!(!config.verbose());
        assert_eq!(config.timeout(), None);
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(config.config_file.is_none());
        assert_eq!(config.source_attribution["workers"], ConfigSource::Defaults);
    }

    #[test]
    fn test_builder_values_are_attributed_to_cli() {
        let config = Config::builder()
            .workers(2)
            .verbose(true)
            .ordered(true)
            .shell("bash", "-c")
            .build()
            .unwrap();

        assert_eq!(config.workers(), 2);
        assert!(config.verbose());
        assert!(config.ordered());
        assert_eq!(config.source_attribution["workers"], ConfigSource::Cli);
        assert_eq!(config.source_attribution["shell.program"], ConfigSource::Cli);
        assert_eq!(config.shell_runner().unwrap().shell().program(), "bash");
    }

    #[test]
    fn test_timeout_rounds_up() {
        let config = Config::builder()
            .timeout(Duration::from_millis(1500))
            .build()
            .unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(
            config.shell_runner().unwrap().timeout(),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn test_timeout_rounding_saturates() {
        let config = Config::builder().timeout(Duration::MAX).build().unwrap();
        assert_eq!(config.timeout(), Some(Duration::from_secs(u64::MAX)));
    }

    #[test]
    fn test_builder_validates() {
        assert!(Config::builder().workers(0).build().is_err());
        assert!(Config::builder().timeout(Duration::ZERO).build().is_err());
        assert!(Config::builder().shell("", "-c").build().is_err());
    }
}
