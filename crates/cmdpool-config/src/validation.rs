use cmdpool_utils::ConfigError;

use crate::{Config, OutputFormat};

/// Upper bound on worker threads; beyond this, thread spawn failures are
/// more likely than any speedup.
const MAX_WORKERS: usize = 1024;

impl Config {
    /// Validate configuration values
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if let Some(workers) = self.defaults.workers {
            if workers == 0 {
                return Err(invalid("workers", "must be greater than 0"));
            }
            if workers > MAX_WORKERS {
                return Err(invalid(
                    "workers",
                    &format!("exceeds maximum limit of {MAX_WORKERS}"),
                ));
            }
        }

        if self.defaults.timeout_secs == Some(0) {
            return Err(invalid("timeout_secs", "must be at least 1 second"));
        }

        if let Some(format) = &self.defaults.output_format {
            format.parse::<OutputFormat>()?;
        }

        self.shell.to_shell()?;

        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
