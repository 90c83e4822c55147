use std::path::PathBuf;

/// Values given on the command line. `None` leaves the setting to the config
/// file or the defaults.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub workers: Option<usize>,
    pub verbose: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub output_format: Option<String>,
    pub ordered: Option<bool>,
}
