//! Reading command lists for `cmdpool run`
//!
//! One command per line. Blank lines and lines whose first non-blank
//! character is `#` are skipped; other lines are kept verbatim apart from a
//! trailing `\r`.

use std::io::{self, Read};
use std::path::Path;

use cmdpool_utils::CmdpoolError;

/// Commands in `text`, in order.
#[must_use]
pub fn parse_command_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(str::to_string)
        .collect()
}

/// Read commands from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_commands(path: Option<&Path>) -> Result<Vec<String>, CmdpoolError> {
    match path {
        Some(path) if path != Path::new("-") => {
            let text = std::fs::read_to_string(path).map_err(|source| {
                CmdpoolError::CommandInput {
                    source_name: path.display().to_string(),
                    source,
                }
            })?;
            Ok(parse_command_lines(&text))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut text)
                .map_err(|source| CmdpoolError::CommandInput {
                    source_name: "stdin".to_string(),
                    source,
                })?;
            Ok(parse_command_lines(&text))
        }
    }
}
