// ============================================================================
// CommandLine - Assemble a shell command line from parts
// ============================================================================

/// Builder for a shell command line.
///
/// Parts are joined with single spaces. Parts added through [`arg`](Self::arg)
/// are quoted for the platform shell when they contain anything other than
/// plain word characters, so a value such as a file name cannot inject extra
/// shell syntax. Parts added through [`raw`](Self::raw) are inserted verbatim.
///
/// # Example
///
/// ```rust
/// use cmdpool_runner::CommandLine;
///
/// let line = CommandLine::new("grep")
///     .arg("-c")
///     .arg("needle")
///     .raw("< input.txt")
///     .to_line();
///
/// assert_eq!(line, "grep -c needle < input.txt");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The program to invoke
    pub program: String,
    /// Parts after the program, already rendered for the shell
    pub parts: Vec<String>,
}

impl CommandLine {
    /// Create a new `CommandLine` invoking `program`.
    ///
    /// The program name is inserted verbatim.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            parts: Vec::new(),
        }
    }

    /// Add a single argument, quoted if needed.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.parts.push(quote(arg.as_ref()));
        self
    }

    /// Add multiple arguments, each quoted if needed.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parts
            .extend(args.into_iter().map(|arg| quote(arg.as_ref())));
        self
    }

    /// Add a fragment of shell syntax exactly as given.
    #[must_use]
    pub fn raw(mut self, fragment: impl Into<String>) -> Self {
        self.parts.push(fragment.into());
        self
    }

    /// Render the full command line.
    #[must_use]
    pub fn to_line(&self) -> String {
        let mut line = self.program.clone();
        for part in &self.parts {
            line.push(' ');
            line.push_str(part);
        }
        line
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_line())
    }
}

fn is_plain(arg: &str) -> bool {
    !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-.,/:=+@%".contains(c))
}

#[cfg(not(windows))]
fn quote(arg: &str) -> String {
    if is_plain(arg) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(windows)]
fn quote(arg: &str) -> String {
    if is_plain(arg) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_args_are_joined_with_spaces() {
        let line = CommandLine::new("which").arg("ls").to_line();
        assert_eq!(line, "which ls");

        let line = CommandLine::new("cp").args(["-r", "src/", "dest/"]).to_line();
        assert_eq!(line, "cp -r src/ dest/");
    }

    #[test]
    fn test_program_only() {
        assert_eq!(CommandLine::new("true").to_line(), "true");
    }

    #[test]
    fn test_raw_fragment_is_verbatim() {
        let line = CommandLine::new("echo").raw("hello world > out.txt").to_line();
        assert_eq!(line, "echo hello world > out.txt");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_raw_parts_join_plainly_while_args_stay_whole() {
        let parts = ["grep", "-n", "two words", "notes.txt"];

        let plain = parts[1..]
            .iter()
            .fold(CommandLine::new(parts[0]), |cmd, part| cmd.raw(*part));
        assert_eq!(plain.to_line(), parts.join(" "));

        let quoted = CommandLine::new(parts[0]).args(&parts[1..]);
        assert_eq!(quoted.to_line(), "grep -n 'two words' notes.txt");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_shell_metacharacters_are_quoted() {
        let dangerous = [
            ("; rm -rf /", "'; rm -rf /'"),
            ("$(whoami)", "'$(whoami)'"),
            ("`ls`", "'`ls`'"),
            ("a b", "'a b'"),
            ("", "''"),
            ("it's", r"'it'\''s'"),
        ];

        for (input, expected) in dangerous {
            let line = CommandLine::new("echo").arg(input).to_line();
            assert_eq!(line, format!("echo {expected}"), "input: {input:?}");
        }
    }

    #[test]
    fn test_display_matches_to_line() {
        let cmd = CommandLine::new("ls").arg("-la");
        assert_eq!(cmd.to_string(), cmd.to_line());
    }

    #[cfg(unix)]
    mod shell_round_trip {
        use super::*;
        use crate::{ProcessRunner, ShellRunner};
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            /// A quoted argument reaches the program as a single, unaltered word.
            #[test]
            fn prop_quoted_arg_is_not_interpreted(arg in "[^\\x00]{0,40}") {
                let line = CommandLine::new("printf").arg("%s").arg(&arg).to_line();
                let output = ShellRunner::new().run(&line);

                prop_assert!(output.success(), "failed: {line}: {}", output.std_err());
                prop_assert_eq!(output.std_out(), arg.trim_matches(|c: char| c.is_ascii_whitespace()));
            }
        }
    }
}
