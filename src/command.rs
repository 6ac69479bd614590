use nix::sys::wait::WaitStatus;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Exit code used for a clean end of session.
pub const EXIT_SUCCESS: ExitCode = 0;

/// Exit code used for startup errors, empty batch files and fatal failures.
pub const EXIT_FAILURE: ExitCode = 1;

/// What the read-eval loop should do after a command line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Read the next line.
    Continue,
    /// Terminate the interpreter with the given status.
    Exit(ExitCode),
}

/// Result of one dispatched command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was dispatched, the line had no tokens.
    Empty,
    /// A built-in ran in the interpreter's own process.
    Builtin(Control),
    /// An external command ran in a child; its status is observed only.
    External(WaitStatus),
}

impl Outcome {
    /// Loop control implied by this outcome.
    pub fn control(&self) -> Control {
        match self {
            Outcome::Builtin(control) => *control,
            Outcome::Empty | Outcome::External(_) => Control::Continue,
        }
    }
}

/// Marker that makes argh read every later word as a positional argument.
const END_OF_OPTIONS: &str = "--";

/// Prefix `args` with [`END_OF_OPTIONS`] so words like `--`, `help` or `-x`
/// are counted as plain arguments instead of being parsed as flags.
pub fn as_positionals<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut positionals = Vec::with_capacity(args.len() + 1);
    positionals.push(END_OF_OPTIONS);
    positionals.extend_from_slice(args);
    positionals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_positionals_prefixes_marker() {
        assert_eq!(as_positionals(&[]), ["--"]);
        assert_eq!(as_positionals(&["--", "help"]), ["--", "--", "help"]);
    }
}
