use std::io::{self, Write};
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// The only message a user ever sees, whatever went wrong.
pub const ERROR_MESSAGE: &str = "An error has occurred\n";

/// Write [`ERROR_MESSAGE`] to standard error.
///
/// Every failure site calls this without passing any detail, so all failures
/// look the same from outside. The detail lives in [`ShellError`] and is only
/// ever logged.
pub fn report_error() {
    let mut stderr = io::stderr().lock();
    // Nowhere left to report a failing stderr.
    let _ = stderr.write_all(ERROR_MESSAGE.as_bytes());
    let _ = stderr.flush();
}

/// Internal failure detail, used for logging and for deciding how fatal a
/// failure is.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{command}: invalid usage")]
    Usage { command: &'static str },

    #[error("cd: can't chdir to {}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("redirection must be followed by exactly one file name")]
    RedirectSyntax,

    #[error("can't open redirection target {}", path.display())]
    RedirectOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't redirect output: {0}")]
    Redirect(#[source] Errno),

    #[error("command not found: {0}")]
    NotFound(String),

    #[error("argument contains an interior NUL byte")]
    InvalidArgument,

    #[error("can't execute {}", path.display())]
    Exec {
        path: PathBuf,
        #[source]
        source: Errno,
    },

    #[error("can't fork: {0}")]
    Fork(#[source] Errno),

    #[error("can't wait for child: {0}")]
    Wait(#[source] Errno),

    #[error("can't open batch file {}", path.display())]
    BatchOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't read input")]
    Read(#[source] io::Error),
}

impl ShellError {
    /// Whether this failure ends the whole interpreter rather than the
    /// current command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Fork(_) | ShellError::BatchOpen { .. } | ShellError::Read(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_fixed() {
        assert_eq!(ERROR_MESSAGE, "An error has occurred\n");
    }

    #[test]
    fn only_process_level_failures_are_fatal() {
        assert!(ShellError::Fork(Errno::EAGAIN).is_fatal());
        assert!(ShellError::Read(io::Error::other("boom")).is_fatal());
        assert!(!ShellError::RedirectSyntax.is_fatal());
        assert!(!ShellError::Usage { command: "cd" }.is_fatal());
        assert!(!ShellError::NotFound("nope".into()).is_fatal());
    }
}
