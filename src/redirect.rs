//! Output redirection: `command args... > file`.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use nix::libc::{STDERR_FILENO, STDOUT_FILENO};
use nix::unistd::dup2;

use crate::error::ShellError;
use crate::lexer::TokenSequence;

/// The redirection operator.
pub const REDIRECT_OP: &str = ">";

/// Permissions for files created by a redirection: owner read and write.
pub const REDIRECT_MODE: u32 = 0o600;

/// Split a trailing `> file` off `tokens`.
///
/// Only tokens after the command name are scanned and the first `>` wins.
/// Exactly one token must follow it, anything else is
/// [`ShellError::RedirectSyntax`] and `tokens` is left as it was. On success
/// `tokens` ends right before the `>` and the file name is returned.
pub fn parse_redirection(tokens: &mut TokenSequence) -> Result<Option<String>, ShellError> {
    let Some(op) = tokens.position(1, REDIRECT_OP) else {
        return Ok(None);
    };
    if tokens.len() != op + 2 {
        return Err(ShellError::RedirectSyntax);
    }
    let target = tokens
        .get(op + 1)
        .map(str::to_owned)
        .ok_or(ShellError::RedirectSyntax)?;
    tokens.truncate(op);
    Ok(Some(target))
}

/// Open `target` for writing: created if missing, truncated otherwise.
pub fn open_target(target: &Path) -> Result<File, ShellError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .mode(REDIRECT_MODE)
        .open(target)
        .map_err(|source| ShellError::RedirectOpen {
            path: target.to_path_buf(),
            source,
        })
}

/// Point both standard output and standard error of this process at `target`.
///
/// Only ever called in a freshly forked child. The opened file itself is closed
/// again once both streams refer to it.
pub fn redirect_output(target: &Path) -> Result<(), ShellError> {
    let file = open_target(target)?;
    let fd = file.as_raw_fd();
    dup2(fd, STDOUT_FILENO).map_err(ShellError::Redirect)?;
    dup2(fd, STDERR_FILENO).map_err(ShellError::Redirect)?;
    drop(file);
    Ok(())
}
