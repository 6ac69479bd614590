use std::convert::Infallible;
use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{AccessFlags, ForkResult, Pid, access, execv, fork};
use tracing::{debug, trace};

use crate::command::EXIT_SUCCESS;
use crate::env::Environment;
use crate::error::{ShellError, report_error};
use crate::lexer::TokenSequence;
use crate::redirect::{parse_redirection, redirect_output};

/// Directories searched for external commands, in order.
pub const DEFAULT_SEARCH_DIRS: [&str; 4] = ["/bin/", "/usr/bin/", "/usr/local/bin/", "./"];

/// A fixed, ordered list of directories where commands are looked up.
///
/// Unlike a typical shell there is no `PATH` lookup: a command is found only if
/// `<dir><name>` is executable for one of these directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<String>,
}

impl SearchPath {
    /// Build a search path from directory prefixes. Each prefix is taken
    /// literally and should end with `/`.
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Directory prefixes in search order.
    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// Candidate paths for `name`, one per directory, in search order.
    ///
    /// Candidates are plain string concatenations, so `/bin/ls` is looked up as
    /// `/bin//bin/ls` and so on rather than being taken as an absolute path.
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.dirs
            .iter()
            .map(move |dir| PathBuf::from(format!("{dir}{name}")))
    }

    /// Resolve `name` to the first candidate the current user may execute.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }
        self.candidates(name)
            .find(|candidate| access(candidate.as_path(), AccessFlags::X_OK).is_ok())
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DIRS)
    }
}

/// Run `tokens` as an external command and wait for it to finish.
///
/// The command runs in a forked child which applies any `> file` redirection,
/// resolves the program through `env`'s [`SearchPath`] and replaces itself with
/// it. If any of that fails the child reports the error and exits with status
/// 0, so the parent sees an ordinary child exit.
///
/// Only a failure to create the child at all is returned as an error.
pub fn launch(mut tokens: TokenSequence, env: &Environment) -> Result<WaitStatus, ShellError> {
    // Anything still buffered would otherwise be written twice.
    let _ = io::stdout().flush();

    // SAFETY: the interpreter is single-threaded, and the child only touches
    // its own copy of `tokens` before exec or exit.
    match unsafe { fork() } {
        Ok(ForkResult::Child) => run_child(&mut tokens, env),
        Ok(ForkResult::Parent { child }) => {
            let status = wait_for(child)?;
            debug!(pid = %child, ?status, "child finished");
            Ok(status)
        }
        Err(errno) => Err(ShellError::Fork(errno)),
    }
}

fn run_child(tokens: &mut TokenSequence, env: &Environment) -> ! {
    let err = match exec_command(tokens, env) {
        Ok(never) => match never {},
        Err(err) => err,
    };
    debug!(error = %err, "child failed before exec");
    report_error();
    std::process::exit(EXIT_SUCCESS)
}

fn exec_command(tokens: &mut TokenSequence, env: &Environment) -> Result<Infallible, ShellError> {
    if let Some(target) = parse_redirection(tokens)? {
        redirect_output(Path::new(&target))?;
    }

    let name = tokens.name().unwrap_or_default();
    let program = env
        .search_path
        .resolve(name)
        .ok_or_else(|| ShellError::NotFound(name.to_string()))?;
    trace!(program = %program.display(), argv = %tokens, "exec");

    let path = CString::new(program.as_os_str().as_bytes()).map_err(|_| ShellError::InvalidArgument)?;
    let argv = tokens
        .iter()
        .map(CString::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ShellError::InvalidArgument)?;

    execv(&path, &argv).map_err(|source| ShellError::Exec {
        path: program,
        source,
    })
}

fn wait_for(child: Pid) -> Result<WaitStatus, ShellError> {
    loop {
        match waitpid(child, None) {
            Err(Errno::EINTR) => continue,
            other => return other.map_err(ShellError::Wait),
        }
    }
}
