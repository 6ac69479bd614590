use std::env as stdenv;
use std::io;
use std::path::{Path, PathBuf};

use crate::external::SearchPath;

/// Process-wide state the built-ins and the launcher work against.
///
/// The environment contains:
/// - `current_dir`: the interpreter's working directory, kept in step with the
///   operating system's view of it by [`change_dir`](Self::change_dir).
/// - `search_path`: the directories external commands are resolved in.
///
/// Children inherit the real working directory and standard streams of the
/// process; nothing here is copied into them explicitly.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The current working directory.
    pub current_dir: PathBuf,
    /// Where external commands are looked up.
    pub search_path: SearchPath,
}

impl Environment {
    /// Capture the current working directory of the process.
    pub fn new(search_path: SearchPath) -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            search_path,
        }
    }

    /// Change the working directory of the whole process.
    ///
    /// `path` is used exactly as given. On failure the working directory is
    /// left as it was.
    pub fn change_dir(&mut self, path: &Path) -> io::Result<()> {
        stdenv::set_current_dir(path)?;
        self.current_dir = stdenv::current_dir().unwrap_or_else(|_| self.current_dir.join(path));
        Ok(())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(SearchPath::default())
    }
}
