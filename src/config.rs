use crate::external::SearchPath;

/// Maximum size of a raw command line, including its newline.
///
/// A read keeps at most `MAX_COMMAND_SIZE - 1` bytes of a line and drops the rest.
pub const MAX_COMMAND_SIZE: usize = 100;

/// Maximum number of tokens kept from one command line.
pub const MAX_NUM_ARGUMENTS: usize = 10;

/// Prompt printed before every read in interactive mode.
pub const PROMPT: &str = "msh> ";

/// Settings the [`Interpreter`](crate::Interpreter) is built from.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Prompt written to standard output before each interactive read.
    pub prompt: String,
    /// Bound on a raw line, see [`MAX_COMMAND_SIZE`].
    pub max_line_len: usize,
    /// Capacity of each token sequence, see [`MAX_NUM_ARGUMENTS`].
    pub max_tokens: usize,
    /// Directories searched for external commands.
    pub search_path: SearchPath,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: PROMPT.to_string(),
            max_line_len: MAX_COMMAND_SIZE,
            max_tokens: MAX_NUM_ARGUMENTS,
            search_path: SearchPath::default(),
        }
    }
}
