use crate::builtin::{self, BuiltinFactory};
use crate::command::{Control, EXIT_FAILURE, EXIT_SUCCESS, ExitCode, Outcome};
use crate::config::ShellConfig;
use crate::env::Environment;
use crate::error::{ShellError, report_error};
use crate::external;
use crate::input::LineReader;
use crate::lexer;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Where command lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read from standard input, printing a prompt before each line.
    Interactive,
    /// Read from a script file, without a prompt.
    Batch(PathBuf),
}

/// A minimal read-eval loop over built-in and external commands.
///
/// The interpreter owns the process-wide [`Environment`] and the table of
/// built-ins. Each line is tokenized, offered to the built-ins and otherwise
/// launched as an external command, one at a time.
///
/// Example
/// ```
/// use msh::Interpreter;
/// use msh::command::{Control, Outcome};
/// let mut sh = Interpreter::default();
/// let outcome = sh.execute_line("   \n").unwrap();
/// assert_eq!(outcome, Outcome::Empty);
/// assert_eq!(sh.execute_line("quit").unwrap().control(), Control::Exit(0));
/// ```
pub struct Interpreter {
    env: Environment,
    config: ShellConfig,
    builtins: Vec<Box<dyn BuiltinFactory>>,
    commands_executed: usize,
}

impl Interpreter {
    /// Create an interpreter from explicit settings.
    pub fn with_config(config: ShellConfig) -> Self {
        Self {
            env: Environment::new(config.search_path.clone()),
            config,
            builtins: builtin::default_builtins(),
            commands_executed: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Number of non-empty command lines handled so far.
    pub fn commands_executed(&self) -> usize {
        self.commands_executed
    }

    /// Tokenize and run one command line.
    ///
    /// Blank lines are not dispatched at all. Errors are returned rather than
    /// reported; [`run`](Self::run) is what turns them into the generic message.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let tokens = lexer::split_into_tokens(line, self.config.max_tokens);
        if tokens.is_empty() {
            return Ok(Outcome::Empty);
        }
        trace!(%tokens, "tokenized");
        self.commands_executed += 1;

        if let Some(result) = builtin::dispatch(&self.builtins, &tokens, &mut self.env) {
            return result.map(Outcome::Builtin);
        }
        external::launch(tokens, &self.env).map(Outcome::External)
    }

    /// Run a whole session and return the exit code for the process.
    pub fn run(&mut self, mode: Mode) -> ExitCode {
        info!(?mode, "session started");
        let code = match &mode {
            Mode::Interactive => {
                let stdin = io::stdin().lock();
                self.run_loop(stdin, true)
            }
            Mode::Batch(path) => match File::open(path) {
                Ok(file) => self.run_loop(BufReader::new(file), false),
                Err(source) => {
                    let err = ShellError::BatchOpen {
                        path: path.clone(),
                        source,
                    };
                    debug!(error = %err, "startup failed");
                    report_error();
                    EXIT_FAILURE
                }
            },
        };
        info!(code, commands = self.commands_executed, "session finished");
        code
    }

    fn run_loop<R: BufRead>(&mut self, source: R, interactive: bool) -> ExitCode {
        let mut reader = LineReader::new(source, self.config.max_line_len);
        loop {
            if interactive {
                self.print_prompt();
            }
            let line = match reader.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => return self.end_of_input(interactive),
                Err(source) => {
                    let err = ShellError::Read(source);
                    debug!(error = %err, "input failed");
                    report_error();
                    return EXIT_FAILURE;
                }
            };

            match self.execute_line(&line) {
                Ok(outcome) => {
                    if let Control::Exit(code) = outcome.control() {
                        return code;
                    }
                }
                Err(err) => {
                    debug!(error = %err, fatal = err.is_fatal(), "command failed");
                    report_error();
                    if err.is_fatal() {
                        return EXIT_FAILURE;
                    }
                }
            }
        }
    }

    fn end_of_input(&self, interactive: bool) -> ExitCode {
        if interactive || self.commands_executed > 0 {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    fn print_prompt(&self) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(self.config.prompt.as_bytes());
        let _ = stdout.flush();
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default limits, prompt and search path.
    fn default() -> Self {
        Self::with_config(ShellConfig::default())
    }
}
