use crate::command::{Control, EXIT_SUCCESS, as_positionals};
use crate::env::Environment;
use crate::error::ShellError;
use crate::lexer::TokenSequence;
use argh::{EarlyExit, FromArgs};
use std::marker::PhantomData;
use std::path::Path;
use tracing::debug;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in the interpreter's own process; they never fork.
pub trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit" or "cd".
    fn name() -> &'static str;

    /// Executes the command against the process-wide environment.
    fn execute(self, env: &mut Environment) -> Result<Control, ShellError>;
}

/// Object-safe handle that recognizes one built-in by name and runs it.
pub trait BuiltinFactory {
    /// Run the built-in if `name` is ours, otherwise return `None`.
    fn try_run(
        &self,
        name: &str,
        args: &[&str],
        env: &mut Environment,
    ) -> Option<Result<Control, ShellError>>;
}

/// Factory for a [`BuiltinCommand`] type.
pub struct Factory<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand> BuiltinFactory for Factory<T> {
    fn try_run(
        &self,
        name: &str,
        args: &[&str],
        env: &mut Environment,
    ) -> Option<Result<Control, ShellError>> {
        if name != T::name() {
            return None;
        }
        Some(match T::from_args(&[name], &as_positionals(args)) {
            Ok(cmd) => cmd.execute(env),
            Err(EarlyExit { .. }) => Err(ShellError::Usage { command: T::name() }),
        })
    }
}

/// The built-ins every interpreter starts with: `exit`, `quit` and `cd`.
pub fn default_builtins() -> Vec<Box<dyn BuiltinFactory>> {
    vec![
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Quit>::default()),
        Box::new(Factory::<Cd>::default()),
    ]
}

/// Run `tokens` as a built-in if its name matches one of `builtins`.
///
/// Returns `None` when the command is not a built-in and should be launched
/// externally instead.
pub fn dispatch(
    builtins: &[Box<dyn BuiltinFactory>],
    tokens: &TokenSequence,
    env: &mut Environment,
) -> Option<Result<Control, ShellError>> {
    let name = tokens.name()?;
    let args: Vec<&str> = tokens.args().iter().map(String::as_str).collect();
    let result = builtins
        .iter()
        .find_map(|builtin| builtin.try_run(name, &args, env))?;
    debug!(name, ?result, "builtin finished");
    Some(result)
}

#[derive(FromArgs)]
/// Exit the shell. Takes no arguments.
pub struct Exit {}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _env: &mut Environment) -> Result<Control, ShellError> {
        Ok(Control::Exit(EXIT_SUCCESS))
    }
}

#[derive(FromArgs)]
/// Exit the shell. Takes no arguments.
pub struct Quit {}

impl BuiltinCommand for Quit {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(self, _env: &mut Environment) -> Result<Control, ShellError> {
        Ok(Control::Exit(EXIT_SUCCESS))
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, env: &mut Environment) -> Result<Control, ShellError> {
        let path = Path::new(&self.target);
        env.change_dir(path)
            .map_err(|source| ShellError::ChangeDir {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Control::Continue)
    }
}
