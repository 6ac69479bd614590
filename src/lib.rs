//! A minimal command interpreter.
//!
//! `msh` reads command lines either interactively or from a batch file, splits
//! them into whitespace-separated tokens, runs the built-ins `exit`, `quit` and
//! `cd` in-process and launches everything else as a child process, optionally
//! sending its output to a file with a trailing `> file`.
//!
//! The main entry point is [`Interpreter`]. Lower-level pieces are public so the
//! pipeline can be driven one stage at a time:
//! [`lexer`] → [`builtin`] → [`redirect`] → [`external`].

pub mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
mod input;
mod interpreter;
pub mod lexer;
pub mod redirect;

/// Convenient re-export of the read-eval loop.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::{Interpreter, Mode};
