//! Builtin commands: implemented inside the shell instead of exec'd.
//!
//! Every builtin runs twice for a foreground command: once in the forked
//! child, which reports output and errors and then exits with the mapped
//! status, and once in the long-lived parent, silently, so that effects such
//! as a directory change or `exit` outlive the child.

/// `cd`: change the working directory, with `~` / `$HOME` prefix expansion.
pub mod cd;
/// `exit`: terminate with a status.
pub mod exit;
/// `help`: fixed usage summary.
pub mod help;
/// `pwd` / `our_pwd`: print the working directory.
pub mod pwd;

use std::io::{self, Write};

/// Child status for a builtin syntax error or failed operation.
pub const FAILURE_STATUS: i32 = 1;

/// Result of executing a builtin once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Wrong usage; nothing was attempted.
    SyntaxError(String),
    /// The attempted operation failed.
    OsFailure(String),
    /// The running process must terminate with this status.
    Exit(i32),
}

/// Behavior of one builtin, with one entry point per execution context.
pub trait BuiltinCommand {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Execute with `args` (argv without the name), writing normal output to `out`.
    fn execute(&self, args: &[String], out: &mut dyn Write) -> Outcome;

    /// Run inside a child that exits afterwards; returns its exit status.
    ///
    /// Errors are reported on `err` prefixed by the builtin name.
    fn run_in_child(&self, args: &[String], out: &mut dyn Write, err: &mut dyn Write) -> i32 {
        match self.execute(args, out) {
            Outcome::Success => 0,
            Outcome::Exit(code) => code,
            Outcome::SyntaxError(msg) | Outcome::OsFailure(msg) => {
                let _ = writeln!(err, "{}: {msg}", self.name());
                FAILURE_STATUS
            }
        }
    }

    /// Run inside the process that owns the line, silently.
    ///
    /// Output is discarded because the child already produced it. An
    /// [`Outcome::Exit`] is handed back; terminating is up to the caller,
    /// which knows whether it is the shell or a subshell child.
    fn run_in_parent(&self, args: &[String]) -> Outcome {
        self.execute(args, &mut io::sink())
    }
}

/// The set of builtins, resolved once from a command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
    Pwd,
    Help,
}

impl Builtin {
    /// Look up a builtin by command name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cd" => Some(Builtin::Cd),
            "exit" => Some(Builtin::Exit),
            "pwd" | "our_pwd" => Some(Builtin::Pwd),
            "help" => Some(Builtin::Help),
            _ => None,
        }
    }

    fn command(self) -> &'static dyn BuiltinCommand {
        match self {
            Builtin::Cd => &cd::Cd,
            Builtin::Exit => &exit::Exit,
            Builtin::Pwd => &pwd::Pwd,
            Builtin::Help => &help::Help,
        }
    }
}

impl BuiltinCommand for Builtin {
    fn name(&self) -> &'static str {
        self.command().name()
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Outcome {
        self.command().execute(args, out)
    }
}

#[cfg(test)]
pub(crate) fn args(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
