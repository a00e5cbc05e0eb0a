use std::io::Write;
use std::os::unix::ffi::OsStrExt;

use crate::builtins::{BuiltinCommand, Outcome};

/// Prints the working directory byte for byte; names need not be UTF-8.
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Outcome {
        if !args.is_empty() {
            return Outcome::SyntaxError("syntax error: wrong number of arguments".into());
        }
        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => return Outcome::OsFailure(e.to_string()),
        };
        let written = out
            .write_all(cwd.as_os_str().as_bytes())
            .and_then(|()| out.write_all(b"\n"));
        match written {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::OsFailure(e.to_string()),
        }
    }
}
