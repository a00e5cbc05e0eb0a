use std::io::Write;

use crate::builtins::{BuiltinCommand, Outcome};

/// Status for `exit` with a non-numeric argument.
pub const NON_NUMERIC_STATUS: i32 = 2;

/// `exit [N]`: asks the running process to terminate.
pub struct Exit;

impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn execute(&self, args: &[String], _out: &mut dyn Write) -> Outcome {
        match args {
            [] => Outcome::Exit(0),
            [code] => Outcome::Exit(parse_status(code).unwrap_or(NON_NUMERIC_STATUS)),
            _ => Outcome::SyntaxError("syntax error: wrong number of arguments".into()),
        }
    }
}

/// Parse an all-digit argument into a status, modulo 256.
fn parse_status(arg: &str) -> Option<i32> {
    if arg.is_empty() {
        return None;
    }
    arg.bytes().try_fold(0i32, |acc, b| {
        b.is_ascii_digit()
            .then(|| (acc * 10 + i32::from(b - b'0')) % 256)
    })
}
