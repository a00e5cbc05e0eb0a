use std::borrow::Cow;
use std::io::Write;

use crate::builtins::{BuiltinCommand, Outcome};

/// `cd DIR`: changes the working directory of whichever process runs it.
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, args: &[String], _out: &mut dyn Write) -> Outcome {
        let [dir] = args else {
            return Outcome::SyntaxError("syntax error: wrong number of arguments".into());
        };
        let home = std::env::var("HOME").ok();
        let target = match expand_home(dir, home.as_deref()) {
            Ok(target) => target,
            Err(outcome) => return outcome,
        };
        match std::env::set_current_dir(target.as_ref()) {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::OsFailure(format!("{target}: {e}")),
        }
    }
}

/// Replace a leading `~` or literal `$HOME` with `home`.
///
/// Only the prefix is substituted; the rest of the argument is kept verbatim,
/// so `~x` becomes `<home>x`. Arguments without either prefix are borrowed.
pub fn expand_home<'a>(arg: &'a str, home: Option<&str>) -> Result<Cow<'a, str>, Outcome> {
    let Some(rest) = arg.strip_prefix('~').or_else(|| arg.strip_prefix("$HOME")) else {
        return Ok(Cow::Borrowed(arg));
    };
    match home {
        Some(home) => Ok(Cow::Owned(format!("{home}{rest}"))),
        None => Err(Outcome::SyntaxError("HOME not set".into())),
    }
}
