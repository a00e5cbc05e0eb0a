use std::io::Write;

use crate::builtins::{BuiltinCommand, Outcome};

/// Usage summary printed by `help`.
pub const HELP_TEXT: &str = "\
tuxsh - a small Unix shell.
These commands are defined internally. Type 'help' to see this list.
help       print this help message
cd DIR     change the working directory to DIR; a leading ~ or $HOME expands to your home
exit [N]   exit the shell with status N (default 0)
pwd        print the current working directory (also: our_pwd)
";

/// `help`: prints [`HELP_TEXT`].
pub struct Help;

impl BuiltinCommand for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn execute(&self, _args: &[String], out: &mut dyn Write) -> Outcome {
        match out.write_all(HELP_TEXT.as_bytes()) {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::OsFailure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::args;

    #[test]
    fn lists_every_builtin() {
        let mut out = Vec::new();
        assert_eq!(Help.execute(&[], &mut out), Outcome::Success);
        let text = String::from_utf8(out).unwrap();
        for name in ["help", "cd", "exit", "pwd"] {
            assert!(
                text.lines().any(|l| l.starts_with(name)),
                "missing {name} in help"
            );
        }
    }

    #[test]
    fn arguments_are_ignored() {
        let mut out = Vec::new();
        assert_eq!(Help.execute(&args(&["cd"]), &mut out), Outcome::Success);
        assert_eq!(out, HELP_TEXT.as_bytes());
    }
}
