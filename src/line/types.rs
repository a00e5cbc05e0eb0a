//! Types produced by the parser and consumed by the exec layer.

use std::os::fd::RawFd;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An ordered, owned sequence of commands making up one input line.
///
/// An empty input line is an empty vector; it runs nothing and reports 0.
pub type CommandLine = Vec<CommandNode>;

/// Operator linking a command to the one that follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlOp {
    /// `;` or end of line — wait, then continue unconditionally
    #[default]
    Sequential,
    /// `&&` — wait, continue only if this command succeeded
    And,
    /// `||` — wait, continue only if this command failed
    Or,
    /// `|` — stdout feeds the next command's stdin, don't wait
    Pipe,
    /// `&` — don't wait
    Background,
}

impl ControlOp {
    /// The operator's shell syntax.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlOp::Sequential => ";",
            ControlOp::And => "&&",
            ControlOp::Or => "||",
            ControlOp::Pipe => "|",
            ControlOp::Background => "&",
        }
    }

    /// Whether the runner hands the process to the reaper instead of waiting.
    pub fn is_detached(self) -> bool {
        matches!(self, ControlOp::Pipe | ControlOp::Background)
    }
}

/// A descriptor that can be redirected to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StdFd {
    Stdin = 0,
    Stdout = 1,
    Stderr = 2,
}

impl StdFd {
    /// The descriptor number.
    pub fn as_raw_fd(self) -> RawFd {
        self as RawFd
    }

    /// `None` for anything but 0, 1 or 2.
    pub fn from_raw_fd(fd: RawFd) -> Option<Self> {
        match fd {
            0 => Some(StdFd::Stdin),
            1 => Some(StdFd::Stdout),
            2 => Some(StdFd::Stderr),
            _ => None,
        }
    }
}

/// Per-command file redirections, indexed by target descriptor (0, 1, 2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Redirects {
    targets: [Option<PathBuf>; 3],
}

impl Redirects {
    /// Set the file redirected onto `fd`, replacing any earlier target.
    pub fn set(&mut self, fd: StdFd, path: impl Into<PathBuf>) {
        self.targets[fd as usize] = Some(path.into());
    }

    /// The file redirected onto `fd`, if any.
    pub fn get(&self, fd: RawFd) -> Option<&Path> {
        self.targets[StdFd::from_raw_fd(fd)? as usize].as_deref()
    }

    /// Redirections in ascending descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (RawFd, &Path)> {
        (0..).zip(self.targets.iter()).filter_map(|(fd, target)| Some((fd, target.as_deref()?)))
    }

    /// True when no descriptor is redirected.
    pub fn is_empty(&self) -> bool {
        self.targets.iter().all(Option::is_none)
    }
}

/// One parsed command plus its relationship to the next command.
///
/// A plain command has a non-empty `argv`. A subshell node carries its
/// nested line in `subshell` and usually has an empty `argv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNode {
    /// Program or builtin name followed by its arguments.
    #[serde(default)]
    pub argv: Vec<String>,

    /// How this command relates to the next one.
    #[serde(default)]
    pub op: ControlOp,

    #[serde(default, skip_serializing_if = "Redirects::is_empty")]
    pub redirects: Redirects,

    /// Nested line run in its own child process: `( ... )`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subshell: Option<CommandLine>,
}

impl CommandNode {
    /// A sequential command with the given argv.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Split `text` into words with POSIX shell quoting rules.
    ///
    /// Returns `None` for unbalanced quotes or blank input.
    pub fn from_words(text: &str) -> Option<Self> {
        let words = shlex::split(text)?;
        if words.is_empty() {
            return None;
        }
        Some(Self::new(words))
    }

    /// A subshell node wrapping `line`.
    pub fn subshell(line: CommandLine) -> Self {
        Self {
            subshell: Some(line),
            ..Self::default()
        }
    }

    /// Builder: set the control operator.
    pub fn with_op(mut self, op: ControlOp) -> Self {
        self.op = op;
        self
    }

    /// Builder: redirect `fd` to `path`.
    pub fn redirect(mut self, fd: StdFd, path: impl Into<PathBuf>) -> Self {
        self.redirects.set(fd, path);
        self
    }

    /// The program or builtin name, if this is a plain command.
    pub fn name(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// Arguments after the name.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    /// Shell-quoted rendering for log messages.
    pub fn display(&self) -> String {
        if self.subshell.is_some() {
            return "( ... )".into();
        }
        shlex::try_join(self.argv.iter().map(String::as_str)).unwrap_or_else(|_| self.argv.join(" "))
    }
}
