//! Process launcher: one fork per command node.
//!
//! The parent wires the pipe carry-over and, for a foreground builtin,
//! repeats the builtin in its own context. The child wires its descriptors,
//! applies redirections and then becomes the command: a nested line, a
//! builtin, or an exec'd program.

use std::ffi::{CString, NulError};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, OwnedFd};

use log::debug;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::waitpid;
use nix::unistd::{ForkResult, Pid, dup2, execvp, fork, pipe2};

use crate::builtins::{Builtin, BuiltinCommand, FAILURE_STATUS, Outcome};
use crate::config::ExecConfig;
use crate::exec::error::ExecError;
use crate::exec::status::{exit_status, subshell_status};
use crate::exec::stdio::{self, STDERR, STDIN, STDOUT};
use crate::exec::{LineRunner, redirect};
use crate::line::{CommandLine, CommandNode, ControlOp};

/// Read end of the previous pipeline stage, if any.
///
/// Empty means "no predecessor": the next command reads the shell's stdin.
/// Each launch takes the descriptor exactly once, handing it to the child
/// and closing the parent's copy.
#[derive(Debug, Default)]
pub struct CarryFd(Option<OwnedFd>);

impl CarryFd {
    /// Take the pending read end, leaving the carry empty.
    pub fn take(&mut self) -> Option<OwnedFd> {
        self.0.take()
    }

    /// Whether a read end is waiting for the next stage.
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    fn hand_over(&mut self, read_end: OwnedFd) {
        debug_assert!(self.0.is_none(), "previous read end was not consumed");
        self.0 = Some(read_end);
    }
}

/// A launched child. Must be either waited for or detached.
#[derive(Debug)]
#[must_use = "a launched process must be waited for or detached"]
pub struct ProcessHandle {
    pid: Pid,
}

impl ProcessHandle {
    /// Block until the child terminates and return its shell status.
    pub fn wait(self) -> Result<i32, ExecError> {
        loop {
            match waitpid(self.pid, None) {
                Ok(status) => {
                    if let Some(code) = exit_status(status) {
                        debug!("child {} exited with status {code}", self.pid);
                        return Ok(code);
                    }
                }
                Err(Errno::EINTR) => {}
                Err(e) => return Err(ExecError::sys("waitpid")(e)),
            }
        }
    }

    /// Give up waiting; the caller becomes responsible for reaping `pid`.
    pub fn detach(self) -> Pid {
        self.pid
    }
}

/// The process a line runs in.
///
/// `exit` in a foreground position ends that process: the shell itself at
/// the top level, or the forked child running a `( ... )` line. In the
/// latter case the child leaves with the `exit` status as is, bypassing
/// the 0/5 collapse of a subshell that runs to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Shell,
    Subshell,
}

/// What the child turns into, resolved before forking.
enum Program<'a> {
    Subshell(&'a CommandLine),
    Builtin(Builtin),
    External(Result<Vec<CString>, NulError>),
}

impl<'a> Program<'a> {
    fn resolve(node: &'a CommandNode) -> Result<Self, ExecError> {
        if let Some(line) = &node.subshell {
            return Ok(Program::Subshell(line));
        }
        let name = node.name().ok_or(ExecError::EmptyCommand)?;
        if let Some(builtin) = Builtin::from_name(name) {
            return Ok(Program::Builtin(builtin));
        }
        let argv = node.argv.iter().map(|arg| CString::new(arg.as_bytes())).collect();
        Ok(Program::External(argv))
    }
}

/// Fork a child running `node`, consuming the carry-over read end.
///
/// For a [`ControlOp::Pipe`] node a new pipe is created; its write end
/// becomes the child's stdout and its read end is left in `carry` for the
/// next stage. Explicit redirections are applied after the pipe wiring and
/// win over it.
pub fn launch(
    node: &CommandNode,
    carry: &mut CarryFd,
    config: &ExecConfig,
) -> Result<ProcessHandle, ExecError> {
    launch_in(Scope::Shell, node, carry, config)
}

/// [`launch`] on behalf of a runner living in `scope`.
pub(crate) fn launch_in(
    scope: Scope,
    node: &CommandNode,
    carry: &mut CarryFd,
    config: &ExecConfig,
) -> Result<ProcessHandle, ExecError> {
    let input = carry.take();
    let piped_input = input.is_some();
    let program = Program::resolve(node)?;
    let pipe = if node.op == ControlOp::Pipe {
        Some(cloexec_pipe()?)
    } else {
        None
    };

    debug!("launching `{}` {}", node.display(), node.op.as_str());

    // SAFETY: the child only rewires descriptors, runs the command and
    // leaves through `_exit`; it never returns into the caller.
    match unsafe { fork() }.map_err(ExecError::sys("fork"))? {
        ForkResult::Child => run_child(node, &program, pipe, input, config),
        ForkResult::Parent { child } => {
            drop(input);
            if let Some((read_end, write_end)) = pipe {
                drop(write_end);
                carry.hand_over(read_end);
            }
            // Only an unpiped foreground builtin may change the shell itself.
            if let Program::Builtin(builtin) = program
                && !node.op.is_detached()
                && !piped_input
            {
                run_builtin_in_parent(builtin, node, scope);
            }
            Ok(ProcessHandle { pid: child })
        }
    }
}

fn run_builtin_in_parent(builtin: Builtin, node: &CommandNode, scope: Scope) {
    match builtin.run_in_parent(node.args()) {
        Outcome::Success => debug!("{}: applied to shell", builtin.name()),
        Outcome::SyntaxError(msg) | Outcome::OsFailure(msg) => {
            debug!("{}: not applied to shell: {msg}", builtin.name())
        }
        Outcome::Exit(code) => match scope {
            Scope::Shell => {
                debug!("{}: terminating shell with status {code}", builtin.name());
                let _ = io::stdout().flush();
                std::process::exit(code)
            }
            // A forked child: skip the exit machinery inherited from the shell.
            Scope::Subshell => terminate(code),
        },
    }
}

/// A pipe created close-on-exec in one step, so no concurrent fork ever
/// inherits an unflagged end; `dup2` onto stdin/stdout clears the flag on
/// the copy that matters.
fn cloexec_pipe() -> Result<(OwnedFd, OwnedFd), ExecError> {
    pipe2(OFlag::O_CLOEXEC).map_err(ExecError::sys("pipe2"))
}

fn run_child(
    node: &CommandNode,
    program: &Program<'_>,
    pipe: Option<(OwnedFd, OwnedFd)>,
    input: Option<OwnedFd>,
    config: &ExecConfig,
) -> ! {
    if let Some((read_end, write_end)) = pipe {
        if let Err(e) = dup2(write_end.as_raw_fd(), STDOUT) {
            stdio::report(format_args!("dup2: {e}"));
            terminate(FAILURE_STATUS);
        }
        drop(read_end);
        drop(write_end);
    }
    if let Some(input) = input {
        if let Err(e) = dup2(input.as_raw_fd(), STDIN) {
            stdio::report(format_args!("dup2: {e}"));
            terminate(FAILURE_STATUS);
        }
        drop(input);
    }

    redirect::apply_or_abort(&node.redirects);

    let status = match program {
        Program::Subshell(line) => {
            let inner = LineRunner::in_subshell(*config).run(line);
            subshell_status(inner, config.subshell_failure_status)
        }
        Program::Builtin(builtin) => {
            let mut out = stdio::stream(STDOUT);
            let mut err = stdio::stream(STDERR);
            builtin.run_in_child(node.args(), &mut *out, &mut *err)
        }
        Program::External(argv) => {
            let name = node.name().unwrap_or_default();
            match argv {
                Ok(argv) => {
                    let Err(e) = execvp(&argv[0], argv.as_slice());
                    stdio::report(format_args!("{name}: {}", e.desc()));
                }
                Err(e) => stdio::report(format_args!("{name}: {e}")),
            }
            config.exec_failure_status
        }
    };
    terminate(status)
}

/// Leave the child immediately, skipping destructors and exit handlers
/// inherited from the parent's image.
fn terminate(status: i32) -> ! {
    // SAFETY: `_exit` is async-signal-safe and takes no pointers.
    unsafe { nix::libc::_exit(status) }
}
