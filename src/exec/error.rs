use nix::errno::Errno;
use thiserror::Error;

/// Failure to launch or wait for a command, seen by the parent shell.
///
/// The runner records any of these as a nonzero status for the command.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A node with neither argv nor subshell.
    #[error("empty command")]
    EmptyCommand,

    /// A system call failed in the parent.
    #[error("{call}: {source}")]
    Sys {
        call: &'static str,
        #[source]
        source: Errno,
    },
}

impl ExecError {
    /// Adapter for `map_err` naming the failing call.
    pub fn sys(call: &'static str) -> impl FnOnce(Errno) -> ExecError {
        move |source| ExecError::Sys { call, source }
    }
}
