pub mod error;
pub mod launch;
pub mod reaper;
pub mod redirect;
pub mod status;
pub mod stdio;

pub use error::ExecError;
pub use launch::{CarryFd, ProcessHandle, Scope, launch};
pub use reaper::Reaper;

use log::{debug, info};

use crate::builtins::FAILURE_STATUS;
use crate::config::{Config, ExecConfig};
use crate::line::{CommandNode, ControlOp};

/// Runs command lines: launches each node, then waits, detaches or
/// short-circuits according to its control operator.
///
/// The runner is single-threaded and keeps the list of detached children
/// across lines, so background jobs still running at the end of one line
/// are collected by a later sweep.
#[derive(Debug, Default)]
pub struct LineRunner {
    config: ExecConfig,
    reaper: Reaper,
    scope: Scope,
}

impl LineRunner {
    /// A shell-level runner with the built-in `[exec]` defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A shell-level runner using `config`.
    pub fn with_config(config: ExecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The runner of a forked `( ... )` child.
    pub(crate) fn in_subshell(config: ExecConfig) -> Self {
        Self {
            config,
            scope: Scope::Subshell,
            ..Self::default()
        }
    }

    /// Build a runner from the `[exec]` section of the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::with_config(config.exec)
    }

    /// Detached children that had not terminated at the last sweep.
    pub fn pending_detached(&self) -> usize {
        self.reaper.pending()
    }

    /// Run one line and return the status of its last waited command.
    ///
    /// - `;`: wait and continue.
    /// - `&&` / `||`: wait; stop the whole line unless the status
    ///   allows the next command to run.
    /// - `|` / `&`: don't wait; the status resets to 0.
    ///
    /// A launch failure counts as status 1. The line always ends with a
    /// non-blocking sweep of detached children, short-circuited or not.
    pub fn run(&mut self, line: &[CommandNode]) -> i32 {
        let mut status = 0;
        let mut carry = CarryFd::default();

        for node in line {
            let launched = launch::launch_in(self.scope, node, &mut carry, &self.config);

            if node.op.is_detached() {
                match launched {
                    Ok(handle) => self.reaper.track(handle.detach()),
                    Err(e) => stdio::report(format_args!("{e}")),
                }
                status = 0;
                continue;
            }

            status = match launched.and_then(ProcessHandle::wait) {
                Ok(code) => code,
                Err(e) => {
                    stdio::report(format_args!("{e}"));
                    FAILURE_STATUS
                }
            };

            let stop = match node.op {
                ControlOp::And => status != 0,
                ControlOp::Or => status == 0,
                _ => false,
            };
            if stop {
                debug!(
                    "`{}` {} short-circuits with status {status}",
                    node.display(),
                    node.op.as_str()
                );
                break;
            }
        }

        // A trailing `|` leaves a read end nobody consumes.
        drop(carry);

        let reaped = self.reaper.sweep();
        if reaped > 0 {
            debug!("reaped {reaped} detached child(ren)");
        }
        info!("line finished with status {status}");
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(words: &str, op: ControlOp) -> CommandNode {
        CommandNode::from_words(words).unwrap().with_op(op)
    }

    #[test]
    fn empty_line_reports_zero() {
        assert_eq!(LineRunner::new().run(&[]), 0);
    }

    #[test]
    fn sequential_reports_last_status() {
        let line = vec![
            node("sh -c 'exit 3'", ControlOp::Sequential),
            node("sh -c 'exit 4'", ControlOp::Sequential),
        ];
        assert_eq!(LineRunner::new().run(&line), 4);
    }

    #[test]
    fn and_stops_on_failure() {
        let line = vec![
            node("sh -c 'exit 2'", ControlOp::And),
            node("sh -c 'exit 9'", ControlOp::Sequential),
        ];
        assert_eq!(LineRunner::new().run(&line), 2);
    }

    #[test]
    fn or_stops_on_success() {
        let line = vec![
            node("true", ControlOp::Or),
            node("sh -c 'exit 9'", ControlOp::Sequential),
        ];
        assert_eq!(LineRunner::new().run(&line), 0);
    }

    #[test]
    fn line_ending_on_detached_node_reports_zero() {
        let line = vec![
            node("false", ControlOp::Sequential),
            node("false", ControlOp::Background),
        ];
        assert_eq!(LineRunner::new().run(&line), 0);
    }

    #[test]
    fn launch_failure_counts_as_nonzero() {
        let line = vec![
            CommandNode::default().with_op(ControlOp::And),
            node("sh -c 'exit 9'", ControlOp::Sequential),
        ];
        assert_eq!(LineRunner::new().run(&line), FAILURE_STATUS);
    }

    #[test]
    fn config_statuses_are_used() {
        let mut runner = LineRunner::with_config(ExecConfig {
            exec_failure_status: 99,
            subshell_failure_status: 42,
        });
        assert_eq!(runner.run(&[node("tuxsh-no-such-program-xyz", ControlOp::Sequential)]), 99);
        assert_eq!(runner.run(&[CommandNode::subshell(vec![node("false", ControlOp::Sequential)])]), 42);
    }
}
