use log::{debug, warn};
use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use crate::exec::status::exit_status;

/// Collects detached children (pipeline stages and background jobs).
///
/// Only pids handed over with [`Reaper::track`] are ever waited on, so the
/// reaper cannot steal the status of a child someone else is waiting for.
#[derive(Debug, Default)]
pub struct Reaper {
    detached: Vec<Pid>,
}

impl Reaper {
    pub fn track(&mut self, pid: Pid) {
        self.detached.push(pid);
    }

    /// Detached children not yet collected.
    pub fn pending(&self) -> usize {
        self.detached.len()
    }

    /// Reap every tracked child that has already terminated, without blocking.
    ///
    /// Children still running stay tracked for the next sweep. Returns the
    /// number of children reaped.
    pub fn sweep(&mut self) -> usize {
        let before = self.detached.len();
        self.detached.retain(|&pid| match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => true,
            Ok(status) => match exit_status(status) {
                Some(code) => {
                    debug!("reaped detached child {pid} (status {code})");
                    false
                }
                None => true,
            },
            Err(Errno::EINTR) => true,
            Err(Errno::ECHILD) => {
                debug!("detached child {pid} already collected");
                false
            }
            Err(e) => {
                warn!("waitpid({pid}): {e}");
                false
            }
        });
        before - self.detached.len()
    }
}
