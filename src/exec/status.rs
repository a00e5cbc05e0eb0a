use nix::sys::wait::WaitStatus;

/// Shell-style status for a terminated child.
///
/// A normal exit reports its code; death by signal reports 128 + signal
/// number. Other states carry no status and yield `None`.
pub fn exit_status(status: WaitStatus) -> Option<i32> {
    match status {
        WaitStatus::Exited(_, code) => Some(code),
        WaitStatus::Signaled(_, signal, _) => Some(128 + signal as i32),
        _ => None,
    }
}

/// Collapse a nested line's status the way a subshell reports it.
pub fn subshell_status(inner: i32, failure_status: i32) -> i32 {
    if inner == 0 { 0 } else { failure_status }
}
