use std::os::fd::RawFd;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};
use thiserror::Error;

use crate::exec::stdio::{self, STDIN};
use crate::line::Redirects;

#[derive(Debug, Error)]
#[error("{}: {call}: {source}", .path.display())]
pub struct RedirectError {
    pub path: PathBuf,
    pub call: &'static str,
    #[source]
    pub source: Errno,
}

/// Apply `redirects` to the calling process, or abort it.
///
/// Only ever called in a forked child: a failed redirection kills that
/// child with SIGABRT and never reaches the shell.
pub fn apply_or_abort(redirects: &Redirects) {
    if let Err(e) = apply(redirects) {
        stdio::report(format_args!("{e}"));
        std::process::abort();
    }
}

/// Open each target and move it onto its descriptor, in ascending order.
pub fn apply(redirects: &Redirects) -> Result<(), RedirectError> {
    for (fd, path) in redirects.iter() {
        let opened = open_target(fd, path)?;
        if opened == fd {
            continue;
        }
        let fail = |call: &'static str| move |source: Errno| RedirectError {
            path: path.to_path_buf(),
            call,
            source,
        };
        dup2(opened, fd).map_err(fail("dup2"))?;
        close(opened).map_err(fail("close"))?;
    }
    Ok(())
}

/// Open `path` the way descriptor `fd` expects it.
///
/// stdin opens an existing file read-only; stdout and stderr create or
/// truncate with mode 0666 (before umask).
pub fn open_target(fd: RawFd, path: &Path) -> Result<RawFd, RedirectError> {
    let (flags, mode) = if fd == STDIN {
        (OFlag::O_RDONLY, Mode::empty())
    } else {
        (
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            Mode::from_bits_truncate(0o666),
        )
    };
    open(path, flags, mode).map_err(|source| RedirectError {
        path: path.to_path_buf(),
        call: "open",
        source,
    })
}
