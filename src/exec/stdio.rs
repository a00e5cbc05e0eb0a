//! Unbuffered handles on the standard descriptors, for use in a forked child.
//!
//! After `fork` the child must not touch the buffered `std::io` globals: a
//! lock held by another thread of the parent at fork time is never released
//! in the child, and a test harness may have captured them.

use std::fs::File;
use std::io::Write;
use std::mem::ManuallyDrop;
use std::os::fd::{FromRawFd, RawFd};

pub const STDIN: RawFd = 0;
pub const STDOUT: RawFd = 1;
pub const STDERR: RawFd = 2;

/// Borrow `fd` as a `File` without taking ownership; dropping never closes it.
pub fn stream(fd: RawFd) -> ManuallyDrop<File> {
    // SAFETY: the File is never dropped, so `fd` is never closed through it.
    ManuallyDrop::new(unsafe { File::from_raw_fd(fd) })
}

/// Write one diagnostic line to the child's stderr.
pub fn report(message: std::fmt::Arguments<'_>) {
    let mut err = stream(STDERR);
    let _ = writeln!(*err, "tuxsh: {message}");
}
