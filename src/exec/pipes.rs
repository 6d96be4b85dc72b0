// src/exec/pipes.rs

//! Pipes connecting the executor to the action process.
//!
//! Two pipes are created before anything is spawned:
//! - the input pipe, whose read end becomes the child's stdin;
//! - the dedicated output pipe, whose write end becomes descriptor
//!   [`OUTPUT_FD`] in the child. Responses travel here and never through
//!   stdout/stderr, which stay free-form logs.
//!
//! All ends are close-on-exec, so only the descriptors explicitly installed
//! in the child survive `exec`.

use std::io;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};

use nix::fcntl::OFlag;
use nix::libc;
use nix::unistd::pipe2;
use tokio::net::unix::pipe;

/// Descriptor number of the dedicated output channel inside the child.
pub const OUTPUT_FD: RawFd = 3;

pub(crate) struct ChannelPipes {
    /// Read end of the input pipe, handed to the child as stdin.
    pub child_stdin: OwnedFd,
    /// Write end of the output pipe, installed as [`OUTPUT_FD`] in the child.
    pub child_output: OwnedFd,
    pub input: pipe::Sender,
    pub output: pipe::Receiver,
}

/// Create both pipes and register the parent's ends with the Tokio reactor.
///
/// Must run inside a Tokio runtime.
pub(crate) fn open_channel_pipes() -> io::Result<ChannelPipes> {
    let (child_stdin, input) = pipe2(OFlag::O_CLOEXEC).map_err(io::Error::from)?;
    let (output, child_output) = pipe2(OFlag::O_CLOEXEC).map_err(io::Error::from)?;

    Ok(ChannelPipes {
        child_stdin,
        child_output,
        input: pipe::Sender::from_owned_fd(input)?,
        output: pipe::Receiver::from_owned_fd(output)?,
    })
}

/// Make `fd` available as [`OUTPUT_FD`] across `exec`.
///
/// Runs in the forked child before `exec`, so it only issues
/// async-signal-safe syscalls and does not allocate.
pub(crate) fn install_output_fd(fd: &OwnedFd) -> io::Result<()> {
    let raw = fd.as_raw_fd();
    // SAFETY: plain descriptor syscalls on a descriptor we own.
    let rc = if raw == OUTPUT_FD {
        // dup2 onto itself is a no-op and would keep FD_CLOEXEC set.
        unsafe { libc::fcntl(raw, libc::F_SETFD, 0) }
    } else {
        // The duplicate does not inherit FD_CLOEXEC.
        unsafe { libc::dup2(raw, OUTPUT_FD) }
    };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
