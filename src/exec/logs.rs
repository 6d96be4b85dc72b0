// src/exec/logs.rs

//! Log sinks shared between the action process and the executor.
//!
//! The child's stdout/stderr are wired straight into these files; the
//! executor only ever appends the output guard after an interaction. Both
//! sides write through the same open file description, so a guard written
//! after the response was read lands after everything the child logged
//! before responding. Nothing stronger is promised: the child and the
//! executor must not write to a sink at the same time.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::AsFd;
use std::path::Path;
use std::process::Stdio;

/// Line appended to both sinks after every interaction, so that log
/// collectors can split the stream per activation.
pub const OUTPUT_GUARD: &str = "XXX_THE_END_OF_A_WHISK_ACTIVATION_XXX\n";

/// The two writable log sinks handed to an [`Executor`](super::Executor).
#[derive(Debug)]
pub struct LogSinks {
    stdout: File,
    stderr: File,
}

impl LogSinks {
    pub fn new(stdout: File, stderr: File) -> Self {
        Self { stdout, stderr }
    }

    /// Open (creating if needed) two files in append mode.
    pub fn open(stdout: impl AsRef<Path>, stderr: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(open_append(stdout)?, open_append(stderr)?))
    }

    /// Send both action streams to a duplicate of this process's stderr.
    pub fn inherit_stderr() -> io::Result<Self> {
        let err = File::from(io::stderr().as_fd().try_clone_to_owned()?);
        let out = err.try_clone()?;
        Ok(Self::new(out, err))
    }

    /// Fresh handles for the child's stdout and stderr.
    pub(crate) fn child_stdio(&self) -> io::Result<(Stdio, Stdio)> {
        Ok((
            Stdio::from(self.stdout.try_clone()?),
            Stdio::from(self.stderr.try_clone()?),
        ))
    }

    /// Append [`OUTPUT_GUARD`] to stdout and then stderr.
    ///
    /// Both writes are attempted; the first error is returned.
    pub fn write_guard(&mut self) -> io::Result<()> {
        let out = write_guard_to(&mut self.stdout);
        let err = write_guard_to(&mut self.stderr);
        out.and(err)
    }
}

fn open_append(path: impl AsRef<Path>) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn write_guard_to(file: &mut File) -> io::Result<()> {
    file.write_all(OUTPUT_GUARD.as_bytes())?;
    file.flush()
}
