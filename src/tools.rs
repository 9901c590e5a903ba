use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use wait_timeout::ChildExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{program} is not installed or not on PATH")]
    Unavailable { program: String },

    #[error("{program} timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Runs external tools. Checks only talk to this trait, so tests can script tool output.
pub trait ToolRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ToolOutput, ToolError>;
}

/// Runs tools as child processes without a shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ToolOutput, ToolError> {
        tracing::debug!(program, ?args, cwd = %cwd.display(), "executing tool");
        let started = Instant::now();

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| spawn_error(program, source))?;

        // Drain both pipes while waiting so a chatty tool cannot block on a full pipe.
        let (tx, rx) = mpsc::channel();
        if let Some(pipe) = child.stdout.take() {
            drain(Pipe::Stdout, pipe, tx.clone());
        }
        if let Some(pipe) = child.stderr.take() {
            drain(Pipe::Stderr, pipe, tx.clone());
        }
        drop(tx);

        let waited = child.wait_timeout(timeout).map_err(|source| ToolError::Io {
            program: program.to_string(),
            source,
        })?;

        let status = match waited {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::debug!(program, ?timeout, "tool timed out");
                return Err(timed_out(program, timeout));
            }
        };

        // A background grandchild can keep the pipes open after the child exits.
        let mut output = ToolOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: String::new(),
            stderr: String::new(),
        };
        loop {
            match rx.recv_timeout(timeout.saturating_sub(started.elapsed())) {
                Ok((Pipe::Stdout, text)) => output.stdout = text,
                Ok((Pipe::Stderr, text)) => output.stderr = text,
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!(program, ?timeout, "tool output still open at deadline");
                    return Err(timed_out(program, timeout));
                }
            }
        }
        tracing::debug!(program, exit_code = output.exit_code, "tool finished");
        Ok(output)
    }
}

fn spawn_error(program: &str, source: io::Error) -> ToolError {
    if source.kind() == io::ErrorKind::NotFound {
        ToolError::Unavailable {
            program: program.to_string(),
        }
    } else {
        ToolError::Io {
            program: program.to_string(),
            source,
        }
    }
}

fn timed_out(program: &str, timeout: Duration) -> ToolError {
    ToolError::Timeout {
        program: program.to_string(),
        timeout,
    }
}

enum Pipe {
    Stdout,
    Stderr,
}

fn drain<R: Read + Send + 'static>(pipe: Pipe, mut reader: R, tx: Sender<(Pipe, String)>) {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = reader.read_to_end(&mut bytes);
        let _ = tx.send((pipe, String::from_utf8_lossy(&bytes).into_owned()));
    });
}
