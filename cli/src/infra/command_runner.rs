//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs a program from an argument vector, waits for it
//! under a timeout, and kills it if the timeout fires.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::ChildStdout;

use crate::application::ports::{Capture, CommandOutcome, CommandRunner};
use crate::domain::CommandError;

/// Production `CommandRunner` backed by `tokio::process`.
///
/// stdin is closed so an interactive prompt reads EOF instead of hanging,
/// and stderr is discarded.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        capture: Capture,
    ) -> Result<CommandOutcome, CommandError> {
        tracing::trace!(program, ?args, "spawning");
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdout = child.stdout.take();

        // Drain stdout concurrently with wait() so a chatty child never
        // blocks on a full pipe.
        tokio::select! {
            result = async {
                let (status, first_line) = tokio::join!(child.wait(), drain(stdout, capture));
                let status = status.map_err(|source| CommandError::Spawn {
                    program: program.to_string(),
                    source,
                })?;
                let exit_code = status
                    .code()
                    .filter(|code| *code >= 0)
                    .ok_or_else(|| CommandError::NoExitCode {
                        program: program.to_string(),
                    })?;
                tracing::trace!(program, exit_code, "finished");
                Ok(CommandOutcome { exit_code, first_line })
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                Err(CommandError::TimedOut {
                    program: program.to_string(),
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

/// Read stdout to the end, keeping only the first line when asked.
async fn drain(stdout: Option<ChildStdout>, capture: Capture) -> Option<String> {
    let mut buf = Vec::new();
    if let Some(mut handle) = stdout {
        let _ = handle.read_to_end(&mut buf).await;
    }
    match capture {
        Capture::Discard => None,
        Capture::FirstLine => Some(first_line(&buf)),
    }
}

fn first_line(buf: &[u8]) -> String {
    let text = String::from_utf8_lossy(buf);
    text.split('\n').next().unwrap_or_default().to_string()
}
