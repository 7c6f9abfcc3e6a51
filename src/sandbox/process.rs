//! Child-process runtime
//!
//! Each launch spawns the configured interpreter (`node -` by default),
//! feeds the program on stdin and relays stdout envelopes and stderr lines
//! back to the host. The child is killed when its [`Instance`] is dropped.

use super::envelope;
use super::runtime::{GuestMessage, Instance, IsolatedRuntime};
use crate::config::schema::SandboxConfig;
use crate::error::{ClassroomError, ClassroomResult};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Runs guests as interpreter child processes
pub struct ProcessRuntime {
    interpreter: String,
    args: Vec<String>,
}

impl ProcessRuntime {
    pub fn new(interpreter: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            args,
        }
    }

    pub fn from_config(config: &SandboxConfig) -> Self {
        Self::new(config.interpreter.clone(), config.args.clone())
    }

    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    fn spawn(&self) -> ClassroomResult<Child> {
        debug!("Spawning {} {:?}", self.interpreter, self.args);
        Command::new(&self.interpreter)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ClassroomError::InterpreterNotFound {
                    name: self.interpreter.clone(),
                },
                _ => ClassroomError::io(format!("spawning {}", self.interpreter), e),
            })
    }
}

#[async_trait]
impl IsolatedRuntime for ProcessRuntime {
    async fn launch(&self, program: String) -> ClassroomResult<Instance> {
        let mut child = self.spawn()?;
        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (Some(stdin), Some(stdout), Some(stderr)) = pipes else {
            return Err(ClassroomError::Internal(
                "child pipes not captured".to_string(),
            ));
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = tokio::spawn(async move {
            let feed = async move {
                let mut stdin = stdin;
                if let Err(e) = stdin.write_all(program.as_bytes()).await {
                    debug!("Guest closed stdin early: {}", e);
                }
                // Dropping stdin signals end of program
            };
            tokio::join!(feed, relay_output(stdout, stderr, &tx));

            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    debug!("Failed to wait for guest: {}", e);
                    None
                }
            };
            trace!("Guest exited with {:?}", code);
            let _ = tx.send(GuestMessage::Exited { code });
        });

        Ok(Instance::new(rx, Some(driver)))
    }

    fn runtime_name(&self) -> &'static str {
        "process"
    }
}

/// Forward stdout envelopes and stderr lines until both streams close
async fn relay_output(
    stdout: ChildStdout,
    stderr: ChildStderr,
    tx: &mpsc::UnboundedSender<GuestMessage>,
) {
    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    let mut stdout_done = false;
    let mut stderr_done = false;

    while !stdout_done || !stderr_done {
        tokio::select! {
            line = stdout_reader.next_line(), if !stdout_done => {
                match line {
                    Ok(Some(line)) => {
                        let _ = tx.send(envelope::parse_line(&line));
                    }
                    _ => stdout_done = true,
                }
            }
            line = stderr_reader.next_line(), if !stderr_done => {
                match line {
                    Ok(Some(line)) => {
                        let _ = tx.send(GuestMessage::Stderr(line));
                    }
                    _ => stderr_done = true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::LogLevel;

    fn shell() -> ProcessRuntime {
        ProcessRuntime::new("/bin/sh", vec![])
    }

    async fn drain(mut instance: Instance) -> Vec<GuestMessage> {
        let mut messages = Vec::new();
        while let Some(message) = instance.next().await {
            messages.push(message);
        }
        messages
    }

    #[tokio::test]
    async fn relays_envelopes_plain_output_and_stderr() {
        let program = r#"
echo '{"type":"console","method":"info","args":["ready",1]}'
echo plain text
echo oops 1>&2
echo '{"type":"done"}'
exit 3
"#;
        let messages = drain(shell().launch(program.to_string()).await.unwrap()).await;

        let stdout: Vec<_> = messages
            .iter()
            .filter(|m| !matches!(m, GuestMessage::Stderr(_) | GuestMessage::Exited { .. }))
            .cloned()
            .collect();
        assert_eq!(
            stdout,
            [
                GuestMessage::Console {
                    level: LogLevel::Info,
                    text: "ready 1".to_string()
                },
                GuestMessage::Output("plain text".to_string()),
                GuestMessage::Done,
            ]
        );
        assert!(messages.contains(&GuestMessage::Stderr("oops".to_string())));
        assert_eq!(messages.last(), Some(&GuestMessage::Exited { code: Some(3) }));
    }

    #[tokio::test]
    async fn missing_interpreter() {
        let runtime = ProcessRuntime::new("classroom-no-such-interpreter", vec![]);
        let err = runtime.launch(String::new()).await.err().unwrap();
        assert!(matches!(err, ClassroomError::InterpreterNotFound { .. }));
    }

    #[test]
    fn from_config_uses_node_by_default() {
        let runtime = ProcessRuntime::from_config(&SandboxConfig::default());
        assert_eq!(runtime.interpreter(), "node");
        assert_eq!(runtime.args, ["-"]);
    }
}
