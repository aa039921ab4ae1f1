//! External process execution
//!
//! Every container engine call goes through [`ProcessRunner`]. The system
//! implementation launches the program with a minimal environment and
//! streams its stdout and stderr, interleaved, into one output buffer.

use std::fmt;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::ProcessError;
use crate::ui;

/// Variables passed through from the parent environment to every child
pub const INHERITED_VARS: [&str; 3] = ["PATH", "TMP", "TEMP"];

/// A fully described external program call
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Child environment, in addition to [`INHERITED_VARS`]
    pub env: Vec<(String, String)>,
    /// Bytes written to the child's stdin; the null device when `None`
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I, env: &[(String, String)]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            env: env.to_vec(),
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    /// Program and arguments joined for display
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value of a child environment variable
    #[cfg(test)]
    pub fn env_var(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let env_names: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("Invocation")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("env", &env_names)
            .field("stdin", &self.stdin.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Runs external programs to completion
pub trait ProcessRunner {
    /// Run `invocation`, appending its stdout and stderr to `output`
    ///
    /// Succeeds only if the program exits with status zero.
    async fn run(&self, invocation: &Invocation, output: &mut Vec<u8>) -> Result<(), ProcessError>;
}

/// Runs programs on the host with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation, output: &mut Vec<u8>) -> Result<(), ProcessError> {
        let program = &invocation.program;
        output.extend_from_slice(ui::running_notice(program).as_bytes());

        let path = which::which(program).map_err(|source| ProcessError::NotFound {
            program: program.clone(),
            source,
        })?;
        debug!("Running {}", invocation.command_line());

        let mut cmd = Command::new(&path);
        cmd.args(&invocation.args)
            .env_clear()
            .envs(invocation.env.iter().map(|(k, v)| (k, v)))
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for name in INHERITED_VARS {
            cmd.env(name, std::env::var_os(name).unwrap_or_default());
        }

        let mut child = cmd.spawn().map_err(|source| ProcessError::StartFailed {
            program: program.clone(),
            source,
        })?;

        let io_error = |source: std::io::Error| ProcessError::Io {
            program: program.clone(),
            source,
        };

        if let (Some(data), Some(mut stdin)) = (&invocation.stdin, child.stdin.take()) {
            // Programs that exit without reading stdin close the pipe early
            if let Err(e) = stdin.write_all(data).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(io_error(e));
                }
            }
        }

        drain_output(&mut child, output).await.map_err(io_error)?;

        let status = child.wait().await.map_err(io_error)?;
        if !status.success() {
            return Err(ProcessError::NonZeroExit {
                program: program.clone(),
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Copy stdout and stderr into `output` as they produce data, until both close
async fn drain_output(child: &mut Child, output: &mut Vec<u8>) -> std::io::Result<()> {
    let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return Ok(());
    };

    let mut out_buf = [0u8; 8192];
    let mut err_buf = [0u8; 8192];
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read? {
                0 => out_open = false,
                n => output.extend_from_slice(&out_buf[..n]),
            },
            read = stderr.read(&mut err_buf), if err_open => match read? {
                0 => err_open = false,
                n => output.extend_from_slice(&err_buf[..n]),
            },
        }
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh", ["-c", script], &[])
    }

    fn text(output: &[u8]) -> String {
        String::from_utf8_lossy(output).into_owned()
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let mut output = Vec::new();
        SystemRunner
            .run(&sh("echo to-stdout; echo to-stderr >&2"), &mut output)
            .await
            .unwrap();

        let output = text(&output);
        assert!(output.contains("Running sh..."));
        assert!(output.contains("to-stdout"));
        assert!(output.contains("to-stderr"));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let mut output = Vec::new();
        let err = SystemRunner
            .run(&sh("echo failing; exit 3"), &mut output)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProcessError::NonZeroExit { code: Some(3), .. }
        ));
        assert!(text(&output).contains("failing"));
    }

    #[tokio::test]
    async fn test_program_not_found() {
        let mut output = Vec::new();
        let invocation = Invocation::new("definitely-not-a-real-binary-4711", ["x"], &[]);
        let err = SystemRunner.run(&invocation, &mut output).await.unwrap_err();

        assert!(matches!(err, ProcessError::NotFound { .. }));
        assert!(text(&output).contains("definitely-not-a-real-binary-4711"));
    }

    #[tokio::test]
    async fn test_environment_is_minimal() {
        let env = vec![("CONTAINERSSH_TAG".to_string(), "latest".to_string())];
        let invocation = Invocation::new("env", Vec::<String>::new(), &env);

        let mut output = Vec::new();
        SystemRunner.run(&invocation, &mut output).await.unwrap();

        let output = text(&output);
        let mut names: Vec<&str> = output
            .lines()
            .filter_map(|line| line.split_once('=').map(|(name, _)| name))
            .collect();
        names.sort_unstable();
        assert_eq!(names, vec!["CONTAINERSSH_TAG", "PATH", "TEMP", "TMP"]);
        assert!(output.contains("CONTAINERSSH_TAG=latest\n"));
    }

    #[tokio::test]
    async fn test_stdin_is_piped() {
        let invocation = Invocation::new("cat", Vec::<String>::new(), &[]).with_stdin("s3cret");

        let mut output = Vec::new();
        SystemRunner.run(&invocation, &mut output).await.unwrap();

        assert!(text(&output).ends_with("s3cret"));
    }

    #[test]
    fn test_debug_redacts_stdin() {
        let invocation = Invocation::new("docker", ["login"], &[]).with_stdin("s3cret");
        let debug = format!("{:?}", invocation);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
