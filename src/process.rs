//! Child process execution.
//!
//! Every process the bootstrapper starts (toolchain queries, the compiler,
//! the freshly built binary) goes through [`ProcessRunner`], so each stage
//! can be exercised against a scripted runner instead of the real system.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Port for spawning child processes. All calls block until the child exits.
pub trait ProcessRunner {
    /// Run `program` with stdout and stderr captured separately.
    fn run(&self, program: &Path, args: &[String]) -> io::Result<ProcessOutput>;

    /// Run `program` attached to the current standard streams and return its exit code.
    fn launch(&self, program: &Path, args: &[String]) -> io::Result<i32>;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every child in `dir` instead of the inherited working directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }

    fn command(&self, program: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> io::Result<ProcessOutput> {
        let output = self
            .command(program, args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ProcessOutput {
            exit_code: exit_code_of(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn launch(&self, program: &Path, args: &[String]) -> io::Result<i32> {
        let status = self.command(program, args).status()?;
        Ok(exit_code_of(status))
    }
}

/// Exit code of a finished child. Signal deaths map to `128 + signal` like a shell does.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Render a command line for display (verbose mode, dry runs).
pub fn display_command(program: &Path, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(quote(&program.to_string_lossy()));
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}
