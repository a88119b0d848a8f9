//! External command execution
//!
//! Every OS interaction goes through a [`CommandRunner`] so controllers can
//! be exercised without touching the real service manager.

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{truncate_message, ExitCode, PlatformError, Result};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments passed verbatim, no shell involved
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Build from a program and string-like arguments
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if terminated by a signal
    pub code: Option<i32>,
    /// Standard output, decoded lossily
    pub stdout: String,
    /// Standard error, decoded lossily
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stdout
    pub fn failed(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Error text for display: stderr, or stdout when stderr is empty.
    ///
    /// `sc.exe` reports failures on stdout.
    pub fn error_summary(&self) -> String {
        if self.stderr.trim().is_empty() {
            truncate_message(&self.stdout)
        } else {
            truncate_message(&self.stderr)
        }
    }

    /// Turn a non-zero exit into [`PlatformError::CommandFailed`]
    pub fn into_checked(self, spec: &CommandSpec) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(PlatformError::CommandFailed {
                command: spec.to_string(),
                code: ExitCode(self.code),
                message: self.error_summary(),
            })
        }
    }
}

/// Runs external commands
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and capture output.
    ///
    /// Only failure to start the process is an error; a non-zero exit is
    /// reported through [`CommandOutput::code`].
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        (**self).run(spec)
    }
}

/// [`CommandRunner`] backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        debug!("Running: {}", spec);

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // On Windows, create no window
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let output = cmd.output().map_err(|source| PlatformError::Spawn {
            command: spec.to_string(),
            source,
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !result.success() {
            debug!("`{}` exited with {:?}: {}", spec, result.code, result.error_summary());
        }
        Ok(result)
    }
}

/// Start a batch script in a new console window without waiting for it
#[cfg(windows)]
pub fn launch_in_console(script: &Path, working_dir: &Path) -> Result<u32> {
    use std::os::windows::process::CommandExt;
    const CREATE_NEW_CONSOLE: u32 = 0x00000010;

    let spec = CommandSpec::new("cmd", ["/C".to_string(), script.display().to_string()]);
    debug!("Launching: {}", spec);
    let child = Command::new(&spec.program)
        .args(&spec.args)
        .current_dir(working_dir)
        .creation_flags(CREATE_NEW_CONSOLE)
        .spawn()
        .map_err(|source| PlatformError::Spawn {
            command: spec.to_string(),
            source,
        })?;
    Ok(child.id())
}

/// Start a batch script in a new console window without waiting for it
#[cfg(not(windows))]
pub fn launch_in_console(script: &Path, _working_dir: &Path) -> Result<u32> {
    Err(PlatformError::Unsupported(format!(
        "cannot launch {} outside Windows",
        script.display()
    )))
}
