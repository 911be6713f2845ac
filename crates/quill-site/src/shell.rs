//! Shell command execution for plugins.

use std::path::Path;
use std::process::{Command, Output};

/// Runs configured shell command lines.
///
/// Commands go through the platform shell so redirects and pipes in the
/// configuration work as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shell;

impl Shell {
    /// Create a shell runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run a command line in `cwd`, capturing its output.
    ///
    /// # Errors
    ///
    /// Returns an error when the shell itself cannot be spawned. A command
    /// exiting non-zero is reported through the status in the returned
    /// [`Output`], not as an error.
    pub fn run(&self, command: &str, cwd: &Path) -> std::io::Result<Output> {
        #[cfg(target_os = "windows")]
        {
            Command::new("cmd")
                .args(["/C", command])
                .current_dir(cwd)
                .output()
        }
        #[cfg(not(target_os = "windows"))]
        {
            Command::new("sh")
                .args(["-c", command])
                .current_dir(cwd)
                .output()
        }
    }
}
