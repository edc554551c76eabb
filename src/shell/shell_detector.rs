/// Shell detection logic
///
/// Detects which shell the user is running and where that shell keeps its
/// history file.

use crate::error::{CmdwerkError, Result};
use crate::history::HistoryFormat;
use std::env;
use std::path::{Path, PathBuf};

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Get the shell name as a string
    pub fn name(&self) -> &str {
        match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }

    /// Parse a shell from the last component of a path like `/bin/zsh`
    pub fn from_program(program: &str) -> Option<Shell> {
        let name = program.rsplit('/').next().unwrap_or("").to_lowercase();
        match name.as_str() {
            "bash" => Some(Shell::Bash),
            "zsh" => Some(Shell::Zsh),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }

    /// Get the default history file for this shell, relative to `home`
    pub fn history_file_path(&self, home: &Path) -> PathBuf {
        match self {
            Shell::Bash => home.join(".bash_history"),
            Shell::Zsh => home.join(".zsh_history"),
            Shell::Fish => home.join(".local/share/fish/fish_history"),
        }
    }

    /// Line format of this shell's history file
    ///
    /// zsh writes `: <start>:<elapsed>;<command>` entries, bash writes the
    /// bare command. fish history is YAML and cannot be indexed.
    pub fn history_format(&self) -> Result<HistoryFormat> {
        match self {
            Shell::Zsh => Ok(HistoryFormat::Extended),
            Shell::Bash => Ok(HistoryFormat::Plain),
            Shell::Fish => Err(CmdwerkError::Config(
                "fish history is not supported; pass --history with a zsh or bash history file"
                    .to_string(),
            )),
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shell detector
pub struct ShellDetector;

impl ShellDetector {
    /// Detect the current shell from `$SHELL`
    ///
    /// # Returns
    /// * `Ok(Shell)` - The detected shell
    /// * `Err(CmdwerkError)` - If `$SHELL` is unset or names an unknown shell
    pub fn detect() -> Result<Shell> {
        let shell_path = env::var("SHELL").map_err(|_| {
            CmdwerkError::Config(
                "Could not detect shell. Please set $SHELL environment variable.".to_string(),
            )
        })?;

        Shell::from_program(&shell_path)
            .ok_or_else(|| CmdwerkError::Config(format!("Unsupported shell: {}", shell_path)))
    }
}
