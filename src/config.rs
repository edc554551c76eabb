/// Runtime configuration
///
/// Resolved once in `main` and passed down. Nothing reads these locations
/// from global state.

use crate::error::{CmdwerkError, Result};
use crate::history::HistoryFormat;
use crate::shell::{Shell, ShellDetector};
use std::env;
use std::path::{Path, PathBuf};

/// Overrides the data directory
pub const HOME_ENV: &str = "CMDWERK_HOME";
/// Standard shell variable naming the history file
pub const HISTFILE_ENV: &str = "HISTFILE";

const DATA_DIR_NAME: &str = ".cmdwerk";
const INDEX_FILE_NAME: &str = "history.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the persisted index lives
    pub data_dir: PathBuf,
    /// History log read by sync
    pub history_path: PathBuf,
    pub history_format: HistoryFormat,
}

impl Config {
    /// Resolve configuration from the environment
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            CmdwerkError::Config("Could not determine home directory".to_string())
        })?;

        let data_dir = match env::var(HOME_ENV) {
            Ok(dir) if !dir.is_empty() => expand_tilde(&dir, &home),
            _ => home.join(DATA_DIR_NAME),
        };

        let shell = ShellDetector::detect().ok();
        let (history_path, history_format) =
            default_history(shell, env::var(HISTFILE_ENV).ok().as_deref(), &home);

        Ok(Self {
            data_dir,
            history_path,
            history_format,
        })
    }

    /// Path of the persisted index
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE_NAME)
    }

    /// Replace the history file, guessing its format from the name
    pub fn with_history_path(mut self, path: PathBuf) -> Self {
        self.history_format = format_for_path(&path).unwrap_or(self.history_format);
        self.history_path = path;
        self
    }

    pub fn with_history_format(mut self, format: HistoryFormat) -> Self {
        self.history_format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(CmdwerkError::Config("data directory is required".to_string()));
        }

        if self.history_path.as_os_str().is_empty() {
            return Err(CmdwerkError::Config("history file is required".to_string()));
        }

        Ok(())
    }
}

/// Pick the history file and format
///
/// `$HISTFILE` wins, then the detected shell's default, then zsh.
fn default_history(
    shell: Option<Shell>,
    histfile: Option<&str>,
    home: &Path,
) -> (PathBuf, HistoryFormat) {
    let shell_format = shell
        .and_then(|s| s.history_format().ok())
        .unwrap_or(HistoryFormat::Extended);

    if let Some(file) = histfile.filter(|f| !f.is_empty()) {
        let path = expand_tilde(file, home);
        let format = format_for_path(&path).unwrap_or(shell_format);
        return (path, format);
    }

    match shell {
        Some(s) if s.history_format().is_ok() => (s.history_file_path(home), shell_format),
        _ => (Shell::Zsh.history_file_path(home), HistoryFormat::Extended),
    }
}

/// Format implied by well-known history file names
fn format_for_path(path: &Path) -> Option<HistoryFormat> {
    let name = path.file_name()?.to_str()?;
    if name.contains("zsh") {
        Some(HistoryFormat::Extended)
    } else if name.contains("bash") {
        Some(HistoryFormat::Plain)
    } else {
        None
    }
}

/// Expand a leading `~` to `home`
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/user")
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("~", &home()), home());
        assert_eq!(
            expand_tilde("~/.zsh_history", &home()),
            PathBuf::from("/home/user/.zsh_history")
        );
        assert_eq!(expand_tilde("/tmp/h", &home()), PathBuf::from("/tmp/h"));
        assert_eq!(expand_tilde("~other/h", &home()), PathBuf::from("~other/h"));
    }

    #[test]
    fn test_default_history_from_shell() {
        let (path, format) = default_history(Some(Shell::Bash), None, &home());
        assert_eq!(path, PathBuf::from("/home/user/.bash_history"));
        assert_eq!(format, HistoryFormat::Plain);
    }

    #[test]
    fn test_default_history_histfile_wins() {
        let (path, format) = default_history(Some(Shell::Bash), Some("~/.zsh_history"), &home());
        assert_eq!(path, PathBuf::from("/home/user/.zsh_history"));
        assert_eq!(format, HistoryFormat::Extended);
    }

    #[test]
    fn test_default_history_unknown_name_uses_shell_format() {
        let (path, format) = default_history(Some(Shell::Bash), Some("/tmp/hist"), &home());
        assert_eq!(path, PathBuf::from("/tmp/hist"));
        assert_eq!(format, HistoryFormat::Plain);
    }

    #[test]
    fn test_default_history_falls_back_to_zsh() {
        for shell in [None, Some(Shell::Fish)] {
            let (path, format) = default_history(shell, None, &home());
            assert_eq!(path, PathBuf::from("/home/user/.zsh_history"));
            assert_eq!(format, HistoryFormat::Extended);
        }
    }

    #[test]
    fn test_index_path() {
        let config = Config {
            data_dir: PathBuf::from("/home/user/.cmdwerk"),
            history_path: PathBuf::from("/home/user/.zsh_history"),
            history_format: HistoryFormat::Extended,
        };
        assert_eq!(config.index_path(), PathBuf::from("/home/user/.cmdwerk/history.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_history_path_guesses_format() {
        let config = Config {
            data_dir: PathBuf::from("/d"),
            history_path: PathBuf::from("/home/user/.zsh_history"),
            history_format: HistoryFormat::Extended,
        }
        .with_history_path(PathBuf::from("/home/user/.bash_history"));

        assert_eq!(config.history_format, HistoryFormat::Plain);

        let config = config.with_history_format(HistoryFormat::Extended);
        assert_eq!(config.history_format, HistoryFormat::Extended);
    }

    #[test]
    fn test_validate_rejects_empty_paths() {
        let config = Config {
            data_dir: PathBuf::new(),
            history_path: PathBuf::from("/h"),
            history_format: HistoryFormat::Extended,
        };
        assert!(config.validate().is_err());
    }
}
