// Reads shell history logs into command strings
//
// Works on raw bytes so one badly encoded entry costs us that entry, not the whole file.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// How each logical history line is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryFormat {
    /// `<metadata>;<command>`, as zsh writes with EXTENDED_HISTORY
    Extended,
    /// The whole line is the command
    Plain,
}

impl HistoryFormat {
    pub fn name(&self) -> &str {
        match self {
            HistoryFormat::Extended => "extended",
            HistoryFormat::Plain => "plain",
        }
    }

    pub fn parse(value: &str) -> Option<HistoryFormat> {
        match value.to_lowercase().as_str() {
            "extended" | "zsh" => Some(HistoryFormat::Extended),
            "plain" | "bash" => Some(HistoryFormat::Plain),
            _ => None,
        }
    }

    /// Pull the command text out of one logical line
    pub fn extract_command(&self, logical_line: &str) -> String {
        match self {
            // Everything after the first ';', later semicolons stay in the command.
            HistoryFormat::Extended => match logical_line.split_once(';') {
                Some((_, command)) => command.to_string(),
                None => String::new(),
            },
            HistoryFormat::Plain => logical_line.to_string(),
        }
    }
}

impl std::fmt::Display for HistoryFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Commands read from a history log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLoad {
    /// Command texts in file order
    pub commands: Vec<String>,
    /// Lines skipped because they were not valid UTF-8
    pub loading_errors: usize,
}

/// Read the history file at `path`
///
/// # Returns
/// * `Ok(HistoryLoad)` - Commands plus the count of undecodable lines
/// * `Err(CmdwerkError)` - If the file cannot be opened or read
pub fn load_history_file<P: AsRef<Path>>(path: P, format: HistoryFormat) -> Result<HistoryLoad> {
    let path = path.as_ref();
    debug!(path = %path.display(), %format, "reading history file");

    let file = File::open(path)?;
    let load = read_history(BufReader::new(file), format)?;

    debug!(
        commands = load.commands.len(),
        loading_errors = load.loading_errors,
        "history file read"
    );
    Ok(load)
}

/// Read history entries from any buffered byte source
pub fn read_history<R: BufRead>(mut reader: R, format: HistoryFormat) -> Result<HistoryLoad> {
    let mut load = HistoryLoad::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let mut logical = match std::str::from_utf8(&buf) {
            Ok(line) => line.to_string(),
            Err(e) => {
                trace!(error = %e, "skipping undecodable history line");
                load.loading_errors += 1;
                continue;
            }
        };

        // A trailing backslash continues the entry on the next physical line.
        while is_continued(&logical) {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            logical.push_str(&decode_ignoring_errors(&buf));
        }

        load.commands.push(format.extract_command(logical.trim()));
    }

    Ok(load)
}

fn is_continued(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}

/// Decode bytes, dropping any invalid sequences
fn decode_ignoring_errors(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
