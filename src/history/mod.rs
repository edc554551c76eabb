/// History module
///
/// Reads shell history logs and turns each command into indexable words.

pub mod reader;
pub mod tokenizer;

pub use reader::{load_history_file, read_history, HistoryFormat, HistoryLoad};
pub use tokenizer::{split, strip_control_chars, CommandTokens, PIPE_TOKEN};
