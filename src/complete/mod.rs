/// Completion module
///
/// The query engine over a loaded index and the line editor that drives it.

pub mod completer;
pub mod prompt;

pub use completer::{word_before_cursor, Completion, Completions, HistoryCompleter};
pub use prompt::{prompt_command, PromptHelper};
