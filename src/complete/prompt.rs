// Interactive prompt backed by the history completer
//
// Blocking. Run it on a blocking thread when inside the async runtime.

use crate::complete::{word_before_cursor, HistoryCompleter};
use crate::error::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::debug;

/// Typing this alone leaves the prompt
pub const QUIT_COMMAND: &str = "q";

const PROMPT: &str = "> ";

/// Line editor helper that completes from history
pub struct PromptHelper {
    completer: HistoryCompleter,
}

impl PromptHelper {
    pub fn new(completer: HistoryCompleter) -> Self {
        Self { completer }
    }

    /// Candidates for `line` with the cursor at byte `pos`
    ///
    /// Returns the byte offset the replacement starts at, like rustyline expects.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let fragment = word_before_cursor(line, pos);
        let start = pos.min(line.len()) - fragment.len();

        let mut pairs: Vec<Pair> = self
            .completer
            .complete(line, fragment)
            .map(|completion| Pair {
                display: completion.text.to_string(),
                replacement: completion.text.to_string(),
            })
            .collect();
        // Sets have no order, keep the listing stable for the eye.
        pairs.sort_by(|a, b| a.display.cmp(&b.display));

        (start, pairs)
    }
}

impl Completer for PromptHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for PromptHelper {
    type Hint = String;
}

impl Highlighter for PromptHelper {}

impl Validator for PromptHelper {}

impl Helper for PromptHelper {}

/// Ask for one command line with history completion
///
/// # Returns
/// * `Ok(Some(line))` - The command the user accepted
/// * `Ok(None)` - The user quit (`q`, empty line, Ctrl-C or Ctrl-D)
pub fn prompt_command(completer: HistoryCompleter) -> Result<Option<String>> {
    let config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut editor: Editor<PromptHelper, DefaultHistory> = Editor::with_config(config)?;
    editor.set_helper(Some(PromptHelper::new(completer)));

    println!("Type '{}' to exit, <Tab> to complete from history", QUIT_COMMAND);

    match editor.readline(PROMPT) {
        Ok(line) => Ok(accepted_line(&line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            debug!("prompt closed without input");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn accepted_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == QUIT_COMMAND {
        None
    } else {
        Some(trimmed.to_string())
    }
}
