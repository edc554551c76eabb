// Shell tokenizer for history commands
//
// Splits command text into words the way a POSIX shell would, then cleans the words up for indexing.

use std::borrow::Cow;
use tracing::trace;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Token that ends the part of a command we index
pub const PIPE_TOKEN: &str = "|";

/// Tokens of one history command, cleaned and cut before the first pipe
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTokens(Vec<String>);

impl CommandTokens {
    /// Tokenize a history command for indexing
    ///
    /// Returns `None` when the text cannot be split (unbalanced quotes) or
    /// nothing is left after cleanup.
    pub fn parse(command: &str) -> Option<CommandTokens> {
        let raw = match split(command) {
            Some(raw) => raw,
            None => {
                trace!(command, "dropping command that failed to tokenize");
                return None;
            }
        };

        let tokens: Vec<String> = raw
            .iter()
            .map(|token| strip_control_chars(token))
            .filter(|token| !token.is_empty())
            .take_while(|token| token != PIPE_TOKEN)
            .collect();

        if tokens.is_empty() {
            None
        } else {
            Some(CommandTokens(tokens))
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The command name
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Split text into shell words, honoring quotes and escapes
///
/// `None` means the input is not a complete shell word list, e.g. an
/// unterminated quote. That is normal while someone is still typing.
///
/// A `#` starting a word is an ordinary character here, not a comment.
pub fn split(text: &str) -> Option<Vec<String>> {
    shlex::split(&escape_word_start_hashes(text))
}

/// Backslash-escape every unquoted `#` that starts a word
fn escape_word_start_hashes(text: &str) -> Cow<'_, str> {
    if !text.contains('#') {
        return Cow::Borrowed(text);
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Quote {
        None,
        Single,
        Double,
    }

    let mut out = String::with_capacity(text.len() + 4);
    let mut quote = Quote::None;
    let mut word_start = true;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Quote::None, ' ' | '\t' | '\n') => word_start = true,
            (Quote::None, '#') if word_start => {
                out.push('\\');
                word_start = false;
            }
            (Quote::None | Quote::Double, '\\') => {
                out.push(ch);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                word_start = false;
                continue;
            }
            (Quote::None, '\'') => {
                quote = Quote::Single;
                word_start = false;
            }
            (Quote::None, '"') => {
                quote = Quote::Double;
                word_start = false;
            }
            (Quote::Single, '\'') | (Quote::Double, '"') => quote = Quote::None,
            (Quote::None, _) => word_start = false,
            _ => {}
        }
        out.push(ch);
    }

    Cow::Owned(out)
}

/// Remove every character in the Unicode "Other" general categories
///
/// Control, format, surrogate, private use and unassigned code points.
pub fn strip_control_chars(token: &str) -> String {
    token.chars().filter(|ch| !is_other_category(*ch)).collect()
}

fn is_other_category(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}
