// Serves completions from the history index
//
// Pure reads. Nothing here touches the terminal or mutates the index.

use crate::history;
use crate::index::{CompletionIndex, FirstTokenIndex, PrefixKey};
use std::collections::hash_set;
use std::sync::OnceLock;

/// One completion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion<'a> {
    pub text: &'a str,
    /// Where the replacement starts, in chars relative to the cursor (<= 0)
    pub start_position: isize,
}

/// Lazy, unordered sequence of candidates for one query
pub struct Completions<'a> {
    start_position: isize,
    candidates: Option<hash_set::Iter<'a, String>>,
}

impl<'a> Completions<'a> {
    fn none() -> Self {
        Self {
            start_position: 0,
            candidates: None,
        }
    }

    fn from_set(set: &'a std::collections::HashSet<String>, fragment: &str) -> Self {
        Self {
            start_position: -(fragment.chars().count() as isize),
            candidates: Some(set.iter()),
        }
    }

    /// Offset every candidate in this query replaces from
    pub fn start_position(&self) -> isize {
        self.start_position
    }
}

impl<'a> Iterator for Completions<'a> {
    type Item = Completion<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.candidates.as_mut()?.next()?;
        Some(Completion {
            text,
            start_position: self.start_position,
        })
    }
}

/// Completes command lines from the history index
pub struct HistoryCompleter {
    index: CompletionIndex,
    first_token_index: OnceLock<FirstTokenIndex>,
}

impl HistoryCompleter {
    pub fn new(index: CompletionIndex) -> Self {
        Self {
            index,
            first_token_index: OnceLock::new(),
        }
    }

    pub fn index(&self) -> &CompletionIndex {
        &self.index
    }

    /// Prefix index over command names, derived on first use
    pub fn first_token_index(&self) -> &FirstTokenIndex {
        self.first_token_index
            .get_or_init(|| FirstTokenIndex::from_first_tokens(self.index.first_tokens()))
    }

    /// Candidates for the current input
    ///
    /// # Arguments
    /// * `text` - The whole line typed so far
    /// * `fragment` - The word right before the cursor (may be empty)
    ///
    /// Text that cannot be split yet (an open quote) yields nothing.
    pub fn complete<'a>(&'a self, text: &str, fragment: &str) -> Completions<'a> {
        let words = match history::split(text) {
            Some(words) => words,
            None => return Completions::none(),
        };

        let key = PrefixKey::from_tokens(&words);

        // A lone partial command name falls back to the name prefix index.
        if words.len() == 1 && !self.index.contains_key(key.as_str()) {
            return match self.first_token_index().candidates(fragment) {
                Some(set) => Completions::from_set(set, fragment),
                None => Completions::none(),
            };
        }

        match self.index.candidates(key.as_str()) {
            Some(set) => Completions::from_set(set, fragment),
            None => Completions::none(),
        }
    }
}

/// The word immediately before `pos` (a byte offset into `line`)
///
/// Empty when the cursor sits after whitespace or at the start.
pub fn word_before_cursor(line: &str, pos: usize) -> &str {
    let before = &line[..pos.min(line.len())];
    match before.rfind(char::is_whitespace) {
        Some(idx) => {
            let ws_len = before[idx..].chars().next().map_or(1, char::len_utf8);
            &before[idx + ws_len..]
        }
        None => before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn completer(history: &[&str]) -> HistoryCompleter {
        HistoryCompleter::new(CompletionIndex::build(history.iter().copied()))
    }

    fn texts(completions: Completions<'_>) -> HashSet<String> {
        completions.map(|c| c.text.to_string()).collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_next_word_after_space() {
        let c = completer(&["git status", "git log", "git checkout master", "git checkout dev"]);

        assert_eq!(texts(c.complete("git ", "")), set(&["status", "log", "checkout"]));
        assert_eq!(texts(c.complete("git checkout ", "")), set(&["master", "dev"]));
    }

    #[test]
    fn test_start_position_is_fragment_length() {
        let c = completer(&["git status"]);
        let all: Vec<_> = c.complete("git", "git").collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].start_position, -3);

        let after_space = c.complete("git ", "");
        assert_eq!(after_space.start_position(), 0);
    }

    #[test]
    fn test_partial_first_word() {
        let c = completer(&["git status", "git-flow init"]);
        assert_eq!(texts(c.complete("gi", "gi")), set(&["git", "git-flow"]));

        let completions: Vec<_> = c.complete("gi", "gi").collect();
        assert!(completions.iter().all(|c| c.start_position == -2));
    }

    #[test]
    fn test_partial_first_word_uses_single_word_commands() {
        let c = completer(&["htop", "git status"]);
        assert_eq!(texts(c.complete("ht", "ht")), set(&["htop"]));
    }

    #[test]
    fn test_known_name_shadows_longer_names() {
        let c = completer(&["git status", "github login"]);
        // "git" has its own entry, so its next words are offered instead.
        assert_eq!(texts(c.complete("git", "git")), set(&["status"]));
        assert_eq!(texts(c.complete("gith", "gith")), set(&["github"]));
    }

    #[test]
    fn test_quoted_words_resolve() {
        let c = completer(&["git commit src -m 'This is a commit'", "git commit src -m 'This is another commit'"]);
        assert_eq!(
            texts(c.complete("git commit src -m ", "")),
            set(&["This is a commit", "This is another commit"])
        );
    }

    #[test]
    fn test_unknown_prefix_yields_nothing() {
        let c = completer(&["git status"]);
        assert_eq!(c.complete("cargo ", "").count(), 0);
        assert_eq!(c.complete("git status --short ", "").count(), 0);
        assert_eq!(c.complete("zz", "zz").count(), 0);
    }

    #[test]
    fn test_open_quote_yields_nothing() {
        let c = completer(&["echo hi", "echo \"unterminated"]);
        assert_eq!(c.complete("echo \"unterm", "unterm").count(), 0);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let c = completer(&["git status"]);
        assert_eq!(c.complete("", "").count(), 0);
    }

    #[test]
    fn test_single_word_after_space_with_no_entry() {
        let c = completer(&["git status"]);
        // Fragment is empty, so the name prefix index has nothing to offer.
        assert_eq!(c.complete("gi ", "").count(), 0);
    }

    #[test]
    fn test_pipe_words_not_offered() {
        let c = completer(&["cat log.txt | grep error"]);
        assert_eq!(texts(c.complete("cat ", "")), set(&["log.txt"]));
        assert_eq!(c.complete("cat log.txt ", "").count(), 0);
    }

    #[test]
    fn test_every_next_word_is_offered() {
        let history = [
            "cargo build --release",
            "cargo test -p core -- --nocapture",
            "docker compose up -d",
            "git commit -m #42",
        ];
        let c = completer(&history);

        for command in history {
            let words = history::split(command).unwrap();
            for i in 1..words.len() {
                let typed = words[..i].join(" ") + " ";
                let offered = texts(c.complete(&typed, ""));
                assert!(offered.contains(&words[i]), "{typed:?} should offer {}", words[i]);
            }
        }
    }

    #[test]
    fn test_first_token_index_is_cached() {
        let c = completer(&["git status"]);
        let a = c.first_token_index() as *const FirstTokenIndex;
        let b = c.first_token_index() as *const FirstTokenIndex;
        assert_eq!(a, b);
    }

    #[test]
    fn test_word_before_cursor() {
        assert_eq!(word_before_cursor("git che", 7), "che");
        assert_eq!(word_before_cursor("git ", 4), "");
        assert_eq!(word_before_cursor("gi", 2), "gi");
        assert_eq!(word_before_cursor("git checkout", 3), "git");
        assert_eq!(word_before_cursor("", 0), "");
    }
}
