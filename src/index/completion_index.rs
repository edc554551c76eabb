// Completion index built from shell history
//
// Maps "words typed so far" to every word that ever came next.

use crate::history::CommandTokens;
use crate::index::{PrefixKey, KEY_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Prefix key -> set of next words, plus every command name ever seen
///
/// Equality is set equality per key, order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionIndex {
    entries: HashMap<String, HashSet<String>>,
    first_tokens: HashSet<String>,
}

impl CompletionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from raw command texts
    ///
    /// Commands that fail to tokenize or are empty after cleanup are skipped.
    /// They do not affect any other command.
    pub fn build<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        let mut skipped = 0usize;

        for command in commands {
            match CommandTokens::parse(command.as_ref()) {
                Some(tokens) => index.insert_command(&tokens),
                None => skipped += 1,
            }
        }

        debug!(
            keys = index.len(),
            first_tokens = index.first_tokens.len(),
            skipped,
            "built completion index"
        );
        index
    }

    /// Record one tokenized command
    pub fn insert_command(&mut self, tokens: &CommandTokens) {
        let words = tokens.as_slice();
        self.first_tokens.insert(tokens.first().to_string());

        let mut key = PrefixKey::single(&words[0]);
        for word in &words[1..] {
            self.insert_candidate(key.as_str(), word);
            key.push(word);
        }
    }

    /// Add `candidate` to the set under `key`
    pub fn add_candidate(&mut self, key: &str, candidate: &str) {
        self.insert_candidate(key, candidate);

        let first = key.split(KEY_SEPARATOR).next().unwrap_or(key);
        if !self.first_tokens.contains(first) {
            self.first_tokens.insert(first.to_string());
        }
    }

    fn insert_candidate(&mut self, key: &str, candidate: &str) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .insert(candidate.to_string());
    }

    /// Register a command name without any following words
    pub fn add_first_token(&mut self, token: &str) {
        self.first_tokens.insert(token.to_string());
    }

    /// Next-word candidates for `key`
    pub fn candidates(&self, key: &str) -> Option<&HashSet<String>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every command name seen in history, including ones never given arguments
    pub fn first_tokens(&self) -> &HashSet<String> {
        &self.first_tokens
    }

    /// Number of prefix keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.first_tokens.is_empty()
    }

    /// Total (key, candidate) pairs
    pub fn candidate_count(&self) -> usize {
        self.entries.values().map(HashSet::len).sum()
    }
}
