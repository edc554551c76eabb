/// Prefix keys
///
/// A prefix key names "the words typed so far". The words are joined with a
/// separator that never shows up in real shell words, so a flat map can
/// stand in for a tree.

use serde::{Deserialize, Serialize};

/// Joins the words of a prefix key
pub const KEY_SEPARATOR: &str = "|_|";

/// Ordered words typed so far, encoded as one string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixKey(String);

impl PrefixKey {
    /// Build a key from the words typed so far
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut key = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                key.push_str(KEY_SEPARATOR);
            }
            key.push_str(token.as_ref());
        }
        PrefixKey(key)
    }

    /// Key for a single word
    pub fn single(token: &str) -> Self {
        PrefixKey(token.to_string())
    }

    /// Extend the key by one more word
    pub fn push(&mut self, token: &str) {
        if !self.0.is_empty() {
            self.0.push_str(KEY_SEPARATOR);
        }
        self.0.push_str(token);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl std::fmt::Display for PrefixKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
