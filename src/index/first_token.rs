/// First-word prefix index
///
/// Used when only a partial command name has been typed. Every leading
/// substring of a known command name points back at that name, except
/// substrings that are themselves known command names.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstTokenIndex {
    by_prefix: HashMap<String, HashSet<String>>,
}

impl FirstTokenIndex {
    /// Derive the index from the set of known command names
    pub fn from_first_tokens(first_tokens: &HashSet<String>) -> Self {
        let mut by_prefix: HashMap<String, HashSet<String>> = HashMap::new();

        for token in first_tokens {
            // Prefixes are cut on char boundaries, never bytes.
            for (end, ch) in token.char_indices() {
                let prefix = &token[..end + ch.len_utf8()];
                if first_tokens.contains(prefix) {
                    continue;
                }
                by_prefix
                    .entry(prefix.to_string())
                    .or_default()
                    .insert(token.clone());
            }
        }

        Self { by_prefix }
    }

    /// Command names that start with `prefix`
    pub fn candidates(&self, prefix: &str) -> Option<&HashSet<String>> {
        self.by_prefix.get(prefix)
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_progressive_narrowing() {
        let index = FirstTokenIndex::from_first_tokens(&set(&["git", "git-flow", "grep"]));

        assert_eq!(index.candidates("g"), Some(&set(&["git", "git-flow", "grep"])));
        assert_eq!(index.candidates("gi"), Some(&set(&["git", "git-flow"])));
        assert_eq!(index.candidates("gr"), Some(&set(&["grep"])));
        assert_eq!(index.candidates("git-f"), Some(&set(&["git-flow"])));
    }

    #[test]
    fn test_known_name_does_not_suggest_longer_names() {
        let index = FirstTokenIndex::from_first_tokens(&set(&["git", "github"]));

        // "git" is itself a command, so it is never a lookup key.
        assert_eq!(index.candidates("git"), None);
        assert_eq!(index.candidates("gith"), Some(&set(&["github"])));
        assert_eq!(index.candidates("gi"), Some(&set(&["git", "github"])));
    }

    #[test]
    fn test_full_name_is_not_a_key() {
        let index = FirstTokenIndex::from_first_tokens(&set(&["ls"]));
        assert_eq!(index.candidates("l"), Some(&set(&["ls"])));
        assert_eq!(index.candidates("ls"), None);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_multibyte_names() {
        let index = FirstTokenIndex::from_first_tokens(&set(&["épée"]));
        assert_eq!(index.candidates("é"), Some(&set(&["épée"])));
        assert_eq!(index.candidates("ép"), Some(&set(&["épée"])));
    }

    #[test]
    fn test_empty() {
        let index = FirstTokenIndex::from_first_tokens(&HashSet::new());
        assert!(index.is_empty());
        assert_eq!(index.candidates(""), None);
    }
}
