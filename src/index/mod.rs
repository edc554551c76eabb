/// Completion index
///
/// Built from tokenized history, persisted by `db`, queried by `complete`.

pub mod completion_index;
pub mod first_token;
pub mod prefix_key;

pub use completion_index::CompletionIndex;
pub use first_token::FirstTokenIndex;
pub use prefix_key::{PrefixKey, KEY_SEPARATOR};
