/// Core functionality modules
///
/// Wires history reading, index building, persistence and the prompt
/// into the two things the CLI does: sync and run.

pub mod session;
pub mod syncer;

pub use session::Session;
pub use syncer::{SyncReport, Syncer};
