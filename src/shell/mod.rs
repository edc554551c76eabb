/// Shell integration module
///
/// Finds the user's shell and the history file it writes.

pub mod shell_detector;

pub use shell_detector::{Shell, ShellDetector};
