//! Output and progress plumbing shared with the CLI.

pub mod output;
pub mod progress;

pub use output::{Output, Verbosity};
pub use progress::{format_bytes, ProgressManager};
