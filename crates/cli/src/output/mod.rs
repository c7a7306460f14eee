//! Structured output envelope, progress lines, and formats.


mod format;
mod model;
mod progress;
mod result_builder;

pub use format::OutputFormat;
pub use model::*;
pub use progress::{print_plan, print_progress, print_report_text};
pub use result_builder::{ResultBuilder, print_error_stderr, print_result};
