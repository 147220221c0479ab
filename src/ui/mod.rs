// UI and formatting module

pub mod console;
pub mod formatters;

// Re-export commonly used items for cleaner imports
pub use console::{print_dry_run_banner, print_event, print_fatal, print_summary};
pub use formatters::{format_elapsed, format_kb, format_mb};
