// Console presentation of a quarantine run

use colored::Colorize;

use crate::core::orchestrator::RunEvent;
use crate::core::stats::RunStatistics;
use crate::ui::formatters::{format_elapsed, format_kb, format_mb};

pub fn print_dry_run_banner() {
    println!();
    println!(
        "{}",
        "=== DRY-RUN MODE: files will not be moved ===".yellow().bold()
    );
    println!();
}

/// Print one progress line; `total` is the number of playlist entries
pub fn print_event(event: &RunEvent<'_>, total: usize) {
    match event {
        RunEvent::BackupCreated { path } => {
            println!("{} {}", "Backup created:".white(), path.cyan());
        }
        RunEvent::PlaylistLoaded {
            base_content_directory,
            entries,
        } => {
            println!("{} {}", "ROM directory:".white(), base_content_directory.cyan());
            println!("{} {}", "Entries found:".white(), entries.to_string().yellow().bold());
            println!();
        }
        RunEvent::EntryRelocated {
            index,
            name,
            derived,
        } => {
            println!(
                "{} {} {}, thumbnails: {}",
                progress_prefix(*index, total).dimmed(),
                "[OK]".green().bold(),
                name,
                derived
            );
        }
        RunEvent::EntryFailed { index, name, error } => {
            println!(
                "{} {} {}, {}",
                progress_prefix(*index, total).dimmed(),
                "[ERROR]".red().bold(),
                name,
                error
            );
        }
        RunEvent::Cancelled { remaining } => {
            println!();
            println!(
                "{}",
                format!(
                    "Cancelled: {} entr{} left in the playlist untouched",
                    remaining,
                    if *remaining == 1 { "y" } else { "ies" }
                )
                .yellow()
                .bold()
            );
        }
        RunEvent::PlaylistRewritten {
            path,
            remaining_entries,
        } => {
            println!();
            println!(
                "{} {} ({} entries remain)",
                "Playlist updated:".green().bold(),
                path.cyan(),
                remaining_entries
            );
        }
    }
}

fn progress_prefix(index: usize, total: usize) -> String {
    format!("({}/{})", index + 1, total)
}

pub fn print_summary(stats: &RunStatistics) {
    println!();
    println!("{}", "─".repeat(50).blue());
    println!("{}", "Summary".blue().bold());
    println!("{}", "─".repeat(50).blue());

    let verb = if stats.dry_run { "would move" } else { "moved" };
    println!(
        "{} {} ({})",
        format!("ROM files {}:", verb).white(),
        stats.moved_primary.to_string().yellow().bold(),
        format_kb(stats.primary_bytes)
    );
    println!(
        "{} {} ({})",
        format!("Thumbnails {}:", verb).white(),
        stats.moved_derived.to_string().yellow().bold(),
        format_kb(stats.derived_bytes)
    );
    println!("{} {}", "Total size:".white(), format_mb(stats.total_bytes()).yellow().bold());
    println!("{} {}", "Elapsed:".white(), format_elapsed(stats.elapsed));

    let errors = stats.errors.to_string();
    if stats.errors > 0 {
        println!("{} {}", "Errors:".red().bold(), errors.red().bold());
    } else {
        println!("{} {}", "Errors:".white(), errors.green());
    }

    if stats.cancelled {
        println!("{}", "Run was cancelled before all entries were processed.".yellow());
    }
    println!();
}

/// Single error line for a failure that ended the run
pub fn print_fatal(message: &str) {
    println!("{} {}", "[ERROR]".red().bold(), message.red());
}
