// Run command - quarantine the playlist's assets on the remote store

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::{BatchOrchestrator, Config, FileRunLog, RunEvent, RunLog, RunReport};
use crate::error::FatalError;
use crate::remote::{FtpStore, RemoteStore};
use crate::ui::{print_dry_run_banner, print_event, print_fatal, print_summary};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;

    let log = FileRunLog::open(&config.log_dir)
        .with_context(|| format!("Failed to open log files in '{}'", config.log_dir))?;

    if config.dry_run {
        print_dry_run_banner();
    }

    let cancel_flag = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(&cancel_flag);

    println!(
        "{} {}:{} ({})",
        "Connecting to".dimmed(),
        config.remote.host,
        config.remote.port,
        config.remote.user
    );

    let mut store = match FtpStore::connect(&config.remote) {
        Ok(store) => store,
        Err(e) => {
            report_fatal(&log, &FatalError::Connect(e));
            log.flush();
            return Ok(());
        }
    };

    log.info(&format!(
        "Connected to {} (user: {})",
        store.endpoint(),
        config.remote.user
    ));
    println!("{} {}", "Connected to".green(), store.endpoint().cyan());
    println!();

    run_with_store(&mut store, &log, &config, cancel_flag);

    if let Err(e) = store.close() {
        log.error(&format!("Failed to close session: {}", e));
    }
    log.flush();

    Ok(())
}

/// Run against an already connected store, printing progress and the summary.
///
/// Returns the report of a completed run, `None` when the run hit a fatal
/// error (already logged and printed).
pub fn run_with_store(
    store: &mut dyn RemoteStore,
    log: &dyn RunLog,
    config: &Config,
    cancel_flag: Arc<AtomicBool>,
) -> Option<RunReport> {
    let mut total = 0;
    let result = BatchOrchestrator::new(store, log, config.run_settings())
        .with_cancel_flag(cancel_flag)
        .run(|event| {
            if let RunEvent::PlaylistLoaded { entries, .. } = event {
                total = entries;
            }
            print_event(&event, total);
        });

    match result {
        Ok(report) => {
            print_summary(&report.stats);
            Some(report)
        }
        Err(e) => {
            report_fatal(log, &e);
            None
        }
    }
}

fn report_fatal(log: &dyn RunLog, error: &FatalError) {
    log.error(&format!("Critical error: {}", error));
    print_fatal(&error.to_string());
}

fn install_interrupt_handler(cancel_flag: &Arc<AtomicBool>) {
    let flag = Arc::clone(cancel_flag);
    let result = ctrlc::set_handler(move || {
        if !flag.swap(true, Ordering::Relaxed) {
            eprintln!();
            eprintln!(
                "{}",
                "Interrupt received, finishing the current entry...".yellow()
            );
        }
    });

    if let Err(e) = result {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }
}

/// Load the configuration file and apply command-line overrides
pub fn resolve_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(Path::new(path))
            .with_context(|| format!("Failed to load configuration from '{}'", path))?,
        None => Config::load().context("Failed to load configuration")?,
    };

    apply_overrides(&mut config, matches)?;
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

pub fn apply_overrides(config: &mut Config, matches: &ArgMatches) -> Result<()> {
    let string_arg = |id: &str| matches.get_one::<String>(id).cloned();

    if let Some(host) = string_arg("host") {
        config.remote.host = host;
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.remote.port = *port;
    }
    if let Some(user) = string_arg("user") {
        config.remote.user = user;
    }
    if let Some(password) = string_arg("password") {
        config.remote.password = password;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.remote.timeout_secs = *timeout;
    }
    if let Some(playlist) = string_arg("playlist") {
        config.playlist_path = playlist;
    }
    if let Some(quarantine) = string_arg("quarantine") {
        config.quarantine_prefix = quarantine;
    }
    if let Some(thumbnails) = string_arg("thumbnails") {
        config.thumbnails_root = thumbnails;
    }
    if let Some(log_dir) = string_arg("log-dir") {
        config.log_dir = log_dir;
    }
    if let Some(order) = string_arg("move-order") {
        config.move_order = order.parse().map_err(anyhow::Error::msg)?;
    }

    if matches.get_flag("dry-run") {
        config.dry_run = true;
    } else if matches.get_flag("apply") {
        config.dry_run = false;
    }

    Ok(())
}
