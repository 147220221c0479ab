// The run command's store-agnostic path with real log files

use super::common::{sample_store, PLAYLIST};
use lpq::commands::run::run_with_store;
use lpq::core::run_log::{ERROR_LOG, GENERAL_LOG, PROCESSED_LOG};
use lpq::core::{Config, FileRunLog, RunLog};
use lpq::remote::{MemoryStore, RemoteStore};
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

fn config(log_dir: &TempDir, dry_run: bool) -> Config {
    Config {
        dry_run,
        log_dir: log_dir.path().to_string_lossy().to_string(),
        ..Default::default()
    }
}

#[test]
fn test_run_writes_three_logs() {
    let log_dir = TempDir::new().unwrap();
    let config = config(&log_dir, false);
    let log = FileRunLog::open(&config.log_dir).unwrap();
    let mut store = sample_store();

    let report = run_with_store(&mut store, &log, &config, Arc::new(AtomicBool::new(false)))
        .expect("run should complete");
    log.flush();

    assert_eq!(report.stats.moved_primary, 2);

    let general = fs::read_to_string(log_dir.path().join(GENERAL_LOG)).unwrap();
    let errors = fs::read_to_string(log_dir.path().join(ERROR_LOG)).unwrap();
    let processed = fs::read_to_string(log_dir.path().join(PROCESSED_LOG)).unwrap();

    assert!(general.contains("Backup created: /retroarch/playlists/delete.lpl.bkp"));
    assert!(general.contains("Moved: /roms/nes/mario.zip -> /del/roms/nes/mario.zip"));
    assert_eq!(errors.lines().count(), 1);
    assert!(errors.contains("metroid.nes"));
    assert_eq!(processed.lines().count(), 2);
    assert!(processed.contains("\"label\": \"Mario Bros\", \"core_path\": \"DETECT\""));
}

#[test]
fn test_dry_run_logs_simulated_moves() {
    let log_dir = TempDir::new().unwrap();
    let config = config(&log_dir, true);
    let log = FileRunLog::open(&config.log_dir).unwrap();
    let mut store = sample_store();

    run_with_store(&mut store, &log, &config, Arc::new(AtomicBool::new(false))).unwrap();
    log.flush();

    let general = fs::read_to_string(log_dir.path().join(GENERAL_LOG)).unwrap();
    assert!(general.contains("[DRY-RUN] Move: /roms/nes/mario.zip -> /del/roms/nes/mario.zip"));
    assert!(store.contains_file("/roms/nes/mario.zip"));
}

#[test]
fn test_fatal_error_is_logged_not_raised() {
    let log_dir = TempDir::new().unwrap();
    let config = config(&log_dir, false);
    let log = FileRunLog::open(&config.log_dir).unwrap();
    let mut store = MemoryStore::new();

    let report = run_with_store(&mut store, &log, &config, Arc::new(AtomicBool::new(false)));
    log.flush();

    assert!(report.is_none());
    let errors = fs::read_to_string(log_dir.path().join(ERROR_LOG)).unwrap();
    assert!(errors.contains("Critical error: cannot download playlist"));
    assert!(errors.contains(PLAYLIST));
}

#[test]
fn test_session_can_be_closed_after_run() {
    let log_dir = TempDir::new().unwrap();
    let config = config(&log_dir, true);
    let log = FileRunLog::open(&config.log_dir).unwrap();
    let mut store = sample_store();

    run_with_store(&mut store, &log, &config, Arc::new(AtomicBool::new(false))).unwrap();
    store.close().unwrap();

    assert!(store.is_closed());
}
