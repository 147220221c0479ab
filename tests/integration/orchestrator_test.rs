// End-to-end runs of the batch orchestrator against the in-memory store

use super::common::{sample_store, settings, BACKUP, PLAYLIST, PLAYLIST_JSON, THUMBS};
use lpq::core::run_log::{LogKind, MemoryRunLog};
use lpq::core::{BatchOrchestrator, PlaylistDocument, RunEvent};
use lpq::remote::StoreOp;
use lpq::EntryError;

#[test]
fn test_live_run_moves_roms_and_thumbnails() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();

    let report = BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|_| {})
        .unwrap();

    assert!(!store.contains_file("/roms/nes/mario.zip"));
    assert!(!store.contains_file("/roms/nes/zelda.zip"));
    assert!(store.contains_file("/del/roms/nes/mario.zip"));
    assert!(store.contains_file("/del/roms/nes/zelda.zip"));
    assert!(store.contains_file(&format!("/del{}/Named_Boxarts/Mario Bros.png", THUMBS)));
    assert!(store.contains_file(&format!("/del{}/Named_Snaps/Mario Bros.png", THUMBS)));
    assert!(store.contains_file(&format!("/del{}/Named_Titles/Legend of Zelda, The.png", THUMBS)));

    let stats = &report.stats;
    assert_eq!(stats.moved_primary, 2);
    assert_eq!(stats.moved_derived, 3);
    assert_eq!(stats.errors, 1);
    assert!(stats.playlist_rewritten);
    assert_eq!(report.document.len(), 1);
}

#[test]
fn test_derived_matching_is_exact_and_scoped_to_collection() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();

    BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|_| {})
        .unwrap();

    // Different alias
    assert!(store.contains_file(&format!("{}/Named_Titles/Mario Bros2.png", THUMBS)));
    // Same alias, other collection
    assert!(store.contains_file("/retroarch/thumbnails/Sega - Mega Drive/Named_Boxarts/Mario Bros.png"));
}

#[test]
fn test_destinations_mirror_source_paths() {
    let mut store = sample_store();
    let original = store.snapshot();
    let log = MemoryRunLog::new();

    BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|_| {})
        .unwrap();

    for (path, data) in original {
        if store.contains_file(&path) {
            continue;
        }
        let moved = format!("/del{}", path);
        assert_eq!(store.file(&moved), Some(data.as_slice()), "{} not mirrored", path);
    }
}

#[test]
fn test_backup_is_first_mutation_and_matches_original() {
    for dry_run in [true, false] {
        let mut store = sample_store();
        let log = MemoryRunLog::new();

        BatchOrchestrator::new(&mut store, &log, settings(dry_run))
            .run(|_| {})
            .unwrap();

        let mutations = store.mutations();
        assert_eq!(mutations[0].op, StoreOp::Write);
        assert_eq!(mutations[0].path, BACKUP);
        assert_eq!(store.file(BACKUP), Some(PLAYLIST_JSON.as_bytes()));
    }
}

#[test]
fn test_dry_run_is_idempotent_and_leaves_store_untouched() {
    let mut store = sample_store();
    let before = store.snapshot();
    let log = MemoryRunLog::new();

    let first = BatchOrchestrator::new(&mut store, &log, settings(true))
        .run(|_| {})
        .unwrap();
    let second = BatchOrchestrator::new(&mut store, &log, settings(true))
        .run(|_| {})
        .unwrap();

    assert_eq!(first.stats.counts(), second.stats.counts());
    assert_eq!(first.stats.processed_indices(), second.stats.processed_indices());
    assert_eq!(first.stats.moved_primary, 2);
    assert_eq!(first.stats.moved_derived, 3);
    assert!(!first.stats.playlist_rewritten);

    let mut after = store.snapshot();
    after.remove(BACKUP);
    assert_eq!(after, before);

    // Only the two backups were written
    let mutations = store.mutations();
    assert_eq!(mutations.len(), 2);
    assert!(mutations.iter().all(|call| call.op == StoreOp::Write && call.path == BACKUP));
}

#[test]
fn test_entry_removed_iff_primary_moved() {
    let mut store = sample_store();
    store.fail_on(StoreOp::Read, "/roms/nes/zelda.zip");
    let log = MemoryRunLog::new();

    let report = BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|_| {})
        .unwrap();

    let remaining: Vec<&str> = report.document.items().iter().map(|e| e.path()).collect();
    assert_eq!(
        remaining,
        vec!["/roms/nes/zelda.zip#Legend of Zelda, The.nes", "/roms/nes/metroid.nes"]
    );

    let persisted = PlaylistDocument::from_slice(store.file(PLAYLIST).unwrap()).unwrap();
    assert_eq!(persisted, report.document);
    assert!(store.contains_file("/roms/nes/zelda.zip"));
}

#[test]
fn test_rewritten_playlist_keeps_unknown_fields() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();

    BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|_| {})
        .unwrap();

    let written: serde_json::Value = serde_json::from_slice(store.file(PLAYLIST).unwrap()).unwrap();
    assert_eq!(written["version"], "1.5");
    assert_eq!(written["label_display_mode"], 0);
    assert_eq!(written["items"].as_array().unwrap().len(), 1);
    assert_eq!(written["items"][0]["label"], "Metroid");
    assert_eq!(written["items"][0]["crc32"], "00000000|crc");
}

#[test]
fn test_primary_failure_is_isolated() {
    let mut store = sample_store();
    store.fail_on(StoreOp::Read, "/roms/nes/mario.zip");
    let log = MemoryRunLog::new();

    let mut relocated = Vec::new();
    let report = BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|event| {
            if let RunEvent::EntryRelocated { index, .. } = event {
                relocated.push(index);
            }
        })
        .unwrap();

    // Entry 0 fails at relocation, entry 1 still runs, entry 2 fails to resolve
    assert_eq!(relocated, vec![1]);
    assert_eq!(report.stats.errors, 2);
    assert_eq!(report.stats.moved_primary, 1);
    // Thumbnails of a failed entry are not touched
    assert!(store.contains_file(&format!("{}/Named_Boxarts/Mario Bros.png", THUMBS)));
}

#[test]
fn test_derived_failure_counts_but_does_not_gate_removal() {
    let mut store = sample_store();
    store.fail_on(StoreOp::Read, format!("{}/Named_Snaps/Mario Bros.png", THUMBS));
    let log = MemoryRunLog::new();

    let mut derived_for_mario = None;
    let report = BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|event| {
            if let RunEvent::EntryRelocated { index: 0, derived, .. } = event {
                derived_for_mario = Some(derived);
            }
        })
        .unwrap();

    assert_eq!(derived_for_mario, Some(1));
    assert_eq!(report.stats.errors, 2);
    assert_eq!(report.stats.moved_derived, 2);
    assert!(!report
        .document
        .items()
        .iter()
        .any(|e| e.path().starts_with("/roms/nes/mario.zip")));
}

#[test]
fn test_byte_totals_match_probed_sizes() {
    for dry_run in [true, false] {
        let mut store = sample_store();
        let log = MemoryRunLog::new();

        let report = BatchOrchestrator::new(&mut store, &log, settings(dry_run))
            .run(|_| {})
            .unwrap();

        assert_eq!(report.stats.primary_bytes, 1000 + 2000);
        assert_eq!(report.stats.derived_bytes, 10 + 20 + 40);
        assert_eq!(report.stats.total_bytes(), 3070);
    }
}

#[test]
fn test_missing_thumbnail_tree_is_not_an_entry_failure() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();
    let mut settings = settings(false);
    settings.roots = lpq::core::QuarantineRoots::new("/del", "/nonexistent");

    let report = BatchOrchestrator::new(&mut store, &log, settings)
        .run(|_| {})
        .unwrap();

    assert_eq!(report.stats.moved_primary, 2);
    assert_eq!(report.stats.moved_derived, 0);
    // Only the unresolvable Metroid entry counts; listing failures are logged
    assert_eq!(report.stats.errors, 1);
    assert!(log
        .of_kind(LogKind::Error)
        .iter()
        .any(|line| line.starts_with("Failed to list /nonexistent/")));
}

#[test]
fn test_processed_log_has_one_json_line_per_moved_entry() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();

    BatchOrchestrator::new(&mut store, &log, settings(true))
        .run(|_| {})
        .unwrap();

    let processed = log.of_kind(LogKind::Processed);
    assert_eq!(processed.len(), 2);
    let first: serde_json::Value = serde_json::from_str(&processed[0]).unwrap();
    assert_eq!(first["label"], "Mario Bros");
}

#[test]
fn test_invalid_path_reported_through_event() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();

    let mut failed = Vec::new();
    BatchOrchestrator::new(&mut store, &log, settings(true))
        .run(|event| {
            if let RunEvent::EntryFailed { index, name, error } = event {
                failed.push((index, name.to_string(), matches!(error, EntryError::Resolve(_))));
            }
        })
        .unwrap();

    assert_eq!(failed, vec![(2, "metroid.nes".to_string(), true)]);
}

#[test]
fn test_ambiguous_delimiters_move_nothing() {
    let playlist = r#"{"items": [{"path": "/roms/nes/Mario#2.zip#Mario 2.nes", "db_name": "NES.lpl"}]}"#;
    let mut store = lpq::remote::MemoryStore::new()
        .with_file(PLAYLIST, playlist)
        .with_file("/roms/nes/Mario", vec![1u8; 10])
        .with_file("/roms/nes/Mario#2.zip", vec![2u8; 20]);
    let log = MemoryRunLog::new();

    let report = BatchOrchestrator::new(&mut store, &log, settings(false))
        .run(|_| {})
        .unwrap();

    assert_eq!(report.stats.moved_primary, 0);
    assert_eq!(report.stats.errors, 1);
    assert!(store.contains_file("/roms/nes/Mario"));
    assert!(store.contains_file("/roms/nes/Mario#2.zip"));
    assert!(!store.contains_file("/del/roms/nes/Mario"));

    // The entry stays in the rewritten playlist
    let persisted = PlaylistDocument::from_slice(store.file(PLAYLIST).unwrap()).unwrap();
    assert_eq!(persisted.len(), 1);
}

#[test]
fn test_relocated_events_name_the_rom_file() {
    let mut store = sample_store();
    let log = MemoryRunLog::new();

    let mut relocated = Vec::new();
    BatchOrchestrator::new(&mut store, &log, settings(true))
        .run(|event| {
            if let RunEvent::EntryRelocated { name, derived, .. } = event {
                relocated.push((name.to_string(), derived));
            }
        })
        .unwrap();

    assert_eq!(
        relocated,
        vec![("mario.zip".to_string(), 2), ("zelda.zip".to_string(), 1)]
    );
}
