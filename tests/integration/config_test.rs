use lpq::core::{Config, MoveOrder};
use lpq::LpqError;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(config.dry_run);
    assert_eq!(config.playlist_path, "/retroarch/playlists/delete.lpl");
    assert_eq!(config.quarantine_prefix, "/del");
    assert_eq!(config.thumbnails_root, "/retroarch/thumbnails");
    assert_eq!(config.remote.port, 5000);
}

#[test]
fn test_config_run_settings() {
    let config = Config {
        dry_run: false,
        move_order: MoveOrder::WriteFirst,
        quarantine_prefix: "/quarantine/".to_string(),
        ..Default::default()
    };

    let settings = config.run_settings();
    assert!(!settings.dry_run);
    assert_eq!(settings.move_order, MoveOrder::WriteFirst);
    assert_eq!(settings.backup_path(), "/retroarch/playlists/delete.lpl.bkp");
    assert_eq!(settings.roots.destination_for("/roms/a.zip"), "/quarantine/roms/a.zip");
}

#[test]
fn test_config_move_order_serializes_kebab_case() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let config = Config {
        move_order: MoveOrder::WriteFirst,
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"move_order\": \"write-first\""));
}

#[test]
fn test_config_unknown_move_order_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"move_order": "sideways"}"#).unwrap();

    assert!(matches!(Config::load_from(&path), Err(LpqError::Config(_))));
}

#[test]
fn test_config_validation_guards_paths() {
    let config = Config {
        playlist_path: "delete.lpl".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        remote: lpq::core::RemoteSettings {
            port: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}
