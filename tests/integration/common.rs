// Shared fixtures for integration tests

use lpq::core::{MoveOrder, QuarantineRoots, RunSettings};
use lpq::remote::MemoryStore;

pub const PLAYLIST: &str = "/retroarch/playlists/delete.lpl";
pub const BACKUP: &str = "/retroarch/playlists/delete.lpl.bkp";
pub const THUMBS: &str = "/retroarch/thumbnails/Nintendo - Nintendo Entertainment System";

pub const PLAYLIST_JSON: &str = r#"{
  "version": "1.5",
  "default_core_path": "",
  "default_core_name": "",
  "base_content_directory": "/roms",
  "label_display_mode": 0,
  "items": [
    {
      "path": "/roms/nes/mario.zip#Mario Bros.nes",
      "label": "Mario Bros",
      "core_path": "DETECT",
      "core_name": "DETECT",
      "crc32": "00000000|crc",
      "db_name": "Nintendo - Nintendo Entertainment System.lpl"
    },
    {
      "path": "/roms/nes/zelda.zip#Legend of Zelda, The.nes",
      "label": "Legend of Zelda, The",
      "core_path": "DETECT",
      "core_name": "DETECT",
      "crc32": "00000000|crc",
      "db_name": "Nintendo - Nintendo Entertainment System.lpl"
    },
    {
      "path": "/roms/nes/metroid.nes",
      "label": "Metroid",
      "core_path": "DETECT",
      "core_name": "DETECT",
      "crc32": "00000000|crc",
      "db_name": "Nintendo - Nintendo Entertainment System.lpl"
    }
  ]
}"#;

pub fn settings(dry_run: bool) -> RunSettings {
    RunSettings {
        playlist_path: PLAYLIST.to_string(),
        roots: QuarantineRoots::new("/del", "/retroarch/thumbnails"),
        dry_run,
        move_order: MoveOrder::DeleteFirst,
    }
}

/// Store with the sample playlist, two ROMs and their thumbnails.
///
/// The third entry (Metroid) has no alias delimiter and fails to resolve.
pub fn sample_store() -> MemoryStore {
    MemoryStore::new()
        .with_file(PLAYLIST, PLAYLIST_JSON)
        .with_file("/roms/nes/mario.zip", vec![1u8; 1000])
        .with_file("/roms/nes/zelda.zip", vec![2u8; 2000])
        .with_file(format!("{}/Named_Boxarts/Mario Bros.png", THUMBS), vec![3u8; 10])
        .with_file(format!("{}/Named_Snaps/Mario Bros.png", THUMBS), vec![4u8; 20])
        .with_file(format!("{}/Named_Titles/Mario Bros2.png", THUMBS), vec![5u8; 30])
        .with_file(format!("{}/Named_Titles/Legend of Zelda, The.png", THUMBS), vec![6u8; 40])
        .with_file("/retroarch/thumbnails/Sega - Mega Drive/Named_Boxarts/Mario Bros.png", vec![7u8; 50])
}
