//! Integration tests for loading generation configs from disk.

use std::io::Write;
use tempfile::NamedTempFile;
use warren::{GenerationConfig, ViewerSession, WarrenError, WarrenResult};

#[test]
fn test_config_round_trip_through_file() -> WarrenResult<()> {
    let config = GenerationConfig {
        width: 9,
        height: 4,
        max_room_size: 4,
        first_stop_size: 3,
        ..GenerationConfig::new(314)
    };
    let mut file = NamedTempFile::new()?;
    file.write_all(config.to_json()?.as_bytes())?;

    let loaded = GenerationConfig::from_json_file(file.path())?;

    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_loaded_config_drives_a_session() -> WarrenResult<()> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"{{ "seed": 5, "width": 5, "height": 3, "min_path_rooms": 1, "max_path_rooms": 2 }}"#
    )?;

    let config = GenerationConfig::from_json_file(file.path())?;
    let session = ViewerSession::new(config)?;

    assert_eq!(session.dungeon().width(), 5);
    assert_eq!(session.dungeon().height(), 3);
    assert!((1..=2).contains(&session.path().len()));
    Ok(())
}

#[test]
fn test_invalid_file_contents() -> WarrenResult<()> {
    let mut broken = NamedTempFile::new()?;
    write!(broken, "{{ not json")?;
    assert!(matches!(
        GenerationConfig::from_json_file(broken.path()),
        Err(WarrenError::Serde(_))
    ));

    let mut zero = NamedTempFile::new()?;
    write!(zero, r#"{{ "width": 0 }}"#)?;
    assert!(matches!(
        GenerationConfig::from_json_file(zero.path()),
        Err(WarrenError::InvalidConfig(_))
    ));

    assert!(matches!(
        GenerationConfig::from_json_file("/definitely/not/here.json"),
        Err(WarrenError::Io(_))
    ));
    Ok(())
}
