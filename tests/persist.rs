use std::fs;
use std::path::PathBuf;

use ddo_terminal::persist::{SessionFile, load_session_file, save_session_file};
use ddo_terminal::state::{Club, Profile, Theme};

fn scratch_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("ddo_terminal_test_{}_{name}", std::process::id()));
    path.push("session.json");
    path
}

fn sample_session() -> SessionFile {
    SessionFile {
        token: Some("tok-123".to_string()),
        theme: Theme::Light,
        clubs: vec![Club {
            id: 1,
            nome: "Atlético Aurora".to_string(),
            valor_minimo: 100,
            escudo: None,
        }],
        matches: Vec::new(),
        profile: Some(Profile {
            id: 7,
            nome: "Presidente Aurora".to_string(),
            time: None,
            saldo: 350,
            vitorias: 11,
            derrotas: 4,
        }),
        saved_at: Some(1_756_000_000),
        ..SessionFile::default()
    }
}

#[test]
fn session_round_trips_through_disk() {
    let path = scratch_path("round_trip");
    let session = sample_session();

    save_session_file(&path, &session).expect("save should succeed");
    let loaded = load_session_file(&path).expect("saved session should load");

    assert_eq!(loaded.token.as_deref(), Some("tok-123"));
    assert_eq!(loaded.theme, Theme::Light);
    assert_eq!(loaded.clubs.len(), 1);
    assert_eq!(loaded.clubs[0].nome, "Atlético Aurora");
    assert_eq!(loaded.profile.as_ref().map(|p| p.saldo), Some(350));
    assert_eq!(loaded.saved_at, Some(1_756_000_000));

    let _ = fs::remove_dir_all(path.parent().expect("scratch dir"));
}

#[test]
fn missing_file_loads_as_none() {
    let path = scratch_path("missing");
    assert!(load_session_file(&path).is_none());
}

#[test]
fn corrupt_file_loads_as_none() {
    let path = scratch_path("corrupt");
    fs::create_dir_all(path.parent().expect("scratch dir")).expect("mkdir should succeed");
    fs::write(&path, "{ not json").expect("write should succeed");
    assert!(load_session_file(&path).is_none());
    let _ = fs::remove_dir_all(path.parent().expect("scratch dir"));
}

#[test]
fn version_mismatch_loads_as_none() {
    let path = scratch_path("version");
    let mut session = sample_session();
    session.version = 99;

    save_session_file(&path, &session).expect("save should succeed");
    assert!(load_session_file(&path).is_none());

    let _ = fs::remove_dir_all(path.parent().expect("scratch dir"));
}

#[test]
fn optional_fields_default_when_absent() {
    let path = scratch_path("defaults");
    fs::create_dir_all(path.parent().expect("scratch dir")).expect("mkdir should succeed");
    fs::write(&path, r#"{"version":1,"theme":"Dark"}"#).expect("write should succeed");

    let loaded = load_session_file(&path).expect("minimal session should load");
    assert!(loaded.token.is_none());
    assert!(loaded.clubs.is_empty());
    assert!(loaded.matches.is_empty());
    assert!(loaded.profile.is_none());
    assert!(loaded.saved_at.is_none());

    let _ = fs::remove_dir_all(path.parent().expect("scratch dir"));
}
