//! Local device storage: session token, theme choice and a snapshot of the
//! read models so the gallery and profile render before the first poll
//! completes. The bid cart is deliberately absent; it never survives the
//! process.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, Club, MatchRow, Profile, Theme};

const CONFIG_DIR: &str = "ddo_terminal";
const SESSION_FILE: &str = "session.json";
const SESSION_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub version: u32,
    #[serde(default)]
    pub token: Option<String>,
    pub theme: Theme,
    #[serde(default)]
    pub clubs: Vec<Club>,
    #[serde(default)]
    pub matches: Vec<MatchRow>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub saved_at: Option<u64>,
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            token: None,
            theme: Theme::Dark,
            clubs: Vec::new(),
            matches: Vec::new(),
            profile: None,
            saved_at: None,
        }
    }
}

pub fn load_session() -> Option<SessionFile> {
    load_session_file(&session_path()?)
}

/// Reads and version-gates a session file. Any read or parse failure, or a
/// version mismatch, yields `None` and the caller starts fresh.
pub fn load_session_file(path: &Path) -> Option<SessionFile> {
    let raw = fs::read_to_string(path).ok()?;
    let session = serde_json::from_str::<SessionFile>(&raw).ok()?;
    if session.version != SESSION_VERSION {
        return None;
    }
    Some(session)
}

pub fn save_session_file(path: &Path, session: &SessionFile) -> Result<()> {
    let dir = path.parent().context("session path has no parent")?;
    fs::create_dir_all(dir).context("create config dir")?;
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(session).context("serialize session")?;
    fs::write(&tmp, json).context("write session")?;
    fs::rename(&tmp, path).context("swap session")?;
    Ok(())
}

pub fn load_into_state(state: &mut AppState) {
    let Some(session) = load_session() else {
        return;
    };
    state.theme = session.theme;
    if !session.clubs.is_empty() {
        state.clubs = session.clubs;
    }
    if !session.matches.is_empty() {
        state.matches = session.matches;
    }
    if session.profile.is_some() {
        state.profile = session.profile;
    }
    state.clamp_selections();
}

pub fn save_from_state(state: &AppState) {
    let Some(path) = session_path() else {
        return;
    };
    let previous = load_session_file(&path).unwrap_or_default();
    let session = SessionFile {
        version: SESSION_VERSION,
        token: previous.token,
        theme: state.theme,
        clubs: state.clubs.clone(),
        matches: state.matches.clone(),
        profile: state.profile.clone(),
        saved_at: system_time_to_secs(SystemTime::now()),
    };
    let _ = save_session_file(&path, &session);
}

fn session_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CONFIG_DIR).join(SESSION_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR)
            .join(SESSION_FILE),
    )
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
