//! The caller's own profile: fetch and name update.

use anyhow::{Context, Result};

use crate::http_cache::{self, fetch_json_cached};
use crate::http_client::{api_base, bearer_token, http_client, put_json};
use crate::state::Profile;

pub fn fetch_profile() -> Result<Option<Profile>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, &profile_url(), bearer_token().as_deref())
        .context("request failed")?;
    parse_profile_json(&body)
}

pub fn update_profile_name(nome: &str) -> Result<()> {
    let payload = serde_json::json!({ "nome": nome });
    put_json(&profile_url(), &payload).context("profile update failed")?;
    http_cache::invalidate(&profile_url());
    Ok(())
}

pub fn parse_profile_json(raw: &str) -> Result<Option<Profile>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .context("invalid profile json")
}

fn profile_url() -> String {
    format!("{}/perfil", api_base())
}
