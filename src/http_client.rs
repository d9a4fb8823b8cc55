use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_BASE: &str = "https://api.torneiosddo.com.br";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// API origin, `DDO_API_BASE` with any trailing slash stripped.
pub fn api_base() -> String {
    std::env::var("DDO_API_BASE")
        .ok()
        .map(|base| base.trim().trim_end_matches('/').to_string())
        .filter(|base| !base.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Session bearer token: `DDO_TOKEN` wins over the persisted session so a
/// fresh token can be injected without touching the session file.
pub fn bearer_token() -> Option<String> {
    if let Ok(token) = std::env::var("DDO_TOKEN") {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    crate::persist::load_session().and_then(|session| session.token)
}

fn authorize(req: RequestBuilder) -> RequestBuilder {
    match bearer_token() {
        Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
        None => req,
    }
}

fn send_write(req: RequestBuilder) -> Result<String> {
    let resp = authorize(req).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

/// POST a JSON body; writes bypass the conditional-GET cache entirely.
pub fn post_json<T: Serialize + ?Sized>(url: &str, body: &T) -> Result<String> {
    let client = http_client()?;
    send_write(client.post(url).json(body))
}

pub fn put_json<T: Serialize + ?Sized>(url: &str, body: &T) -> Result<String> {
    let client = http_client()?;
    send_write(client.put(url).json(body))
}

pub fn delete(url: &str) -> Result<String> {
    let client = http_client()?;
    send_write(client.delete(url))
}
