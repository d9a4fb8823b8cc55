//! Auction-side reads and the bid submission write: paginated club gallery,
//! current auction existence/status (incl. the caller's balance), the "most
//! contested" ranking, and the preference-list POST.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::http_cache::fetch_json_cached;
use crate::http_client::{api_base, bearer_token, http_client, post_json};
use crate::state::{AuctionStatus, BidPreference, Club, ContestedClub};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClubsPage {
    #[serde(default)]
    pub itens: Vec<Club>,
    #[serde(default)]
    pub pagina: u32,
    #[serde(default)]
    pub total_paginas: u32,
}

pub fn fetch_clubs_page(page: u32) -> Result<ClubsPage> {
    let client = http_client()?;
    let url = format!("{}/clubes?page={page}", api_base());
    let body = fetch_json_cached(client, &url, bearer_token().as_deref())
        .context("request failed")?;
    parse_clubs_page_json(&body)
}

pub fn fetch_auction_status() -> Result<Option<AuctionStatus>> {
    let client = http_client()?;
    let url = format!("{}/leiloes/atual", api_base());
    let body = fetch_json_cached(client, &url, bearer_token().as_deref())
        .context("request failed")?;
    parse_auction_status_json(&body)
}

pub fn fetch_contested() -> Result<Vec<ContestedClub>> {
    let client = http_client()?;
    let url = format!("{}/leiloes/atual/disputados", api_base());
    let body = fetch_json_cached(client, &url, bearer_token().as_deref())
        .context("request failed")?;
    parse_contested_json(&body)
}

/// Submits the full ordered preference list in one call. Returns how many
/// bids the server accepted (it may trim, e.g. an already-sold club).
pub fn submit_bids(preferences: &[BidPreference]) -> Result<usize> {
    let url = format!("{}/leiloes/atual/lances", api_base());
    let payload = serde_json::json!({ "lances": preferences });
    let body = post_json(&url, &payload).context("bid submission failed")?;
    Ok(parse_accepted_count(&body).unwrap_or(preferences.len()))
}

pub fn parse_clubs_page_json(raw: &str) -> Result<ClubsPage> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ClubsPage::default());
    }
    serde_json::from_str(trimmed).context("invalid clubs page json")
}

/// `null` (404 on the auction endpoint) means there is no current auction.
pub fn parse_auction_status_json(raw: &str) -> Result<Option<AuctionStatus>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .context("invalid auction status json")
}

pub fn parse_contested_json(raw: &str) -> Result<Vec<ContestedClub>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid contested list json")
}

fn parse_accepted_count(raw: &str) -> Option<usize> {
    let root: Value = serde_json::from_str(raw.trim()).ok()?;
    root.get("aceitos")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
}
