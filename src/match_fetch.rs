//! Match-side operations: the paginated recent-matches list, result
//! registration, and report (denúncia) moderation.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_cache::{self, fetch_json_cached};
use crate::http_client::{api_base, bearer_token, http_client, post_json};
use crate::state::{MatchRow, Report};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MatchesPage {
    #[serde(default)]
    pub itens: Vec<MatchRow>,
    #[serde(default)]
    pub pagina: u32,
    #[serde(default)]
    pub total_paginas: u32,
}

pub fn fetch_matches_page(page: u32) -> Result<MatchesPage> {
    let client = http_client()?;
    let url = format!("{}/partidas?page={page}", api_base());
    let body = fetch_json_cached(client, &url, bearer_token().as_deref())
        .context("request failed")?;
    parse_matches_page_json(&body)
}

/// Registers both scores for a match. The server recomputes standings and
/// balances; the client only reports what was typed.
pub fn register_result(match_id: u64, home_goals: u8, away_goals: u8) -> Result<()> {
    let url = format!("{}/partidas/{match_id}/resultado", api_base());
    let payload = serde_json::json!({
        "gols_mandante": home_goals,
        "gols_visitante": away_goals,
    });
    post_json(&url, &payload).context("result registration failed")?;
    // The matches list changed server-side; drop its validators so the next
    // poll refetches instead of replaying a 304.
    http_cache::invalidate(&format!("{}/partidas?page=1", api_base()));
    Ok(())
}

pub fn fetch_pending_reports() -> Result<Vec<Report>> {
    let client = http_client()?;
    let url = format!("{}/denuncias?status=pendente", api_base());
    let body = fetch_json_cached(client, &url, bearer_token().as_deref())
        .context("request failed")?;
    parse_reports_json(&body)
}

/// Files the moderation verdict for one report.
pub fn analyze_report(report_id: u64, procedente: bool, note: &str) -> Result<()> {
    let url = format!("{}/denuncias/{report_id}/analise", api_base());
    let payload = serde_json::json!({
        "procedente": procedente,
        "observacao": note,
    });
    post_json(&url, &payload).context("report analysis failed")?;
    http_cache::invalidate(&format!("{}/denuncias?status=pendente", api_base()));
    Ok(())
}

pub fn parse_matches_page_json(raw: &str) -> Result<MatchesPage> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchesPage::default());
    }
    serde_json::from_str(trimmed).context("invalid matches page json")
}

pub fn parse_reports_json(raw: &str) -> Result<Vec<Report>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid reports json")
}
