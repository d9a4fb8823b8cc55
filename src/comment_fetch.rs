//! Comment thread of a match: list, post, delete.

use anyhow::{Context, Result};

use crate::http_cache::{self, fetch_json_cached};
use crate::http_client::{api_base, bearer_token, delete, http_client, post_json};
use crate::state::Comment;

pub fn fetch_comments(partida_id: u64) -> Result<Vec<Comment>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, &comments_url(partida_id), bearer_token().as_deref())
        .context("request failed")?;
    parse_comments_json(&body)
}

pub fn post_comment(partida_id: u64, texto: &str) -> Result<()> {
    let payload = serde_json::json!({ "texto": texto });
    post_json(&comments_url(partida_id), &payload).context("comment post failed")?;
    http_cache::invalidate(&comments_url(partida_id));
    Ok(())
}

pub fn delete_comment(comment_id: u64, partida_id: u64) -> Result<()> {
    let url = format!("{}/comentarios/{comment_id}", api_base());
    delete(&url).context("comment delete failed")?;
    http_cache::invalidate(&comments_url(partida_id));
    Ok(())
}

pub fn parse_comments_json(raw: &str) -> Result<Vec<Comment>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid comments json")
}

fn comments_url(partida_id: u64) -> String {
    format!("{}/partidas/{partida_id}/comentarios", api_base())
}
