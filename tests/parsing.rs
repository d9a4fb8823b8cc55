use std::fs;
use std::path::PathBuf;

use ddo_terminal::club_fetch::{
    parse_auction_status_json, parse_clubs_page_json, parse_contested_json,
};
use ddo_terminal::comment_fetch::parse_comments_json;
use ddo_terminal::match_fetch::{parse_matches_page_json, parse_reports_json};
use ddo_terminal::profile_fetch::parse_profile_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_clubs_page_fixture() {
    let raw = read_fixture("clubs_page.json");
    let page = parse_clubs_page_json(&raw).expect("fixture should parse");
    assert_eq!(page.pagina, 2);
    assert_eq!(page.total_paginas, 4);
    assert_eq!(page.itens.len(), 3);
    assert_eq!(page.itens[0].nome, "Atlético Aurora");
    assert_eq!(page.itens[0].valor_minimo, 100);
    assert!(page.itens[0].escudo.is_some());
    // Absent and explicit-null badge fields both deserialize to None.
    assert!(page.itens[1].escudo.is_none());
    assert!(page.itens[2].escudo.is_none());
}

#[test]
fn parses_auction_status_fixture() {
    let raw = read_fixture("auction_status.json");
    let status = parse_auction_status_json(&raw)
        .expect("fixture should parse")
        .expect("fixture has an auction");
    assert_eq!(status.id, 42);
    assert!(status.aberto);
    assert_eq!(status.encerra_em.as_deref(), Some("2026-08-25T18:30:00Z"));
    assert_eq!(status.saldo, 350);
}

#[test]
fn auction_null_means_no_current_auction() {
    assert!(parse_auction_status_json("null").expect("null should parse").is_none());
    assert!(parse_auction_status_json("").expect("empty should parse").is_none());
    assert!(parse_auction_status_json("  \n").expect("blank should parse").is_none());
}

#[test]
fn parses_contested_fixture_in_server_order() {
    let raw = read_fixture("contested.json");
    let list = parse_contested_json(&raw).expect("fixture should parse");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].clube_id, 8);
    assert_eq!(list[0].lances, 14);
    assert!(list.windows(2).all(|w| w[0].lances >= w[1].lances));
}

#[test]
fn parses_matches_page_fixture() {
    let raw = read_fixture("matches_page.json");
    let page = parse_matches_page_json(&raw).expect("fixture should parse");
    assert_eq!(page.pagina, 1);
    assert_eq!(page.total_paginas, 3);
    assert_eq!(page.itens.len(), 2);
    assert!(page.itens[0].registrada);
    assert_eq!(page.itens[0].gols_mandante, Some(2));
    // Unregistered match carries no scores and defaults to pending.
    assert!(!page.itens[1].registrada);
    assert!(page.itens[1].gols_mandante.is_none());
    assert!(page.itens[1].gols_visitante.is_none());
}

#[test]
fn parses_reports_fixture() {
    let raw = read_fixture("reports.json");
    let reports = parse_reports_json(&raw).expect("fixture should parse");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].id, 501);
    assert_eq!(reports[0].partida_id, 101);
    assert_eq!(reports[1].motivo, "Escalação irregular");
    assert!(reports[1].criada_em.is_none());
}

#[test]
fn parses_comments_fixture() {
    let raw = read_fixture("comments.json");
    let comments = parse_comments_json(&raw).expect("fixture should parse");
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].minha);
    assert!(comments[1].minha);
    assert_eq!(comments[1].autor, "eu_mesmo");
}

#[test]
fn parses_profile_fixture() {
    let raw = read_fixture("profile.json");
    let profile = parse_profile_json(&raw)
        .expect("fixture should parse")
        .expect("fixture has a profile");
    assert_eq!(profile.nome, "Presidente Aurora");
    assert_eq!(profile.time.as_deref(), Some("Atlético Aurora"));
    assert_eq!(profile.saldo, 350);
    assert_eq!(profile.vitorias, 11);
    assert_eq!(profile.derrotas, 4);
}

#[test]
fn empty_and_null_payloads_yield_empty_models() {
    assert!(parse_clubs_page_json("null").expect("null should parse").itens.is_empty());
    assert!(parse_matches_page_json("").expect("empty should parse").itens.is_empty());
    assert!(parse_contested_json("null").expect("null should parse").is_empty());
    assert!(parse_reports_json("null").expect("null should parse").is_empty());
    assert!(parse_comments_json("").expect("empty should parse").is_empty());
    assert!(parse_profile_json("null").expect("null should parse").is_none());
}

#[test]
fn malformed_payloads_are_errors() {
    assert!(parse_clubs_page_json("{ not json").is_err());
    assert!(parse_auction_status_json("[1,2,3]").is_err());
    assert!(parse_contested_json("{\"clube_id\": 1}").is_err());
    assert!(parse_profile_json("\"perfil\"").is_err());
}
