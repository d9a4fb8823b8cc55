use ddo_terminal::state::{
    AppState, AuctionStatus, Club, Comment, Delta, MatchRow, Report, Screen, apply_delta,
};

fn club(id: u64, nome: &str) -> Club {
    Club { id, nome: nome.to_string(), valor_minimo: 100, escudo: None }
}

fn auction(id: u64, saldo: u64) -> AuctionStatus {
    AuctionStatus { id, aberto: true, encerra_em: None, saldo }
}

fn match_row(id: u64) -> MatchRow {
    MatchRow {
        id,
        mandante: format!("Mandante {id}"),
        visitante: format!("Visitante {id}"),
        gols_mandante: None,
        gols_visitante: None,
        registrada: false,
    }
}

fn comment(id: u64, partida_id: u64) -> Comment {
    Comment {
        id,
        partida_id,
        autor: "alguém".to_string(),
        texto: "texto".to_string(),
        criada_em: None,
        minha: false,
    }
}

#[test]
fn clubs_pages_append_and_dedupe_by_id() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetClubsPage {
            page: 1,
            total_pages: 2,
            clubs: vec![club(1, "A"), club(2, "B")],
        },
    );
    apply_delta(
        &mut state,
        Delta::SetClubsPage {
            page: 2,
            total_pages: 2,
            clubs: vec![club(2, "B renomeado"), club(3, "C")],
        },
    );

    assert_eq!(state.clubs.len(), 3);
    assert_eq!(state.clubs[1].nome, "B renomeado");
    assert_eq!(state.clubs_loaded_pages, 2);
    assert_eq!(state.clubs_total_pages, Some(2));
    assert!(!state.clubs_loading);
}

#[test]
fn repolled_page_does_not_rewind_loaded_pages() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetClubsPage { page: 3, total_pages: 3, clubs: vec![club(9, "I")] },
    );
    apply_delta(
        &mut state,
        Delta::SetClubsPage { page: 1, total_pages: 3, clubs: vec![club(1, "A")] },
    );
    assert_eq!(state.clubs_loaded_pages, 3);
}

#[test]
fn bids_accepted_clears_cart_and_submitting() {
    let mut state = AppState::new();
    state.cart.add(1, "A", 100).expect("add should succeed");
    state.cart.add(2, "B", 100).expect("add should succeed");
    state.cart_selected = 1;
    state.submitting = true;

    apply_delta(&mut state, Delta::BidsAccepted { count: 2 });

    assert!(state.cart.is_empty());
    assert_eq!(state.cart_selected, 0);
    assert!(!state.submitting);
    assert!(state.banner.is_none());
}

#[test]
fn bids_rejected_keeps_cart_for_retry() {
    let mut state = AppState::new();
    state.cart.add(1, "A", 100).expect("add should succeed");
    state.submitting = true;

    apply_delta(
        &mut state,
        Delta::BidsRejected { message: "saldo reservado".to_string() },
    );

    assert_eq!(state.cart.len(), 1);
    assert!(!state.submitting);
    assert!(state.banner.as_deref().is_some_and(|b| b.contains("saldo reservado")));
}

#[test]
fn new_auction_id_resets_the_cart() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetAuctionStatus(Some(auction(1, 500))));
    state.cart.add(1, "A", 100).expect("add should succeed");

    // Same auction repolled: cart survives.
    apply_delta(&mut state, Delta::SetAuctionStatus(Some(auction(1, 400))));
    assert_eq!(state.cart.len(), 1);
    assert_eq!(state.balance(), 400);

    // Different auction id: stale selection is dropped.
    apply_delta(&mut state, Delta::SetAuctionStatus(Some(auction(2, 500))));
    assert!(state.cart.is_empty());
}

#[test]
fn auction_vanishing_resets_the_cart() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetAuctionStatus(Some(auction(1, 500))));
    state.cart.add(1, "A", 100).expect("add should succeed");

    apply_delta(&mut state, Delta::SetAuctionStatus(None));

    assert!(state.cart.is_empty());
    assert!(state.auction.is_none());
    assert!(state.auction_checked);
    assert_eq!(state.balance(), 0);
}

#[test]
fn result_registered_updates_row_and_closes_form() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetMatches { page: 1, total_pages: 1, rows: vec![match_row(101), match_row(102)] },
    );
    state.registering = true;

    apply_delta(
        &mut state,
        Delta::ResultRegistered { match_id: 102, home_goals: 3, away_goals: 1 },
    );

    let row = state.matches.iter().find(|m| m.id == 102).expect("row exists");
    assert!(row.registrada);
    assert_eq!(row.gols_mandante, Some(3));
    assert_eq!(row.gols_visitante, Some(1));
    assert!(!state.registering);
    assert!(state.result_form.is_none());
}

#[test]
fn report_analyzed_removes_it_and_clears_note() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetReports(vec![
            Report {
                id: 501,
                partida_id: 101,
                autor: "a".to_string(),
                motivo: "m".to_string(),
                criada_em: None,
            },
            Report {
                id: 502,
                partida_id: 102,
                autor: "b".to_string(),
                motivo: "m".to_string(),
                criada_em: None,
            },
        ]),
    );
    state.report_selected = 1;
    state.report_note = "nota".to_string();
    state.analyzing = true;

    apply_delta(&mut state, Delta::ReportAnalyzed { report_id: 502, procedente: true });

    assert_eq!(state.reports.len(), 1);
    assert_eq!(state.reports[0].id, 501);
    assert_eq!(state.report_selected, 0);
    assert!(state.report_note.is_empty());
    assert!(!state.analyzing);
}

#[test]
fn report_failure_releases_both_loading_flags() {
    let mut state = AppState::new();
    state.reports_loading = true;
    state.analyzing = true;
    apply_delta(&mut state, Delta::ReportFailed { message: "timeout".to_string() });
    assert!(!state.reports_loading);
    assert!(!state.analyzing);
    assert!(state.banner.is_some());
}

#[test]
fn stale_comments_for_another_match_are_ignored() {
    let mut state = AppState::new();
    state.screen = Screen::Comentarios { partida_id: 101 };
    state.comments_loading = true;

    apply_delta(
        &mut state,
        Delta::SetComments { partida_id: 202, comments: vec![comment(1, 202)] },
    );
    assert!(state.comments.is_empty());
    assert!(state.comments_loading);

    apply_delta(
        &mut state,
        Delta::SetComments { partida_id: 101, comments: vec![comment(2, 101)] },
    );
    assert_eq!(state.comments.len(), 1);
    assert!(!state.comments_loading);
}

#[test]
fn failure_deltas_release_loading_flags() {
    let mut state = AppState::new();
    state.clubs_loading = true;
    state.matches_loading = true;
    state.profile_loading = true;

    apply_delta(&mut state, Delta::ClubsFailed { message: "offline".to_string() });
    apply_delta(&mut state, Delta::MatchesFailed { message: "offline".to_string() });
    apply_delta(&mut state, Delta::ProfileFailed { message: "offline".to_string() });

    assert!(!state.clubs_loading);
    assert!(!state.matches_loading);
    assert!(!state.profile_loading);
}

#[test]
fn log_ring_is_bounded() {
    let mut state = AppState::new();
    for i in 0..300 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] evento {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] evento 299"));
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] evento 100"));
}
