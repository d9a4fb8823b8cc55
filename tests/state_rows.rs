use chrono::{TimeZone, Utc};
use ddo_terminal::state::{
    AppState, AuctionFocus, AuctionStatus, Club, ContestedClub, Screen, Theme,
};

fn club(id: u64) -> Club {
    Club { id, nome: format!("Clube {id}"), valor_minimo: 100, escudo: None }
}

fn state_with_clubs(n: u64) -> AppState {
    let mut state = AppState::new();
    state.clubs = (1..=n).map(club).collect();
    state.clubs_loaded_pages = 1;
    state.clubs_total_pages = Some(2);
    state
}

#[test]
fn selection_wraps_in_both_directions() {
    let mut state = state_with_clubs(3);
    assert_eq!(state.gallery_selected, 0);
    state.select_prev();
    assert_eq!(state.gallery_selected, 2);
    state.select_next();
    assert_eq!(state.gallery_selected, 0);
    state.select_next();
    state.select_next();
    state.select_next();
    assert_eq!(state.gallery_selected, 0);
}

#[test]
fn selection_follows_auction_focus() {
    let mut state = state_with_clubs(3);
    state.cart.add(1, "Clube 1", 100).expect("add should succeed");
    state.cart.add(2, "Clube 2", 100).expect("add should succeed");

    state.select_next();
    assert_eq!(state.gallery_selected, 1);
    assert_eq!(state.cart_selected, 0);

    state.focus = AuctionFocus::Cart;
    state.select_next();
    assert_eq!(state.gallery_selected, 1);
    assert_eq!(state.cart_selected, 1);
}

#[test]
fn selection_on_empty_list_stays_at_zero() {
    let mut state = AppState::new();
    state.screen = Screen::Partidas;
    state.select_next();
    state.select_prev();
    assert_eq!(state.match_selected, 0);
}

#[test]
fn gallery_requests_next_page_near_the_end() {
    let mut state = state_with_clubs(20);
    state.gallery_selected = 0;
    assert!(!state.gallery_wants_next_page());

    state.gallery_selected = 15; // within the prefetch margin of 20
    assert!(state.gallery_wants_next_page());

    state.clubs_loading = true;
    assert!(!state.gallery_wants_next_page());

    state.clubs_loading = false;
    state.clubs_loaded_pages = 2; // all pages loaded
    assert!(!state.gallery_wants_next_page());
}

#[test]
fn first_page_is_wanted_before_any_load() {
    let state = AppState::new();
    assert!(state.gallery_wants_next_page());
    assert!(state.matches_want_next_page());
}

#[test]
fn clamp_pulls_selections_back_into_range() {
    let mut state = state_with_clubs(5);
    state.gallery_selected = 4;
    state.clubs.truncate(2);
    state.clamp_selections();
    assert_eq!(state.gallery_selected, 1);

    state.clubs.clear();
    state.clamp_selections();
    assert_eq!(state.gallery_selected, 0);
}

#[test]
fn auction_remaining_parses_the_closing_instant() {
    let mut state = AppState::new();
    state.auction = Some(AuctionStatus {
        id: 1,
        aberto: true,
        encerra_em: Some("2026-08-25T18:30:00Z".to_string()),
        saldo: 0,
    });
    let now = Utc.with_ymd_and_hms(2026, 8, 25, 18, 0, 0).single().expect("valid instant");
    let left = state.auction_remaining(now).expect("closing time is set");
    assert_eq!(left.num_minutes(), 30);
}

#[test]
fn auction_remaining_is_none_without_a_parseable_instant() {
    let mut state = AppState::new();
    assert!(state.auction_remaining(Utc::now()).is_none());

    state.auction = Some(AuctionStatus { id: 1, aberto: true, encerra_em: None, saldo: 0 });
    assert!(state.auction_remaining(Utc::now()).is_none());

    state.auction = Some(AuctionStatus {
        id: 1,
        aberto: true,
        encerra_em: Some("amanhã".to_string()),
        saldo: 0,
    });
    assert!(state.auction_remaining(Utc::now()).is_none());
}

#[test]
fn contested_count_looks_up_by_club() {
    let mut state = AppState::new();
    state.contested = vec![ContestedClub { clube_id: 8, nome: "Horizonte FC".to_string(), lances: 14 }];
    assert_eq!(state.contested_count(8), Some(14));
    assert_eq!(state.contested_count(9), None);
}

#[test]
fn leaving_the_auction_screen_discards_the_cart() {
    let mut state = state_with_clubs(3);
    state.cart.add(1, "Clube 1", 100).expect("add should succeed");
    state.cart_selected = 0;
    state.focus = AuctionFocus::Cart;

    state.leave_auction_screen(Screen::Partidas);

    assert_eq!(state.screen, Screen::Partidas);
    assert!(state.cart.is_empty());
    assert_eq!(state.focus, AuctionFocus::Gallery);
    assert!(state.logs.iter().any(|l| l.contains("Carrinho descartado")));
}

#[test]
fn bid_preferences_reflect_cart_order() {
    let mut state = AppState::new();
    state.cart.add(3, "C", 100).expect("add should succeed");
    state.cart.add(1, "A", 150).expect("add should succeed");
    state.cart.move_item(1, -1);
    state.cart.set_amount(1, 200);

    let prefs = state.bid_preferences();
    assert_eq!(prefs.len(), 2);
    assert_eq!((prefs[0].clube_id, prefs[0].valor, prefs[0].prioridade), (1, 200, 1));
    assert_eq!((prefs[1].clube_id, prefs[1].valor, prefs[1].prioridade), (3, 100, 2));
}

#[test]
fn theme_toggles_between_dark_and_light() {
    let mut state = AppState::new();
    assert_eq!(state.theme, Theme::Dark);
    state.toggle_theme();
    assert_eq!(state.theme, Theme::Light);
    state.toggle_theme();
    assert_eq!(state.theme, Theme::Dark);
}
