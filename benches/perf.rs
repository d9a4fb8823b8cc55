use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ddo_terminal::cart::BidCart;
use ddo_terminal::club_fetch::{parse_auction_status_json, parse_clubs_page_json, parse_contested_json};
use ddo_terminal::match_fetch::parse_matches_page_json;
use ddo_terminal::state::{AppState, Club, Delta, apply_delta};

fn large_clubs_page(count: usize) -> String {
    let itens: Vec<String> = (1..=count)
        .map(|id| {
            format!(
                r#"{{"id":{id},"nome":"Clube {id}","valor_minimo":{},"escudo":"https://cdn.torneiosddo.com.br/escudos/{id}.png"}}"#,
                100 + (id % 40) * 10
            )
        })
        .collect();
    format!(
        r#"{{"itens":[{}],"pagina":1,"total_paginas":10}}"#,
        itens.join(",")
    )
}

fn bench_clubs_page_parse(c: &mut Criterion) {
    let raw = large_clubs_page(200);
    c.bench_function("clubs_page_parse", |b| {
        b.iter(|| {
            let page = parse_clubs_page_json(black_box(&raw)).unwrap();
            black_box(page.itens.len());
        })
    });
}

fn bench_matches_page_parse(c: &mut Criterion) {
    c.bench_function("matches_page_parse", |b| {
        b.iter(|| {
            let page = parse_matches_page_json(black_box(MATCHES_JSON)).unwrap();
            black_box(page.itens.len());
        })
    });
}

fn bench_auction_status_parse(c: &mut Criterion) {
    c.bench_function("auction_status_parse", |b| {
        b.iter(|| {
            let status = parse_auction_status_json(black_box(AUCTION_JSON)).unwrap();
            black_box(status.is_some());
        })
    });
}

fn bench_contested_parse(c: &mut Criterion) {
    c.bench_function("contested_parse", |b| {
        b.iter(|| {
            let list = parse_contested_json(black_box(CONTESTED_JSON)).unwrap();
            black_box(list.len());
        })
    });
}

fn bench_cart_churn(c: &mut Criterion) {
    c.bench_function("cart_churn", |b| {
        b.iter(|| {
            let mut cart = BidCart::new();
            for id in 1..=5u64 {
                cart.add(id, "Clube", 100).unwrap();
            }
            cart.move_item(4, -1);
            cart.move_item(0, 1);
            cart.remove(3);
            cart.set_amount(1, 40);
            let _ = cart.validate(black_box(1000));
            black_box(cart.len());
        })
    });
}

fn bench_clubs_delta_apply(c: &mut Criterion) {
    let clubs: Vec<Club> = (1..=200u64)
        .map(|id| Club {
            id,
            nome: format!("Clube {id}"),
            valor_minimo: 100,
            escudo: None,
        })
        .collect();

    c.bench_function("clubs_delta_apply", |b| {
        b.iter(|| {
            let mut state = AppState::new();
            apply_delta(
                &mut state,
                Delta::SetClubsPage {
                    page: 1,
                    total_pages: 2,
                    clubs: black_box(clubs.clone()),
                },
            );
            apply_delta(
                &mut state,
                Delta::SetClubsPage {
                    page: 2,
                    total_pages: 2,
                    clubs: black_box(clubs.clone()),
                },
            );
            black_box(state.clubs.len());
        })
    });
}

criterion_group!(
    perf,
    bench_clubs_page_parse,
    bench_matches_page_parse,
    bench_auction_status_parse,
    bench_contested_parse,
    bench_cart_churn,
    bench_clubs_delta_apply
);
criterion_main!(perf);

static MATCHES_JSON: &str = include_str!("../tests/fixtures/matches_page.json");
static AUCTION_JSON: &str = include_str!("../tests/fixtures/auction_status.json");
static CONTESTED_JSON: &str = include_str!("../tests/fixtures/contested.json");
