//! Background provider: owns all network I/O, polls the read feeds on fixed
//! intervals and executes UI commands, reporting back over the delta channel.
//! Poll results simply replace displayed data; the cart and other edits live
//! in UI-owned state, so no ordering between polls and edits is required.

use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::state::{Delta, ProviderCommand};
use crate::{club_fetch, comment_fetch, match_fetch, profile_fetch};

fn poll_interval(key: &str, default_secs: u64, floor_secs: u64) -> Duration {
    Duration::from_secs(
        env::var(key)
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(default_secs)
            .max(floor_secs),
    )
}

pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let auction_interval = poll_interval("AUCTION_POLL_SECS", 30, 5);
        let contested_interval = poll_interval("CONTESTED_POLL_SECS", 60, 10);
        let matches_interval = poll_interval("MATCHES_POLL_SECS", 120, 30);

        let mut auction_open = false;

        // Warm start so the first frame has something to show.
        refresh_auction(&tx, &mut auction_open);
        handle_command(&tx, ProviderCommand::FetchClubsPage { page: 1 }, &mut auction_open);
        handle_command(&tx, ProviderCommand::FetchProfile, &mut auction_open);

        let mut last_auction = Instant::now();
        let mut last_contested: Option<Instant> = None;
        let mut last_matches: Option<Instant> = None;

        loop {
            thread::sleep(Duration::from_millis(900));

            if last_auction.elapsed() >= auction_interval {
                refresh_auction(&tx, &mut auction_open);
                last_auction = Instant::now();
            }

            // The contested ranking only moves while the auction is open.
            let contested_due =
                last_contested.is_none_or(|at| at.elapsed() >= contested_interval);
            if auction_open && contested_due {
                match club_fetch::fetch_contested() {
                    Ok(list) => {
                        let _ = tx.send(Delta::SetContested(list));
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::Log(format!("[WARN] Disputados: {err}")));
                    }
                }
                last_contested = Some(Instant::now());
            }

            if last_matches.is_none_or(|at| at.elapsed() >= matches_interval) {
                match match_fetch::fetch_matches_page(1) {
                    Ok(page) => {
                        let _ = tx.send(Delta::SetMatches {
                            page: page.pagina.max(1),
                            total_pages: page.total_paginas.max(1),
                            rows: page.itens,
                        });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::Log(format!("[WARN] Partidas: {err}")));
                    }
                }
                last_matches = Some(Instant::now());
            }

            while let Ok(cmd) = cmd_rx.try_recv() {
                handle_command(&tx, cmd, &mut auction_open);
            }
        }
    });
}

fn refresh_auction(tx: &Sender<Delta>, auction_open: &mut bool) {
    match club_fetch::fetch_auction_status() {
        Ok(status) => {
            *auction_open = status.as_ref().is_some_and(|s| s.aberto);
            let _ = tx.send(Delta::SetAuctionStatus(status));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Leilão: {err}")));
        }
    }
}

fn handle_command(tx: &Sender<Delta>, cmd: ProviderCommand, auction_open: &mut bool) {
    match cmd {
        ProviderCommand::FetchClubsPage { page } => match club_fetch::fetch_clubs_page(page) {
            Ok(result) => {
                let _ = tx.send(Delta::SetClubsPage {
                    page: result.pagina.max(page),
                    total_pages: result.total_paginas.max(1),
                    clubs: result.itens,
                });
            }
            Err(err) => {
                let _ = tx.send(Delta::ClubsFailed { message: err.to_string() });
            }
        },
        ProviderCommand::FetchAuctionStatus => refresh_auction(tx, auction_open),
        ProviderCommand::FetchContested => match club_fetch::fetch_contested() {
            Ok(list) => {
                let _ = tx.send(Delta::SetContested(list));
            }
            Err(err) => {
                let _ = tx.send(Delta::Log(format!("[WARN] Disputados: {err}")));
            }
        },
        ProviderCommand::SubmitBids(preferences) => {
            match club_fetch::submit_bids(&preferences) {
                Ok(count) => {
                    let _ = tx.send(Delta::BidsAccepted { count });
                    // Balance may have been reserved server-side.
                    refresh_auction(tx, auction_open);
                }
                Err(err) => {
                    let _ = tx.send(Delta::BidsRejected { message: err.to_string() });
                }
            }
        }
        ProviderCommand::FetchMatches { page } => match match_fetch::fetch_matches_page(page) {
            Ok(result) => {
                let _ = tx.send(Delta::SetMatches {
                    page: result.pagina.max(page),
                    total_pages: result.total_paginas.max(1),
                    rows: result.itens,
                });
            }
            Err(err) => {
                let _ = tx.send(Delta::MatchesFailed { message: err.to_string() });
            }
        },
        ProviderCommand::RegisterResult { match_id, home_goals, away_goals } => {
            match match_fetch::register_result(match_id, home_goals, away_goals) {
                Ok(()) => {
                    let _ = tx.send(Delta::ResultRegistered { match_id, home_goals, away_goals });
                }
                Err(err) => {
                    let _ = tx.send(Delta::ResultFailed { message: err.to_string() });
                }
            }
        }
        ProviderCommand::FetchReports => match match_fetch::fetch_pending_reports() {
            Ok(reports) => {
                let _ = tx.send(Delta::SetReports(reports));
            }
            Err(err) => {
                let _ = tx.send(Delta::ReportFailed { message: err.to_string() });
            }
        },
        ProviderCommand::AnalyzeReport { report_id, procedente, note } => {
            match match_fetch::analyze_report(report_id, procedente, &note) {
                Ok(()) => {
                    let _ = tx.send(Delta::ReportAnalyzed { report_id, procedente });
                    if let Ok(reports) = match_fetch::fetch_pending_reports() {
                        let _ = tx.send(Delta::SetReports(reports));
                    }
                }
                Err(err) => {
                    let _ = tx.send(Delta::ReportFailed { message: err.to_string() });
                }
            }
        }
        ProviderCommand::FetchComments { partida_id } => {
            send_comments(tx, partida_id);
        }
        ProviderCommand::PostComment { partida_id, texto } => {
            match comment_fetch::post_comment(partida_id, &texto) {
                Ok(()) => send_comments(tx, partida_id),
                Err(err) => {
                    let _ = tx.send(Delta::CommentFailed { message: err.to_string() });
                }
            }
        }
        ProviderCommand::DeleteComment { comment_id, partida_id } => {
            match comment_fetch::delete_comment(comment_id, partida_id) {
                Ok(()) => send_comments(tx, partida_id),
                Err(err) => {
                    let _ = tx.send(Delta::CommentFailed { message: err.to_string() });
                }
            }
        }
        ProviderCommand::FetchProfile => match profile_fetch::fetch_profile() {
            Ok(Some(profile)) => {
                let _ = tx.send(Delta::SetProfile(profile));
            }
            Ok(None) => {
                let _ = tx.send(Delta::ProfileFailed {
                    message: "perfil não encontrado".to_string(),
                });
            }
            Err(err) => {
                let _ = tx.send(Delta::ProfileFailed { message: err.to_string() });
            }
        },
        ProviderCommand::UpdateProfile { nome } => {
            match profile_fetch::update_profile_name(&nome) {
                Ok(()) => match profile_fetch::fetch_profile() {
                    Ok(Some(profile)) => {
                        let _ = tx.send(Delta::SetProfile(profile));
                        let _ = tx.send(Delta::Log("[INFO] Perfil atualizado".to_string()));
                    }
                    Ok(None) | Err(_) => {
                        let _ = tx.send(Delta::ProfileFailed {
                            message: "perfil atualizado, releitura falhou".to_string(),
                        });
                    }
                },
                Err(err) => {
                    let _ = tx.send(Delta::ProfileFailed { message: err.to_string() });
                }
            }
        }
    }
}

fn send_comments(tx: &Sender<Delta>, partida_id: u64) {
    match comment_fetch::fetch_comments(partida_id) {
        Ok(comments) => {
            let _ = tx.send(Delta::SetComments { partida_id, comments });
        }
        Err(err) => {
            let _ = tx.send(Delta::CommentFailed { message: err.to_string() });
        }
    }
}
