//! Offline provider used when no API base is configured (or `DDO_DEMO=1`):
//! serves seeded data and animates bid activity so every screen can be
//! exercised without the platform.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use rand::Rng;

use crate::state::{
    AuctionStatus, Club, Comment, ContestedClub, Delta, MatchRow, Profile, ProviderCommand, Report,
};

const DEMO_PAGE_SIZE: usize = 8;
const DEMO_AUCTION_ID: u64 = 7;

pub fn spawn_demo_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let clubs = seed_clubs();
        let ends_at = Utc::now() + ChronoDuration::minutes(90);
        let mut status = AuctionStatus {
            id: DEMO_AUCTION_ID,
            aberto: true,
            encerra_em: Some(ends_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            saldo: 500,
        };
        let mut contested = seed_contested(&clubs);
        let mut matches = seed_matches();
        let mut reports = seed_reports();
        let mut comments: HashMap<u64, Vec<Comment>> = seed_comments();
        let mut next_comment_id: u64 = 1000;
        let mut profile = Profile {
            id: 1,
            nome: "Presidente Demo".to_string(),
            time: Some("DDO United".to_string()),
            saldo: 500,
            vitorias: 11,
            derrotas: 4,
        };

        let _ = tx.send(Delta::Log("[INFO] Modo demonstração (sem DDO_API_BASE)".to_string()));
        let _ = tx.send(Delta::SetAuctionStatus(Some(status.clone())));
        let _ = tx.send(Delta::SetContested(contested.clone()));
        let _ = tx.send(Delta::SetProfile(profile.clone()));
        send_clubs_page(&tx, &clubs, 1);

        let mut last_jitter = Instant::now();

        loop {
            thread::sleep(Duration::from_millis(900));

            if Utc::now() >= ends_at && status.aberto {
                status.aberto = false;
                let _ = tx.send(Delta::SetAuctionStatus(Some(status.clone())));
                let _ = tx.send(Delta::Log("[ALERT] Leilão encerrado".to_string()));
            }

            // Simulated rival activity on the contested board.
            if status.aberto && last_jitter.elapsed() >= Duration::from_secs(5) {
                if !contested.is_empty() {
                    let idx = rng.gen_range(0..contested.len());
                    contested[idx].lances += rng.gen_range(1..=3);
                    contested.sort_by(|a, b| b.lances.cmp(&a.lances));
                    let _ = tx.send(Delta::SetContested(contested.clone()));
                    if rng.gen_bool(0.25) {
                        let hot = &contested[0];
                        let _ = tx.send(Delta::Log(format!(
                            "[INFO] Disputa em alta: {} ({} lances)",
                            hot.nome, hot.lances
                        )));
                    }
                }
                last_jitter = Instant::now();
            }

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::FetchClubsPage { page } => {
                        send_clubs_page(&tx, &clubs, page);
                    }
                    ProviderCommand::FetchAuctionStatus => {
                        let _ = tx.send(Delta::SetAuctionStatus(Some(status.clone())));
                    }
                    ProviderCommand::FetchContested => {
                        let _ = tx.send(Delta::SetContested(contested.clone()));
                    }
                    ProviderCommand::SubmitBids(preferences) => {
                        if !status.aberto {
                            let _ = tx.send(Delta::BidsRejected {
                                message: "leilão já encerrado".to_string(),
                            });
                            continue;
                        }
                        for preference in &preferences {
                            if let Some(entry) = contested
                                .iter_mut()
                                .find(|c| c.clube_id == preference.clube_id)
                            {
                                entry.lances += 1;
                            }
                        }
                        let highest = preferences.iter().map(|p| p.valor).max().unwrap_or(0);
                        status.saldo = status.saldo.saturating_sub(highest);
                        profile.saldo = status.saldo;
                        let _ = tx.send(Delta::BidsAccepted { count: preferences.len() });
                        let _ = tx.send(Delta::SetAuctionStatus(Some(status.clone())));
                        let _ = tx.send(Delta::SetContested(contested.clone()));
                    }
                    ProviderCommand::FetchMatches { page } => {
                        let _ = tx.send(Delta::SetMatches {
                            page: page.max(1),
                            total_pages: 1,
                            rows: matches.clone(),
                        });
                    }
                    ProviderCommand::RegisterResult { match_id, home_goals, away_goals } => {
                        match matches.iter_mut().find(|m| m.id == match_id) {
                            Some(row) if !row.registrada => {
                                row.gols_mandante = Some(home_goals);
                                row.gols_visitante = Some(away_goals);
                                row.registrada = true;
                                let _ = tx.send(Delta::ResultRegistered {
                                    match_id,
                                    home_goals,
                                    away_goals,
                                });
                            }
                            Some(_) => {
                                let _ = tx.send(Delta::ResultFailed {
                                    message: "resultado já registrado".to_string(),
                                });
                            }
                            None => {
                                let _ = tx.send(Delta::ResultFailed {
                                    message: "partida desconhecida".to_string(),
                                });
                            }
                        }
                    }
                    ProviderCommand::FetchReports => {
                        let _ = tx.send(Delta::SetReports(reports.clone()));
                    }
                    ProviderCommand::AnalyzeReport { report_id, procedente, .. } => {
                        let before = reports.len();
                        reports.retain(|r| r.id != report_id);
                        if reports.len() != before {
                            let _ = tx.send(Delta::ReportAnalyzed { report_id, procedente });
                            let _ = tx.send(Delta::SetReports(reports.clone()));
                        } else {
                            let _ = tx.send(Delta::ReportFailed {
                                message: "denúncia desconhecida".to_string(),
                            });
                        }
                    }
                    ProviderCommand::FetchComments { partida_id } => {
                        let _ = tx.send(Delta::SetComments {
                            partida_id,
                            comments: comments.get(&partida_id).cloned().unwrap_or_default(),
                        });
                    }
                    ProviderCommand::PostComment { partida_id, texto } => {
                        next_comment_id += 1;
                        comments.entry(partida_id).or_default().push(Comment {
                            id: next_comment_id,
                            partida_id,
                            autor: profile.nome.clone(),
                            texto,
                            criada_em: Some(
                                Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                            ),
                            minha: true,
                        });
                        let _ = tx.send(Delta::SetComments {
                            partida_id,
                            comments: comments.get(&partida_id).cloned().unwrap_or_default(),
                        });
                    }
                    ProviderCommand::DeleteComment { comment_id, partida_id } => {
                        if let Some(thread) = comments.get_mut(&partida_id) {
                            thread.retain(|c| c.id != comment_id);
                        }
                        let _ = tx.send(Delta::SetComments {
                            partida_id,
                            comments: comments.get(&partida_id).cloned().unwrap_or_default(),
                        });
                    }
                    ProviderCommand::FetchProfile => {
                        let _ = tx.send(Delta::SetProfile(profile.clone()));
                    }
                    ProviderCommand::UpdateProfile { nome } => {
                        profile.nome = nome;
                        let _ = tx.send(Delta::SetProfile(profile.clone()));
                        let _ = tx.send(Delta::Log("[INFO] Perfil atualizado".to_string()));
                    }
                }
            }
        }
    });
}

fn send_clubs_page(tx: &Sender<Delta>, clubs: &[Club], page: u32) {
    let total_pages = clubs.len().div_ceil(DEMO_PAGE_SIZE).max(1) as u32;
    let page = page.clamp(1, total_pages);
    let start = (page as usize - 1) * DEMO_PAGE_SIZE;
    let end = (start + DEMO_PAGE_SIZE).min(clubs.len());
    let _ = tx.send(Delta::SetClubsPage {
        page,
        total_pages,
        clubs: clubs[start..end].to_vec(),
    });
}

fn seed_clubs() -> Vec<Club> {
    let table: &[(&str, u64)] = &[
        ("Atlético Aurora", 100),
        ("Botafogo da Serra", 150),
        ("Cruzeiro do Vale", 200),
        ("Dínamo Paulista", 120),
        ("Estrela do Norte", 250),
        ("Fortaleza Real", 180),
        ("Guarani da Mata", 90),
        ("Horizonte FC", 300),
        ("Independente AC", 140),
        ("Juventude Mineira", 110),
        ("Kaiserland EC", 220),
        ("Litoral United", 160),
        ("Montanha Clube", 130),
        ("Nacional do Sul", 280),
    ];
    table
        .iter()
        .enumerate()
        .map(|(idx, (nome, minimo))| Club {
            id: idx as u64 + 1,
            nome: nome.to_string(),
            valor_minimo: *minimo,
            escudo: None,
        })
        .collect()
}

fn seed_contested(clubs: &[Club]) -> Vec<ContestedClub> {
    clubs
        .iter()
        .take(5)
        .enumerate()
        .map(|(idx, club)| ContestedClub {
            clube_id: club.id,
            nome: club.nome.clone(),
            lances: (5 - idx as u32) * 3,
        })
        .collect()
}

fn seed_matches() -> Vec<MatchRow> {
    vec![
        MatchRow {
            id: 101,
            mandante: "Atlético Aurora".to_string(),
            visitante: "Cruzeiro do Vale".to_string(),
            gols_mandante: Some(2),
            gols_visitante: Some(1),
            registrada: true,
        },
        MatchRow {
            id: 102,
            mandante: "Estrela do Norte".to_string(),
            visitante: "Guarani da Mata".to_string(),
            gols_mandante: None,
            gols_visitante: None,
            registrada: false,
        },
        MatchRow {
            id: 103,
            mandante: "Horizonte FC".to_string(),
            visitante: "Litoral United".to_string(),
            gols_mandante: None,
            gols_visitante: None,
            registrada: false,
        },
    ]
}

fn seed_reports() -> Vec<Report> {
    vec![
        Report {
            id: 501,
            partida_id: 101,
            autor: "dirigente_azul".to_string(),
            motivo: "Placar divergente do combinado".to_string(),
            criada_em: Some("2026-08-20T14:03:00Z".to_string()),
        },
        Report {
            id: 502,
            partida_id: 102,
            autor: "torcida_verde".to_string(),
            motivo: "Escalação irregular".to_string(),
            criada_em: Some("2026-08-21T09:41:00Z".to_string()),
        },
    ]
}

fn seed_comments() -> HashMap<u64, Vec<Comment>> {
    let mut map = HashMap::new();
    map.insert(
        101,
        vec![Comment {
            id: 900,
            partida_id: 101,
            autor: "dirigente_azul".to_string(),
            texto: "Grande jogo, parabéns aos dois lados".to_string(),
            criada_em: Some("2026-08-20T15:00:00Z".to_string()),
            minha: false,
        }],
    );
    map
}
