use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::BidCart;

/// How close the list selection may get to the end of the loaded pages
/// before the next page is requested (infinite scroll).
pub const PAGE_PREFETCH_MARGIN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Leilao,
    Partidas,
    Denuncias,
    Comentarios { partida_id: u64 },
    Perfil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionFocus {
    Gallery,
    Cart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Club {
    pub id: u64,
    pub nome: String,
    pub valor_minimo: u64,
    #[serde(default)]
    pub escudo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionStatus {
    pub id: u64,
    pub aberto: bool,
    /// Closing instant as received from the API (RFC 3339); parsed on render.
    #[serde(default)]
    pub encerra_em: Option<String>,
    pub saldo: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestedClub {
    pub clube_id: u64,
    pub nome: String,
    pub lances: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: u64,
    pub mandante: String,
    pub visitante: String,
    #[serde(default)]
    pub gols_mandante: Option<u8>,
    #[serde(default)]
    pub gols_visitante: Option<u8>,
    #[serde(default)]
    pub registrada: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: u64,
    pub partida_id: u64,
    pub autor: String,
    pub motivo: String,
    #[serde(default)]
    pub criada_em: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub partida_id: u64,
    pub autor: String,
    pub texto: String,
    #[serde(default)]
    pub criada_em: Option<String>,
    #[serde(default)]
    pub minha: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub nome: String,
    #[serde(default)]
    pub time: Option<String>,
    pub saldo: u64,
    #[serde(default)]
    pub vitorias: u32,
    #[serde(default)]
    pub derrotas: u32,
}

/// One entry of the ordered preference list posted on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BidPreference {
    pub clube_id: u64,
    pub valor: u64,
    pub prioridade: u8,
}

/// In-progress amount edit for one cart item. Raw digits accumulate in
/// `buffer`; the parsed value is pushed into the cart on every change and
/// normalized against the club minimum on blur.
#[derive(Debug, Clone)]
pub struct AmountEdit {
    pub club_id: u64,
    pub minimum: u64,
    pub buffer: String,
}

/// Score entry form for registering a match result.
#[derive(Debug, Clone)]
pub struct ResultForm {
    pub match_id: u64,
    pub home_goals: String,
    pub away_goals: String,
    pub editing_away: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub theme: Theme,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    /// Prominent one-line banner (validation failures, submit errors).
    pub banner: Option<String>,

    // Leilão
    pub clubs: Vec<Club>,
    pub clubs_total_pages: Option<u32>,
    pub clubs_loaded_pages: u32,
    pub clubs_loading: bool,
    pub gallery_selected: usize,
    pub auction: Option<AuctionStatus>,
    pub auction_checked: bool,
    pub contested: Vec<ContestedClub>,
    pub cart: BidCart,
    pub cart_selected: usize,
    pub amount_edit: Option<AmountEdit>,
    pub focus: AuctionFocus,
    pub submitting: bool,
    last_auction_id: Option<u64>,

    // Partidas
    pub matches: Vec<MatchRow>,
    pub matches_total_pages: Option<u32>,
    pub matches_loaded_pages: u32,
    pub matches_loading: bool,
    pub match_selected: usize,
    pub result_form: Option<ResultForm>,
    pub registering: bool,

    // Denúncias
    pub reports: Vec<Report>,
    pub report_selected: usize,
    pub reports_loading: bool,
    pub report_note: String,
    pub report_note_active: bool,
    pub analyzing: bool,

    // Comentários
    pub comments: Vec<Comment>,
    pub comment_selected: usize,
    pub comments_loading: bool,
    pub comment_draft: String,
    pub comment_compose_active: bool,
    pub commenting: bool,

    // Perfil
    pub profile: Option<Profile>,
    pub profile_loading: bool,
    pub name_edit: Option<String>,
    pub profile_saving: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Leilao,
            theme: Theme::Dark,
            help_overlay: false,
            logs: VecDeque::with_capacity(200),
            banner: None,
            clubs: Vec::with_capacity(32),
            clubs_total_pages: None,
            clubs_loaded_pages: 0,
            clubs_loading: false,
            gallery_selected: 0,
            auction: None,
            auction_checked: false,
            contested: Vec::new(),
            cart: BidCart::new(),
            cart_selected: 0,
            amount_edit: None,
            focus: AuctionFocus::Gallery,
            submitting: false,
            last_auction_id: None,
            matches: Vec::with_capacity(32),
            matches_total_pages: None,
            matches_loaded_pages: 0,
            matches_loading: false,
            match_selected: 0,
            result_form: None,
            registering: false,
            reports: Vec::new(),
            report_selected: 0,
            reports_loading: false,
            report_note: String::new(),
            report_note_active: false,
            analyzing: false,
            comments: Vec::new(),
            comment_selected: 0,
            comments_loading: false,
            comment_draft: String::new(),
            comment_compose_active: false,
            commenting: false,
            profile: None,
            profile_loading: false,
            name_edit: None,
            profile_saving: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_banner(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        self.push_log(format!("[WARN] {msg}"));
        self.banner = Some(msg);
    }

    pub fn balance(&self) -> u64 {
        self.auction.as_ref().map(|a| a.saldo).unwrap_or(0)
    }

    pub fn auction_open(&self) -> bool {
        self.auction.as_ref().is_some_and(|a| a.aberto)
    }

    /// Remaining time until the auction closes, `None` when there is no
    /// auction or the closing time is absent/unparseable.
    pub fn auction_remaining(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        let raw = self.auction.as_ref()?.encerra_em.as_deref()?;
        let ends = DateTime::parse_from_rfc3339(raw.trim()).ok()?;
        Some(ends.with_timezone(&Utc) - now)
    }

    pub fn selected_club(&self) -> Option<&Club> {
        self.clubs.get(self.gallery_selected)
    }

    pub fn selected_match(&self) -> Option<&MatchRow> {
        self.matches.get(self.match_selected)
    }

    pub fn selected_report(&self) -> Option<&Report> {
        self.reports.get(self.report_selected)
    }

    pub fn selected_comment(&self) -> Option<&Comment> {
        self.comments.get(self.comment_selected)
    }

    /// Contested-bid count for a club, when the polling feed has one.
    pub fn contested_count(&self, club_id: u64) -> Option<u32> {
        self.contested
            .iter()
            .find(|c| c.clube_id == club_id)
            .map(|c| c.lances)
    }

    /// True when the gallery selection is close enough to the end of the
    /// loaded pages that the next page should be requested.
    pub fn gallery_wants_next_page(&self) -> bool {
        if self.clubs_loading {
            return false;
        }
        let Some(total) = self.clubs_total_pages else {
            return self.clubs_loaded_pages == 0;
        };
        if self.clubs_loaded_pages >= total {
            return false;
        }
        self.gallery_selected + PAGE_PREFETCH_MARGIN >= self.clubs.len()
    }

    pub fn matches_want_next_page(&self) -> bool {
        if self.matches_loading {
            return false;
        }
        let Some(total) = self.matches_total_pages else {
            return self.matches_loaded_pages == 0;
        };
        if self.matches_loaded_pages >= total {
            return false;
        }
        self.match_selected + PAGE_PREFETCH_MARGIN >= self.matches.len()
    }

    fn active_list_len(&self) -> usize {
        match &self.screen {
            Screen::Leilao => match self.focus {
                AuctionFocus::Gallery => self.clubs.len(),
                AuctionFocus::Cart => self.cart.len(),
            },
            Screen::Partidas => self.matches.len(),
            Screen::Denuncias => self.reports.len(),
            Screen::Comentarios { .. } => self.comments.len(),
            Screen::Perfil => 0,
        }
    }

    fn active_selection_mut(&mut self) -> Option<&mut usize> {
        match &self.screen {
            Screen::Leilao => Some(match self.focus {
                AuctionFocus::Gallery => &mut self.gallery_selected,
                AuctionFocus::Cart => &mut self.cart_selected,
            }),
            Screen::Partidas => Some(&mut self.match_selected),
            Screen::Denuncias => Some(&mut self.report_selected),
            Screen::Comentarios { .. } => Some(&mut self.comment_selected),
            Screen::Perfil => None,
        }
    }

    pub fn select_next(&mut self) {
        let total = self.active_list_len();
        if let Some(selected) = self.active_selection_mut() {
            if total == 0 {
                *selected = 0;
            } else {
                *selected = (*selected + 1) % total;
            }
        }
    }

    pub fn select_prev(&mut self) {
        let total = self.active_list_len();
        if let Some(selected) = self.active_selection_mut() {
            if total == 0 {
                *selected = 0;
            } else if *selected == 0 {
                *selected = total - 1;
            } else {
                *selected -= 1;
            }
        }
    }

    pub fn clamp_selections(&mut self) {
        clamp(&mut self.gallery_selected, self.clubs.len());
        clamp(&mut self.cart_selected, self.cart.len());
        clamp(&mut self.match_selected, self.matches.len());
        clamp(&mut self.report_selected, self.reports.len());
        clamp(&mut self.comment_selected, self.comments.len());
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    /// The cart belongs to the auction screen; leaving it discards the
    /// selection (cleared on navigation away, never persisted).
    pub fn leave_auction_screen(&mut self, to: Screen) {
        if !self.cart.is_empty() {
            self.push_log("[INFO] Carrinho descartado ao sair do leilão");
        }
        self.cart.clear();
        self.cart_selected = 0;
        self.amount_edit = None;
        self.focus = AuctionFocus::Gallery;
        self.screen = to;
    }

    /// Ordered preference list for submission, as currently ranked.
    pub fn bid_preferences(&self) -> Vec<BidPreference> {
        self.cart
            .items()
            .iter()
            .map(|item| BidPreference {
                clube_id: item.club_id,
                valor: item.amount,
                prioridade: item.priority,
            })
            .collect()
    }
}

fn clamp(selected: &mut usize, total: usize) {
    if total == 0 {
        *selected = 0;
    } else if *selected >= total {
        *selected = total - 1;
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetClubsPage {
        page: u32,
        total_pages: u32,
        clubs: Vec<Club>,
    },
    ClubsFailed {
        message: String,
    },
    SetAuctionStatus(Option<AuctionStatus>),
    SetContested(Vec<ContestedClub>),
    BidsAccepted {
        count: usize,
    },
    BidsRejected {
        message: String,
    },
    SetMatches {
        page: u32,
        total_pages: u32,
        rows: Vec<MatchRow>,
    },
    MatchesFailed {
        message: String,
    },
    ResultRegistered {
        match_id: u64,
        home_goals: u8,
        away_goals: u8,
    },
    ResultFailed {
        message: String,
    },
    SetReports(Vec<Report>),
    ReportAnalyzed {
        report_id: u64,
        procedente: bool,
    },
    ReportFailed {
        message: String,
    },
    SetComments {
        partida_id: u64,
        comments: Vec<Comment>,
    },
    CommentFailed {
        message: String,
    },
    SetProfile(Profile),
    ProfileFailed {
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    FetchClubsPage { page: u32 },
    FetchAuctionStatus,
    FetchContested,
    SubmitBids(Vec<BidPreference>),
    FetchMatches { page: u32 },
    RegisterResult { match_id: u64, home_goals: u8, away_goals: u8 },
    FetchReports,
    AnalyzeReport { report_id: u64, procedente: bool, note: String },
    FetchComments { partida_id: u64 },
    PostComment { partida_id: u64, texto: String },
    DeleteComment { comment_id: u64, partida_id: u64 },
    FetchProfile,
    UpdateProfile { nome: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetClubsPage { page, total_pages, clubs } => {
            state.clubs_loading = false;
            state.clubs_total_pages = Some(total_pages);
            state.clubs_loaded_pages = state.clubs_loaded_pages.max(page);
            for club in clubs {
                if let Some(existing) = state.clubs.iter_mut().find(|c| c.id == club.id) {
                    *existing = club;
                } else {
                    state.clubs.push(club);
                }
            }
            state.clamp_selections();
        }
        Delta::ClubsFailed { message } => {
            state.clubs_loading = false;
            state.push_log(format!("[WARN] Clubes: {message}"));
        }
        Delta::SetAuctionStatus(status) => {
            state.auction_checked = true;
            let incoming_id = status.as_ref().map(|s| s.id);
            // A new auction id (or the auction vanishing) starts a fresh
            // session: the cart from the previous one is meaningless.
            if state.last_auction_id.is_some() && state.last_auction_id != incoming_id {
                if !state.cart.is_empty() {
                    state.push_log("[INFO] Novo leilão: carrinho reiniciado");
                }
                state.cart.clear();
                state.cart_selected = 0;
                state.amount_edit = None;
                state.submitting = false;
            }
            state.last_auction_id = incoming_id;
            state.auction = status;
        }
        Delta::SetContested(list) => {
            state.contested = list;
        }
        Delta::BidsAccepted { count } => {
            state.submitting = false;
            state.cart.clear();
            state.cart_selected = 0;
            state.amount_edit = None;
            state.banner = None;
            state.push_log(format!("[INFO] {count} lance(s) enviados"));
        }
        Delta::BidsRejected { message } => {
            // Cart stays intact so the user can retry.
            state.submitting = false;
            state.set_banner(format!("Envio de lances falhou: {message}"));
        }
        Delta::SetMatches { page, total_pages, rows } => {
            state.matches_loading = false;
            state.matches_total_pages = Some(total_pages);
            state.matches_loaded_pages = state.matches_loaded_pages.max(page);
            for row in rows {
                if let Some(existing) = state.matches.iter_mut().find(|m| m.id == row.id) {
                    *existing = row;
                } else {
                    state.matches.push(row);
                }
            }
            state.clamp_selections();
        }
        Delta::MatchesFailed { message } => {
            state.matches_loading = false;
            state.push_log(format!("[WARN] Partidas: {message}"));
        }
        Delta::ResultRegistered { match_id, home_goals, away_goals } => {
            state.registering = false;
            state.result_form = None;
            if let Some(row) = state.matches.iter_mut().find(|m| m.id == match_id) {
                row.gols_mandante = Some(home_goals);
                row.gols_visitante = Some(away_goals);
                row.registrada = true;
            }
            state.banner = None;
            state.push_log(format!(
                "[INFO] Resultado registrado: partida {match_id} ({home_goals}-{away_goals})"
            ));
        }
        Delta::ResultFailed { message } => {
            state.registering = false;
            state.set_banner(format!("Registro de resultado falhou: {message}"));
        }
        Delta::SetReports(reports) => {
            state.reports_loading = false;
            state.reports = reports;
            state.clamp_selections();
        }
        Delta::ReportAnalyzed { report_id, procedente } => {
            state.analyzing = false;
            state.report_note.clear();
            state.report_note_active = false;
            state.reports.retain(|r| r.id != report_id);
            state.clamp_selections();
            let verdict = if procedente { "procedente" } else { "improcedente" };
            state.push_log(format!("[INFO] Denúncia {report_id}: {verdict}"));
        }
        Delta::ReportFailed { message } => {
            state.analyzing = false;
            state.reports_loading = false;
            state.set_banner(format!("Denúncias: {message}"));
        }
        Delta::SetComments { partida_id, comments } => {
            // Ignore stale responses for a match the user already left.
            if matches!(state.screen, Screen::Comentarios { partida_id: current } if current == partida_id)
            {
                state.comments_loading = false;
                state.commenting = false;
                state.comments = comments;
                state.clamp_selections();
            }
        }
        Delta::CommentFailed { message } => {
            state.comments_loading = false;
            state.commenting = false;
            state.set_banner(format!("Comentários: {message}"));
        }
        Delta::SetProfile(profile) => {
            state.profile_loading = false;
            state.profile_saving = false;
            state.profile = Some(profile);
        }
        Delta::ProfileFailed { message } => {
            state.profile_loading = false;
            state.profile_saving = false;
            state.set_banner(format!("Perfil: {message}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
