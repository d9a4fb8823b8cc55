use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use ddo_terminal::cart::{AddError, MAX_BIDS};
use ddo_terminal::state::{
    AmountEdit, AppState, AuctionFocus, Delta, ProviderCommand, ResultForm, Screen, Theme,
    apply_delta,
};
use ddo_terminal::{demo_feed, feed, persist};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[WARN] Provedor indisponível");
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provedor encerrou");
            return false;
        }
        true
    }

    fn on_key(&mut self, key: KeyEvent) {
        // A visible banner is dismissed by the first keypress; the key is
        // then processed normally (except Esc, which only dismisses).
        if self.state.banner.take().is_some() && key.code == KeyCode::Esc {
            return;
        }

        if self.handle_edit_mode(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('t') => {
                self.state.toggle_theme();
                persist::save_from_state(&self.state);
            }
            KeyCode::Char('1') => self.go_to(Screen::Leilao),
            KeyCode::Char('2') => self.go_to(Screen::Partidas),
            KeyCode::Char('3') => self.go_to(Screen::Denuncias),
            KeyCode::Char('4') => self.go_to(Screen::Perfil),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            _ => match self.state.screen.clone() {
                Screen::Leilao => self.on_key_leilao(key),
                Screen::Partidas => self.on_key_partidas(key),
                Screen::Denuncias => self.on_key_denuncias(key),
                Screen::Comentarios { partida_id } => self.on_key_comentarios(key, partida_id),
                Screen::Perfil => self.on_key_perfil(key),
            },
        }
    }

    fn go_to(&mut self, screen: Screen) {
        if screen == self.state.screen {
            return;
        }
        if matches!(self.state.screen, Screen::Leilao) {
            self.state.leave_auction_screen(screen.clone());
        } else {
            self.state.screen = screen.clone();
        }
        match screen {
            Screen::Partidas => {
                if self.state.matches.is_empty() && !self.state.matches_loading {
                    self.request_matches_page(1);
                }
            }
            Screen::Denuncias => {
                if !self.state.reports_loading {
                    self.state.reports_loading = true;
                    self.send(ProviderCommand::FetchReports);
                }
            }
            Screen::Perfil => {
                if self.state.profile.is_none() && !self.state.profile_loading {
                    self.state.profile_loading = true;
                    self.send(ProviderCommand::FetchProfile);
                }
            }
            Screen::Leilao | Screen::Comentarios { .. } => {}
        }
    }

    /// Keystrokes while a text field is active. Returns true when consumed.
    fn handle_edit_mode(&mut self, key: KeyEvent) -> bool {
        if let Some(edit) = self.state.amount_edit.clone() {
            self.on_key_amount_edit(key, edit);
            return true;
        }
        if self.state.result_form.is_some() {
            self.on_key_result_form(key);
            return true;
        }
        if self.state.report_note_active {
            match key.code {
                KeyCode::Char(c) => self.state.report_note.push(c),
                KeyCode::Backspace => {
                    self.state.report_note.pop();
                }
                KeyCode::Enter | KeyCode::Esc => self.state.report_note_active = false,
                _ => {}
            }
            return true;
        }
        if self.state.comment_compose_active {
            match key.code {
                KeyCode::Char(c) => self.state.comment_draft.push(c),
                KeyCode::Backspace => {
                    self.state.comment_draft.pop();
                }
                KeyCode::Enter => self.submit_comment(),
                KeyCode::Esc => {
                    self.state.comment_compose_active = false;
                    self.state.comment_draft.clear();
                }
                _ => {}
            }
            return true;
        }
        if let Some(mut buffer) = self.state.name_edit.clone() {
            match key.code {
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.state.name_edit = Some(buffer);
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    self.state.name_edit = Some(buffer);
                }
                KeyCode::Enter => {
                    let nome = buffer.trim().to_string();
                    self.state.name_edit = None;
                    if nome.is_empty() {
                        self.state.set_banner("Nome não pode ficar vazio");
                    } else if !self.state.profile_saving {
                        self.state.profile_saving = true;
                        self.send(ProviderCommand::UpdateProfile { nome });
                    }
                }
                KeyCode::Esc => self.state.name_edit = None,
                _ => {}
            }
            return true;
        }
        false
    }

    fn on_key_amount_edit(&mut self, key: KeyEvent, mut edit: AmountEdit) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if edit.buffer.len() < 12 {
                    edit.buffer.push(c);
                }
                let value = edit.buffer.parse::<u64>().unwrap_or(0);
                self.state.cart.set_amount(edit.club_id, value);
                self.state.amount_edit = Some(edit);
            }
            KeyCode::Backspace => {
                edit.buffer.pop();
                let value = edit.buffer.parse::<u64>().unwrap_or(0);
                self.state.cart.set_amount(edit.club_id, value);
                self.state.amount_edit = Some(edit);
            }
            KeyCode::Enter | KeyCode::Esc => {
                // Blur: the intermediate value is clamped up to the minimum.
                if let Some(corrected) = self
                    .state
                    .cart
                    .normalize_on_blur(edit.club_id, edit.minimum)
                {
                    self.state
                        .push_log(format!("[INFO] Lance ajustado ao mínimo: {corrected}"));
                }
                self.state.amount_edit = None;
            }
            _ => {}
        }
    }

    fn on_key_leilao(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.state.focus = match self.state.focus {
                    AuctionFocus::Gallery => AuctionFocus::Cart,
                    AuctionFocus::Cart => AuctionFocus::Gallery,
                };
            }
            KeyCode::Char('a') | KeyCode::Enter
                if self.state.focus == AuctionFocus::Gallery =>
            {
                self.add_selected_club();
            }
            KeyCode::Char('x') if self.state.focus == AuctionFocus::Cart => {
                if let Some(item) = self.state.cart.items().get(self.state.cart_selected) {
                    let club_id = item.club_id;
                    self.state.cart.remove(club_id);
                    self.state.clamp_selections();
                }
            }
            KeyCode::Char('+') if self.state.focus == AuctionFocus::Cart => {
                if self.state.cart.move_item(self.state.cart_selected, -1) {
                    self.state.cart_selected -= 1;
                }
            }
            KeyCode::Char('-') if self.state.focus == AuctionFocus::Cart => {
                if self.state.cart.move_item(self.state.cart_selected, 1) {
                    self.state.cart_selected += 1;
                }
            }
            KeyCode::Char('e') if self.state.focus == AuctionFocus::Cart => {
                if let Some(item) = self.state.cart.items().get(self.state.cart_selected) {
                    self.state.amount_edit = Some(AmountEdit {
                        club_id: item.club_id,
                        minimum: item.minimum,
                        buffer: item.amount.to_string(),
                    });
                }
            }
            KeyCode::Char('s') => self.submit_bids(),
            KeyCode::Char('r') => {
                self.send(ProviderCommand::FetchAuctionStatus);
                self.send(ProviderCommand::FetchContested);
            }
            _ => {}
        }
    }

    fn add_selected_club(&mut self) {
        let Some(club) = self.state.selected_club().cloned() else {
            return;
        };
        match self.state.cart.add(club.id, &club.nome, club.valor_minimo) {
            Ok(()) => {
                self.state
                    .push_log(format!("[INFO] {} no carrinho", club.nome));
            }
            Err(AddError::Full) => {
                self.state
                    .set_banner(format!("Carrinho cheio (máximo {MAX_BIDS} clubes)"));
            }
            Err(AddError::Duplicate) => {
                self.state
                    .set_banner(format!("{} já está no carrinho", club.nome));
            }
        }
    }

    fn submit_bids(&mut self) {
        if self.state.submitting {
            return;
        }
        if !self.state.auction_open() {
            self.state.set_banner("Nenhum leilão aberto no momento");
            return;
        }
        let balance = self.state.balance();
        if let Err(err) = self.state.cart.validate(balance) {
            self.state.set_banner(err.message());
            return;
        }
        let preferences = self.state.bid_preferences();
        self.state.submitting = true;
        if !self.send(ProviderCommand::SubmitBids(preferences)) {
            self.state.submitting = false;
        }
    }

    fn on_key_partidas(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('g') | KeyCode::Enter => {
                let Some(row) = self.state.selected_match() else {
                    return;
                };
                let match_id = row.id;
                if row.registrada {
                    self.state.set_banner("Resultado já registrado para esta partida");
                    return;
                }
                self.state.result_form = Some(ResultForm {
                    match_id,
                    home_goals: String::new(),
                    away_goals: String::new(),
                    editing_away: false,
                });
            }
            KeyCode::Char('c') => {
                if let Some(row) = self.state.selected_match() {
                    let partida_id = row.id;
                    self.state.screen = Screen::Comentarios { partida_id };
                    self.state.comments.clear();
                    self.state.comment_selected = 0;
                    self.state.comments_loading = true;
                    self.send(ProviderCommand::FetchComments { partida_id });
                }
            }
            KeyCode::Char('r') => self.request_matches_page(1),
            _ => {}
        }
    }

    fn on_key_result_form(&mut self, key: KeyEvent) {
        let Some(mut form) = self.state.result_form.clone() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let field = if form.editing_away {
                    &mut form.away_goals
                } else {
                    &mut form.home_goals
                };
                if field.len() < 2 {
                    field.push(c);
                }
                self.state.result_form = Some(form);
            }
            KeyCode::Backspace => {
                let field = if form.editing_away {
                    &mut form.away_goals
                } else {
                    &mut form.home_goals
                };
                field.pop();
                self.state.result_form = Some(form);
            }
            KeyCode::Tab => {
                form.editing_away = !form.editing_away;
                self.state.result_form = Some(form);
            }
            KeyCode::Enter => {
                let (Ok(home_goals), Ok(away_goals)) =
                    (form.home_goals.parse::<u8>(), form.away_goals.parse::<u8>())
                else {
                    self.state.result_form = Some(form);
                    self.state.set_banner("Informe os dois placares");
                    return;
                };
                if self.state.registering {
                    self.state.result_form = Some(form);
                    return;
                }
                self.state.result_form = Some(form.clone());
                self.state.registering = true;
                if !self.send(ProviderCommand::RegisterResult {
                    match_id: form.match_id,
                    home_goals,
                    away_goals,
                }) {
                    self.state.registering = false;
                }
            }
            KeyCode::Esc => self.state.result_form = None,
            _ => {}
        }
    }

    fn on_key_denuncias(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.state.report_note_active = true,
            KeyCode::Char('p') => self.analyze_selected_report(true),
            KeyCode::Char('i') => self.analyze_selected_report(false),
            KeyCode::Char('r') => {
                if !self.state.reports_loading {
                    self.state.reports_loading = true;
                    self.send(ProviderCommand::FetchReports);
                }
            }
            _ => {}
        }
    }

    fn analyze_selected_report(&mut self, procedente: bool) {
        if self.state.analyzing {
            return;
        }
        let Some(report) = self.state.selected_report() else {
            return;
        };
        let report_id = report.id;
        let note = self.state.report_note.trim().to_string();
        self.state.analyzing = true;
        if !self.send(ProviderCommand::AnalyzeReport { report_id, procedente, note }) {
            self.state.analyzing = false;
        }
    }

    fn on_key_comentarios(&mut self, key: KeyEvent, partida_id: u64) {
        match key.code {
            KeyCode::Char('b') | KeyCode::Esc => {
                self.state.screen = Screen::Partidas;
                self.state.comment_draft.clear();
                self.state.comment_compose_active = false;
            }
            KeyCode::Char('n') | KeyCode::Char('c') => {
                self.state.comment_compose_active = true;
            }
            KeyCode::Char('x') => {
                let Some(comment) = self.state.selected_comment() else {
                    return;
                };
                let comment_id = comment.id;
                if !comment.minha {
                    self.state.set_banner("Só é possível excluir o próprio comentário");
                    return;
                }
                if !self.state.commenting {
                    self.state.commenting = true;
                    if !self.send(ProviderCommand::DeleteComment { comment_id, partida_id }) {
                        self.state.commenting = false;
                    }
                }
            }
            KeyCode::Char('r') => {
                if !self.state.comments_loading {
                    self.state.comments_loading = true;
                    self.send(ProviderCommand::FetchComments { partida_id });
                }
            }
            _ => {}
        }
    }

    fn submit_comment(&mut self) {
        let Screen::Comentarios { partida_id } = self.state.screen else {
            return;
        };
        let texto = self.state.comment_draft.trim().to_string();
        if texto.is_empty() {
            self.state.comment_compose_active = false;
            return;
        }
        if self.state.commenting {
            return;
        }
        self.state.commenting = true;
        if self.send(ProviderCommand::PostComment { partida_id, texto }) {
            self.state.comment_draft.clear();
            self.state.comment_compose_active = false;
        } else {
            self.state.commenting = false;
        }
    }

    fn on_key_perfil(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('e') {
            let current = self
                .state
                .profile
                .as_ref()
                .map(|p| p.nome.clone())
                .unwrap_or_default();
            self.state.name_edit = Some(current);
        }
    }

    fn request_matches_page(&mut self, page: u32) {
        if self.state.matches_loading {
            return;
        }
        self.state.matches_loading = true;
        if !self.send(ProviderCommand::FetchMatches { page }) {
            self.state.matches_loading = false;
        }
    }

    /// Infinite scroll: ask for the next page once the selection gets close
    /// to the end of what is loaded.
    fn maybe_request_next_pages(&mut self) {
        if matches!(self.state.screen, Screen::Leilao) && self.state.gallery_wants_next_page() {
            let page = self.state.clubs_loaded_pages + 1;
            self.state.clubs_loading = true;
            if !self.send(ProviderCommand::FetchClubsPage { page }) {
                self.state.clubs_loading = false;
            }
        }
        if matches!(self.state.screen, Screen::Partidas) && self.state.matches_want_next_page() {
            let page = self.state.matches_loaded_pages + 1;
            self.request_matches_page(page);
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let demo = std::env::var("DDO_DEMO").is_ok_and(|v| v.trim() == "1")
        || std::env::var("DDO_API_BASE").map(|v| v.trim().is_empty()).unwrap_or(true);
    if demo {
        demo_feed::spawn_demo_provider(tx, cmd_rx);
    } else {
        feed::spawn_provider(tx, cmd_rx);
    }

    let mut app = App::new(Some(cmd_tx));
    persist::load_into_state(&mut app.state);
    let res = run_app(&mut terminal, &mut app, rx);
    persist::save_from_state(&app.state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_request_next_pages();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn accent(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Yellow,
        Theme::Light => Color::Blue,
    }
}

fn muted(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::DarkGray,
        Theme::Light => Color::Gray,
    }
}

fn selection_style(theme: Theme) -> Style {
    match theme {
        Theme::Dark => Style::default().fg(Color::White).bg(Color::DarkGray),
        Theme::Light => Style::default().fg(Color::Black).bg(Color::Gray),
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let full = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(full);

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.screen {
        Screen::Leilao => render_leilao(frame, chunks[1], &app.state),
        Screen::Partidas => render_partidas(frame, chunks[1], &app.state),
        Screen::Denuncias => render_denuncias(frame, chunks[1], &app.state),
        Screen::Comentarios { .. } => render_comentarios(frame, chunks[1], &app.state),
        Screen::Perfil => render_perfil(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(muted(app.state.theme)));
    frame.render_widget(footer, chunks[3]);

    if let Some(banner) = &app.state.banner {
        render_banner(frame, full, banner);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, full);
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match &state.screen {
        Screen::Leilao => "LEILÃO",
        Screen::Partidas => "PARTIDAS",
        Screen::Denuncias => "DENÚNCIAS",
        Screen::Comentarios { .. } => "COMENTÁRIOS",
        Screen::Perfil => "PERFIL",
    };
    let theme = match state.theme {
        Theme::Dark => "escuro",
        Theme::Light => "claro",
    };
    let countdown = match state.auction_remaining(Utc::now()) {
        Some(left) if left.num_seconds() > 0 => format!("Encerra em {}", format_countdown(left)),
        Some(_) => "Leilão encerrado".to_string(),
        None => {
            if state.auction_checked && state.auction.is_none() {
                "Sem leilão aberto".to_string()
            } else {
                "…".to_string()
            }
        }
    };
    let line1 = format!("  ⚽  TORNEIOS DDO | {screen} | {countdown} | Saldo: {}", state.balance());
    let line2 = format!(" /___\\ Tema: {theme}");
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn format_countdown(left: chrono::Duration) -> String {
    let total = left.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn footer_text(state: &AppState) -> String {
    if state.amount_edit.is_some() {
        return "Digite o valor | Backspace Apagar | Enter/Esc Concluir".to_string();
    }
    if state.result_form.is_some() {
        return "Digite os gols | Tab Alternar campo | Enter Registrar | Esc Cancelar".to_string();
    }
    if state.comment_compose_active {
        return "Digite o comentário | Enter Enviar | Esc Cancelar".to_string();
    }
    if state.report_note_active {
        return "Digite a observação | Enter/Esc Concluir".to_string();
    }
    if state.name_edit.is_some() {
        return "Digite o nome | Enter Salvar | Esc Cancelar".to_string();
    }
    match &state.screen {
        Screen::Leilao => {
            "1-4 Telas | Tab Foco | a Adicionar | x Remover | +/- Prioridade | e Valor | s Enviar | r Atualizar | t Tema | ? Ajuda | q Sair"
                .to_string()
        }
        Screen::Partidas => {
            "1-4 Telas | g/Enter Registrar placar | c Comentários | j/k Mover | r Atualizar | ? Ajuda | q Sair".to_string()
        }
        Screen::Denuncias => {
            "1-4 Telas | p Procedente | i Improcedente | n Observação | j/k Mover | r Atualizar | q Sair".to_string()
        }
        Screen::Comentarios { .. } => {
            "b/Esc Voltar | n Novo | x Excluir | j/k Mover | r Atualizar | q Sair".to_string()
        }
        Screen::Perfil => "1-4 Telas | e Editar nome | t Tema | q Sair".to_string(),
    }
}

fn render_leilao(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(46)])
        .split(area);

    render_gallery(frame, columns[0], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MAX_BIDS as u16 + 3),
            Constraint::Min(4),
        ])
        .split(columns[1]);

    render_cart(frame, right[0], state);
    render_contested(frame, right[1], state);
}

fn render_gallery(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == AuctionFocus::Gallery;
    let title = if focused { "Clubes *" } else { "Clubes" };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width == 0 {
        return;
    }

    let widths = gallery_columns();
    let header_area = Rect { height: 1, ..inner };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(header_area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    render_cell_text(frame, cols[0], "Clube", bold);
    render_cell_text(frame, cols[1], "Mínimo", bold);
    render_cell_text(frame, cols[2], "Disputa", bold);
    render_cell_text(frame, cols[3], "Carrinho", bold);

    let list_area = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };
    if state.clubs.is_empty() {
        let text = if state.clubs_loading {
            "Carregando clubes…"
        } else {
            "Nenhum clube disponível"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(muted(state.theme)));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.gallery_selected, state.clubs.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = focused && idx == state.gallery_selected;
        let row_style = if selected {
            selection_style(state.theme)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(gallery_columns())
            .split(row_area);

        let club = &state.clubs[idx];
        let contested = state
            .contested_count(club.id)
            .map(|n| format!("{n} lances"))
            .unwrap_or_else(|| "-".to_string());
        let in_cart = if state.cart.contains(club.id) { "●" } else { "" };

        render_cell_text(frame, cols[0], &club.nome, row_style);
        render_cell_text(frame, cols[1], &club.valor_minimo.to_string(), row_style);
        render_cell_text(frame, cols[2], &contested, row_style);
        render_cell_text(frame, cols[3], in_cart, row_style);
    }
}

fn gallery_columns() -> [Constraint; 4] {
    [
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(8),
    ]
}

fn render_cart(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == AuctionFocus::Cart;
    let title = format!(
        "Carrinho {}/{}{}",
        state.cart.len(),
        MAX_BIDS,
        if focused { " *" } else { "" }
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.cart.is_empty() {
        let hint = if state.submitting {
            "Enviando lances…"
        } else {
            "Vazio. 'a' adiciona o clube selecionado"
        };
        let empty = Paragraph::new(hint).style(Style::default().fg(muted(state.theme)));
        frame.render_widget(empty, inner);
        return;
    }

    for (idx, item) in state.cart.items().iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }
        let row_area = Rect {
            x: inner.x,
            y: inner.y + idx as u16,
            width: inner.width,
            height: 1,
        };
        let selected = focused && idx == state.cart_selected;
        let mut row_style = if selected {
            selection_style(state.theme)
        } else {
            Style::default()
        };
        let editing = state
            .amount_edit
            .as_ref()
            .is_some_and(|edit| edit.club_id == item.club_id);
        if editing {
            row_style = row_style.fg(accent(state.theme));
        }
        let amount = if editing {
            let buffer = state
                .amount_edit
                .as_ref()
                .map(|edit| edit.buffer.as_str())
                .unwrap_or("");
            format!("{buffer}_")
        } else {
            item.amount.to_string()
        };
        let line = format!(
            "{}. {} — {amount} (mín {})",
            item.priority, item.club_name, item.minimum
        );
        let row = Paragraph::new(line).style(row_style);
        frame.render_widget(row, row_area);
    }

    if state.submitting && inner.height > state.cart.len() as u16 {
        let note_area = Rect {
            x: inner.x,
            y: inner.y + state.cart.len() as u16,
            width: inner.width,
            height: 1,
        };
        let note =
            Paragraph::new("Enviando…").style(Style::default().fg(accent(state.theme)));
        frame.render_widget(note, note_area);
    }
}

fn render_contested(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title("Mais disputados")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.contested.is_empty() {
        let empty = Paragraph::new("Sem disputa registrada")
            .style(Style::default().fg(muted(state.theme)));
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<String> = state
        .contested
        .iter()
        .take(inner.height as usize)
        .enumerate()
        .map(|(idx, c)| format!("{}. {} — {} lances", idx + 1, c.nome, c.lances))
        .collect();
    let list = Paragraph::new(lines.join("\n"));
    frame.render_widget(list, inner);
}

fn render_partidas(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Partidas").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.matches.is_empty() {
        let text = if state.matches_loading {
            "Carregando partidas…"
        } else {
            "Nenhuma partida encontrada"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(muted(state.theme)));
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.match_selected, state.matches.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let selected = idx == state.match_selected;
        let row_style = if selected {
            selection_style(state.theme)
        } else {
            Style::default()
        };
        let m = &state.matches[idx];
        let score = match (m.gols_mandante, m.gols_visitante) {
            (Some(h), Some(a)) => format!("{h}-{a}"),
            _ => "—".to_string(),
        };
        let status = if m.registrada { "registrada" } else { "pendente" };
        let line = format!("{} x {}  {score}  [{status}]", m.mandante, m.visitante);
        let row = Paragraph::new(line).style(row_style);
        frame.render_widget(row, row_area);
    }

    if let Some(form) = &state.result_form {
        let full = frame.size();
        render_result_form(frame, full, state, form);
    }
}

fn render_result_form(frame: &mut Frame, area: Rect, state: &AppState, form: &ResultForm) {
    let popup = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup);

    let (home, away) = state
        .matches
        .iter()
        .find(|m| m.id == form.match_id)
        .map(|m| (m.mandante.clone(), m.visitante.clone()))
        .unwrap_or_else(|| ("Mandante".to_string(), "Visitante".to_string()));
    let home_marker = if form.editing_away { " " } else { ">" };
    let away_marker = if form.editing_away { ">" } else { " " };
    let text = format!(
        "Registrar resultado\n\n{home_marker} Gols {home}: {}_\n{away_marker} Gols {away}: {}_",
        form.home_goals, form.away_goals
    );
    let widget = Paragraph::new(text)
        .block(Block::default().title("Resultado").borders(Borders::ALL))
        .style(Style::default().fg(accent(state.theme)));
    frame.render_widget(widget, popup);
}

fn render_denuncias(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .title("Denúncias pendentes")
        .borders(Borders::ALL);
    let inner = block.inner(rows[0]);
    frame.render_widget(block, rows[0]);

    if state.reports.is_empty() {
        let text = if state.reports_loading {
            "Carregando denúncias…"
        } else {
            "Nenhuma denúncia pendente"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(muted(state.theme)));
        frame.render_widget(empty, inner);
    } else {
        let visible = inner.height as usize;
        let (start, end) = visible_range(state.report_selected, state.reports.len(), visible);
        for (i, idx) in (start..end).enumerate() {
            let row_area = Rect {
                x: inner.x,
                y: inner.y + i as u16,
                width: inner.width,
                height: 1,
            };
            let selected = idx == state.report_selected;
            let row_style = if selected {
                selection_style(state.theme)
            } else {
                Style::default()
            };
            let r = &state.reports[idx];
            let line = format!(
                "#{} partida {} — {} ({})",
                r.id, r.partida_id, r.motivo, r.autor
            );
            let row = Paragraph::new(line).style(row_style);
            frame.render_widget(row, row_area);
        }
    }

    let note_title = if state.report_note_active {
        "Observação *"
    } else {
        "Observação"
    };
    let note_text = if state.report_note_active {
        format!("{}_", state.report_note)
    } else if state.report_note.is_empty() {
        "(opcional, 'n' para editar)".to_string()
    } else {
        state.report_note.clone()
    };
    let note = Paragraph::new(note_text)
        .block(Block::default().title(note_title).borders(Borders::ALL));
    frame.render_widget(note, rows[1]);
}

fn render_comentarios(frame: &mut Frame, area: Rect, state: &AppState) {
    let partida = match &state.screen {
        Screen::Comentarios { partida_id } => *partida_id,
        _ => 0,
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .title(format!("Comentários — partida {partida}"))
        .borders(Borders::ALL);
    let inner = block.inner(rows[0]);
    frame.render_widget(block, rows[0]);

    if state.comments.is_empty() {
        let text = if state.comments_loading {
            "Carregando comentários…"
        } else {
            "Nenhum comentário ainda"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(muted(state.theme)));
        frame.render_widget(empty, inner);
    } else {
        let visible = inner.height as usize;
        let (start, end) = visible_range(state.comment_selected, state.comments.len(), visible);
        for (i, idx) in (start..end).enumerate() {
            let row_area = Rect {
                x: inner.x,
                y: inner.y + i as u16,
                width: inner.width,
                height: 1,
            };
            let selected = idx == state.comment_selected;
            let row_style = if selected {
                selection_style(state.theme)
            } else {
                Style::default()
            };
            let c = &state.comments[idx];
            let own = if c.minha { " (meu)" } else { "" };
            let line = format!("{}{own}: {}", c.autor, c.texto);
            let row = Paragraph::new(line).style(row_style);
            frame.render_widget(row, row_area);
        }
    }

    let compose_title = if state.comment_compose_active {
        "Novo comentário *"
    } else {
        "Novo comentário"
    };
    let compose_text = if state.comment_compose_active {
        format!("{}_", state.comment_draft)
    } else {
        "('n' para escrever)".to_string()
    };
    let compose = Paragraph::new(compose_text)
        .block(Block::default().title(compose_title).borders(Borders::ALL));
    frame.render_widget(compose, rows[1]);
}

fn render_perfil(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Perfil").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = match &state.profile {
        Some(p) => {
            let nome = match &state.name_edit {
                Some(buffer) => format!("{buffer}_"),
                None => p.nome.clone(),
            };
            let time = p.time.clone().unwrap_or_else(|| "-".to_string());
            let saving = if state.profile_saving { " (salvando…)" } else { "" };
            format!(
                "Nome: {nome}{saving}\nTime: {time}\nSaldo: {}\nVitórias: {}\nDerrotas: {}",
                p.saldo, p.vitorias, p.derrotas
            )
        }
        None if state.profile_loading => "Carregando perfil…".to_string(),
        None => "Perfil indisponível".to_string(),
    };
    let widget = Paragraph::new(text);
    frame.render_widget(widget, inner);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "Sem eventos".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_banner(frame: &mut Frame, area: Rect, message: &str) {
    let popup = centered_rect(60, 20, area);
    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(format!("{message}\n\n(qualquer tecla para fechar)"))
        .block(Block::default().title("Aviso").borders(Borders::ALL))
        .style(Style::default().fg(Color::Red));
    frame.render_widget(widget, popup);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "DDO Terminal - Ajuda",
        "",
        "Global:",
        "  1            Leilão",
        "  2            Partidas",
        "  3            Denúncias",
        "  4            Perfil",
        "  j/k ou ↑/↓   Mover",
        "  t            Alternar tema",
        "  ?            Ajuda",
        "  q            Sair",
        "",
        "Leilão:",
        "  Tab          Alternar galeria/carrinho",
        "  a / Enter    Adicionar clube ao carrinho",
        "  x            Remover do carrinho",
        "  + / -        Subir/descer prioridade",
        "  e            Editar valor do lance",
        "  s            Enviar lances",
        "",
        "Partidas:",
        "  g / Enter    Registrar placar",
        "  c            Comentários da partida",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Ajuda").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
