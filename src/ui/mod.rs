//! ui/mod.rs
//!
//! Терминальный интерфейс каталога: экраны, клавиатура и проводка
//! асинхронных загрузок.
//!
//! Модель однопоточная: весь стейт живёт в [`App`], сетевые вызовы
//! уходят в фоновые задачи tokio и возвращаются сообщениями [`Msg`]
//! через mpsc-канал. У каждого ресурса есть монотонный счётчик
//! поколений: ответ с устаревшим поколением молча выбрасывается,
//! поэтому гонка «быстрых переходов» не перетирает свежие данные
//! старыми.

pub mod admin;
pub mod catalog;
pub mod detail;
pub mod form;
pub mod theme;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tracing::debug;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::api_client::ApiError;
use crate::models::{Court, CourtDraft, CourtQuery};
use crate::AppState;

use admin::AdminScreen;
use catalog::CatalogScreen;
use detail::DetailScreen;
use form::{FormMode, FormScreen};
use theme::Theme;

/// Текущий экран приложения.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Detail,
    NotFound,
    Admin,
    Form,
}

/// Что экран просит сделать в ответ на клавишу.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ReloadCatalog,
    OpenCourt(String),
    BackToCatalog,
    OpenAdmin,
    ReloadAdmin,
    NewCourt,
    EditCourt(Box<Court>),
    DeleteCourt(String),
    SaveDraft(Box<CourtDraft>),
    UploadFile(PathBuf),
    CancelForm,
    ToggleTheme,
    ToggleLogs,
    Quit,
}

/// Результаты фоновых задач.
///
/// `generation` — номер поколения запроса; сравнивается с последним
/// выданным при получении, устаревшие ответы отбрасываются.
#[derive(Debug)]
pub enum Msg {
    Catalog {
        generation: u64,
        result: Result<Vec<Court>, ApiError>,
    },
    Detail {
        generation: u64,
        result: Result<Court, ApiError>,
    },
    Admin {
        generation: u64,
        result: Result<Vec<Court>, ApiError>,
    },
    Saved(Result<Court, String>),
    Deleted(Result<(), String>),
    Uploaded(Result<String, String>),
}

// Счётчики поколений per-resource.
#[derive(Debug, Default)]
struct Generations {
    catalog: u64,
    detail: u64,
    admin: u64,
}

fn bump(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

pub struct App {
    state: Arc<AppState>,
    screen: Screen,
    theme: Theme,
    catalog: CatalogScreen,
    detail: DetailScreen,
    admin: AdminScreen,
    form: Option<FormScreen>,
    generations: Generations,
    tx: mpsc::Sender<Msg>,
    rx: mpsc::Receiver<Msg>,
    show_logs: bool,
    should_quit: bool,
}

impl App {
    pub fn new(state: Arc<AppState>) -> Self {
        let (tx, rx) = mpsc::channel(32);
        let api_base = state.config.api.base_url.clone();
        Self {
            state,
            screen: Screen::Catalog,
            theme: Theme::default(),
            catalog: CatalogScreen::default(),
            detail: DetailScreen::new(api_base),
            admin: AdminScreen::default(),
            form: None,
            generations: Generations::default(),
            tx,
            rx,
            show_logs: false,
            should_quit: false,
        }
    }

    /// Главный цикл: отрисовка, клавиатура, ответы фоновых задач.
    pub async fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.load_catalog();

        while !self.should_quit {
            terminal.draw(|f| draw(f, &self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(msg) = self.rx.try_recv() {
                self.handle_msg(msg);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = match self.screen {
            Screen::Catalog => self.catalog.handle_key(key),
            Screen::Detail => self.detail.handle_key(key),
            Screen::NotFound => detail::handle_not_found_key(key),
            Screen::Admin => self.admin.handle_key(key),
            Screen::Form => self.form.as_mut().and_then(|form| form.handle_key(key)),
        };

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::ReloadCatalog => self.load_catalog(),
            Action::OpenCourt(id) => {
                self.screen = Screen::Detail;
                self.load_detail(id);
            }
            Action::BackToCatalog => {
                // Кеша нет: каждый переход перечитывает список из API.
                self.screen = Screen::Catalog;
                self.load_catalog();
            }
            Action::OpenAdmin => {
                self.screen = Screen::Admin;
                self.load_admin();
            }
            Action::ReloadAdmin => self.load_admin(),
            Action::NewCourt => {
                self.form = Some(FormScreen::criar());
                self.screen = Screen::Form;
            }
            Action::EditCourt(court) => {
                self.form = Some(FormScreen::editar(&court));
                self.screen = Screen::Form;
            }
            Action::DeleteCourt(id) => self.delete_court(id),
            Action::SaveDraft(draft) => self.save_draft(*draft),
            Action::UploadFile(path) => self.upload_file(path),
            Action::CancelForm => {
                self.form = None;
                self.screen = Screen::Admin;
                self.load_admin();
            }
            Action::ToggleTheme => self.theme.toggle(),
            Action::ToggleLogs => self.show_logs = !self.show_logs,
            Action::Quit => self.should_quit = true,
        }
    }

    fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::Catalog { generation, result } => {
                if generation != self.generations.catalog {
                    debug!("Dropping stale catalog response (gen {})", generation);
                    return;
                }
                self.catalog.finish_loading(result);
            }
            Msg::Detail { generation, result } => {
                if generation != self.generations.detail {
                    debug!("Dropping stale detail response (gen {})", generation);
                    return;
                }
                match result {
                    Err(err) if err.is_not_found() => {
                        self.screen = Screen::NotFound;
                        self.detail.finish_not_found();
                    }
                    other => self.detail.finish_loading(other),
                }
            }
            Msg::Admin { generation, result } => {
                if generation != self.generations.admin {
                    debug!("Dropping stale admin response (gen {})", generation);
                    return;
                }
                self.admin.finish_loading(result);
            }
            Msg::Saved(result) => match result {
                Ok(_) => {
                    self.form = None;
                    self.screen = Screen::Admin;
                    self.load_admin();
                }
                Err(message) => {
                    if let Some(form) = &mut self.form {
                        form.finish_saving(Some(message));
                    }
                }
            },
            Msg::Deleted(result) => {
                let deleted = result.is_ok();
                self.admin.finish_delete(result);
                if deleted {
                    self.load_admin();
                }
            }
            Msg::Uploaded(result) => {
                if let Some(form) = &mut self.form {
                    form.finish_upload(result);
                }
            }
        }
    }

    // --- фоновые загрузки ---

    fn load_catalog(&mut self) {
        let generation = bump(&mut self.generations.catalog);
        self.catalog.begin_loading();

        let api = self.state.api.clone();
        let query: CourtQuery = self.catalog.query();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_courts(&query).await;
            let _ = tx.send(Msg::Catalog { generation, result }).await;
        });
    }

    fn load_detail(&mut self, id: String) {
        let generation = bump(&mut self.generations.detail);
        self.detail.begin_loading(&id);

        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.get_court(&id).await;
            let _ = tx.send(Msg::Detail { generation, result }).await;
        });
    }

    fn load_admin(&mut self) {
        let generation = bump(&mut self.generations.admin);
        self.admin.begin_loading();

        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.list_courts(&CourtQuery::default()).await;
            let _ = tx.send(Msg::Admin { generation, result }).await;
        });
    }

    fn save_draft(&mut self, draft: CourtDraft) {
        let Some(form) = &mut self.form else { return };
        form.begin_saving();

        let api = self.state.api.clone();
        let tx = self.tx.clone();
        let mode = form.mode.clone();
        tokio::spawn(async move {
            let result = match &mode {
                FormMode::Criar => api.create_court(&draft).await,
                FormMode::Editar { id } => api.update_court(id, &draft).await,
            };
            let _ = tx
                .send(Msg::Saved(result.map_err(|e| e.to_string())))
                .await;
        });
    }

    fn delete_court(&mut self, id: String) {
        let api = self.state.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.delete_court(&id).await;
            let _ = tx
                .send(Msg::Deleted(result.map_err(|e| e.to_string())))
                .await;
        });
    }

    fn upload_file(&mut self, path: PathBuf) {
        let Some(form) = &mut self.form else { return };

        // Клиентские проверки до запроса: тип файла и размер.
        let Some(mime) = form::mime_for(&path) else {
            form.finish_upload(Err(
                "Selecione um arquivo de imagem (JPEG, PNG ou WebP).".to_string()
            ));
            return;
        };
        form.begin_upload();

        let api = self.state.api.clone();
        let tx = self.tx.clone();
        let max_bytes = self.state.config.upload.max_size_bytes();
        let max_mb = self.state.config.upload.max_size_mb;
        tokio::spawn(async move {
            let result = upload_task(api, path, mime, max_bytes, max_mb).await;
            let _ = tx.send(Msg::Uploaded(result)).await;
        });
    }
}

async fn upload_task(
    api: crate::api_client::CourtApiClient,
    path: PathBuf,
    mime: &'static str,
    max_bytes: u64,
    max_mb: u64,
) -> Result<String, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Não foi possível ler o arquivo: {e}"))?;

    if bytes.len() as u64 > max_bytes {
        return Err(format!("Imagem acima de {max_mb}MB."));
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("imagem")
        .to_string();

    api.upload_image(&file_name, mime, bytes)
        .await
        .map_err(|e| e.to_string())
}

// --- отрисовка ---

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Тело экрана
            Constraint::Length(1), // Подсказки клавиш
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);

    // Панель логов по запросу отрезает нижнюю часть тела экрана.
    let body = if app.show_logs {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(8)])
            .split(chunks[1]);
        draw_logs(f, split[1], app);
        split[0]
    } else {
        chunks[1]
    };

    match app.screen {
        Screen::Catalog => catalog::draw(f, body, &app.catalog, &app.theme),
        Screen::Detail => detail::draw(f, body, &app.detail, &app.theme),
        Screen::NotFound => detail::draw_not_found(f, body, &app.theme),
        Screen::Admin => admin::draw(f, body, &app.admin, &app.theme),
        Screen::Form => {
            if let Some(form) = &app.form {
                form::draw(f, body, form, &app.theme);
            }
        }
    }

    draw_hints(f, chunks[2], app);
}

fn draw_logs(f: &mut Frame, area: Rect, app: &App) {
    let widget = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .borders(Borders::ALL)
                .border_style(app.theme.border()),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(app.theme.text()));
    f.render_widget(widget, area);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let screen_label = match app.screen {
        Screen::Catalog => "Catálogo de quadras",
        Screen::Detail => "Detalhes da quadra",
        Screen::NotFound => "Quadra não encontrada",
        Screen::Admin => "Administração",
        Screen::Form => match app.form.as_ref().map(|form| &form.mode) {
            Some(FormMode::Editar { .. }) => "Editar quadra",
            _ => "Nova quadra",
        },
    };

    let loading = match app.screen {
        Screen::Catalog => app.catalog.loading,
        Screen::Detail => app.detail.loading,
        Screen::Admin => app.admin.loading,
        Screen::Form => app
            .form
            .as_ref()
            .map(|form| form.saving || form.uploading)
            .unwrap_or(false),
        Screen::NotFound => false,
    };

    let mut spans = vec![
        Span::styled(
            " ⚽ Futzer ",
            app.theme.highlight().add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::styled(screen_label, app.theme.title()),
    ];
    if loading {
        spans.push(Span::styled(
            "  carregando...",
            Style::default().fg(app.theme.rating()),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.border()),
    );
    f.render_widget(header, area);
}

fn draw_hints(f: &mut Frame, area: Rect, app: &App) {
    let hints = match app.screen {
        Screen::Catalog => {
            " ↑/↓ navegar · Enter abrir · / buscar · c cidade · p preço · e esporte · t tipo · a admin · m tema · l logs · q sair"
        }
        Screen::Detail => {
            " 1..5 foto · g galeria · Tab reserva · r recarregar · Esc voltar"
        }
        Screen::NotFound => " Esc/Enter voltar para a busca",
        Screen::Admin => " ↑/↓ navegar · n nova · Enter editar · d excluir · r recarregar · Esc voltar",
        Screen::Form => {
            " Tab/↓ próximo campo · ←/→ opções · F2 URL/upload · Ctrl+S salvar · Esc cancelar"
        }
    };

    let bar = Paragraph::new(hints).style(Style::default().fg(app.theme.muted()));
    f.render_widget(bar, area);
}
