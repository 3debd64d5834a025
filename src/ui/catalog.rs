//! Экран каталога: фильтры + список квадр.
//!
//! Поиск по имени фильтрует уже загруженный список на клиенте;
//! город, цена, спорт и тип пола уходят в API как query string.

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::api_client::ApiError;
use crate::models::court::{tipo_piso_label, ESPORTES, TIPOS_PISO};
use crate::models::{Court, CourtQuery};

use super::theme::Theme;
use super::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    Browse,
    Search,
    Cidade,
    Preco,
}

#[derive(Debug, Default)]
pub struct CatalogScreen {
    search: Input,
    cidade: Input,
    preco_max: Input,
    /// 0 = todos; i > 0 — индекс в `ESPORTES` + 1.
    esporte_idx: usize,
    /// 0 = todos; i > 0 — индекс в `TIPOS_PISO` + 1.
    tipo_idx: usize,
    focus: Focus,
    courts: Vec<Court>,
    selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl CatalogScreen {
    /// Серверные фильтры из текущего состояния экрана.
    pub fn query(&self) -> CourtQuery {
        let cidade = self.cidade.value().trim();
        CourtQuery {
            tipo: (self.tipo_idx > 0).then(|| TIPOS_PISO[self.tipo_idx - 1].0.to_string()),
            esporte: (self.esporte_idx > 0).then(|| ESPORTES[self.esporte_idx - 1].0.to_string()),
            cidade: (!cidade.is_empty()).then(|| cidade.to_string()),
            preco_max: self.preco_max.value().trim().parse().ok(),
        }
    }

    /// Список после клиентского поиска по имени.
    fn visible(&self) -> Vec<&Court> {
        let term = self.search.value().trim().to_lowercase();
        self.courts
            .iter()
            .filter(|c| term.is_empty() || c.nome.to_lowercase().contains(&term))
            .collect()
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub fn finish_loading(&mut self, result: Result<Vec<Court>, ApiError>) {
        self.loading = false;
        match result {
            Ok(courts) => {
                self.courts = courts;
                self.error = None;
                self.selected = self.selected.min(self.courts.len().saturating_sub(1));
            }
            Err(err) => {
                tracing::error!("Failed to load catalog: {err}");
                self.error = Some("Erro ao carregar quadras".to_string());
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match self.focus {
            Focus::Browse => self.handle_browse_key(key),
            _ => self.handle_editing_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        let visible_len = self.visible().len();
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('a') => Some(Action::OpenAdmin),
            KeyCode::Char('m') => Some(Action::ToggleTheme),
            KeyCode::Char('l') => Some(Action::ToggleLogs),
            KeyCode::Char('r') => Some(Action::ReloadCatalog),
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                None
            }
            KeyCode::Char('c') => {
                self.focus = Focus::Cidade;
                None
            }
            KeyCode::Char('p') => {
                self.focus = Focus::Preco;
                None
            }
            KeyCode::Char('e') => {
                self.esporte_idx = (self.esporte_idx + 1) % (ESPORTES.len() + 1);
                Some(Action::ReloadCatalog)
            }
            KeyCode::Char('t') => {
                self.tipo_idx = (self.tipo_idx + 1) % (TIPOS_PISO.len() + 1);
                Some(Action::ReloadCatalog)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if visible_len > 0 {
                    self.selected = (self.selected + 1).min(visible_len - 1);
                }
                None
            }
            KeyCode::Enter => {
                let id = self.visible().get(self.selected).map(|c| c.id.clone())?;
                Some(Action::OpenCourt(id))
            }
            _ => None,
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Browse;
                None
            }
            KeyCode::Enter => {
                // Поиск по имени клиентский, остальное — новый запрос к API.
                let reload = self.focus != Focus::Search;
                self.focus = Focus::Browse;
                self.selected = 0;
                reload.then_some(Action::ReloadCatalog)
            }
            _ => {
                let input = match self.focus {
                    Focus::Search => &mut self.search,
                    Focus::Cidade => &mut self.cidade,
                    Focus::Preco => &mut self.preco_max,
                    Focus::Browse => return None,
                };
                input.handle_event(&Event::Key(key));
                if self.focus == Focus::Search {
                    self.selected = 0;
                }
                None
            }
        }
    }
}

fn option_label(idx: usize, options: &[(&str, &str)]) -> String {
    if idx == 0 {
        "todos".to_string()
    } else {
        options[idx - 1].1.to_string()
    }
}

pub fn draw(f: &mut Frame, area: Rect, screen: &CatalogScreen, theme: &Theme) {
    let has_error = screen.error.is_some();
    let mut constraints = vec![Constraint::Length(4)];
    if has_error {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_filters(f, chunks[0], screen, theme);

    if let Some(error) = &screen.error {
        let banner = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error()));
        f.render_widget(banner, chunks[1]);
    }

    draw_list(f, *chunks.last().expect("layout chunk"), screen, theme);
}

fn draw_filters(f: &mut Frame, area: Rect, screen: &CatalogScreen, theme: &Theme) {
    let search_line = Line::from(vec![
        Span::styled("Buscar: ", Style::default().fg(theme.muted())),
        Span::styled(
            screen.search.value().to_string(),
            theme.input(screen.focus == Focus::Search),
        ),
        Span::styled(
            if screen.focus == Focus::Search { "▏" } else { "" },
            theme.input(true),
        ),
    ]);

    let filters_line = Line::from(vec![
        Span::styled("Cidade: ", Style::default().fg(theme.muted())),
        Span::styled(
            if screen.cidade.value().is_empty() && screen.focus != Focus::Cidade {
                "—".to_string()
            } else {
                screen.cidade.value().to_string()
            },
            theme.input(screen.focus == Focus::Cidade),
        ),
        Span::styled("  Preço máx: ", Style::default().fg(theme.muted())),
        Span::styled(
            if screen.preco_max.value().is_empty() && screen.focus != Focus::Preco {
                "—".to_string()
            } else {
                screen.preco_max.value().to_string()
            },
            theme.input(screen.focus == Focus::Preco),
        ),
        Span::styled("  Esporte: ", Style::default().fg(theme.muted())),
        Span::styled(option_label(screen.esporte_idx, ESPORTES), theme.highlight()),
        Span::styled("  Tipo: ", Style::default().fg(theme.muted())),
        Span::styled(option_label(screen.tipo_idx, TIPOS_PISO), theme.highlight()),
    ]);

    let block = Block::default()
        .title(" Filtros ")
        .borders(Borders::ALL)
        .border_style(theme.border());
    let filters = Paragraph::new(vec![search_line, filters_line]).block(block);
    f.render_widget(filters, area);
}

fn draw_list(f: &mut Frame, area: Rect, screen: &CatalogScreen, theme: &Theme) {
    let visible = screen.visible();

    let block = Block::default()
        .title(format!(" Quadras ({}) ", visible.len()))
        .borders(Borders::ALL)
        .border_style(theme.border());

    if visible.is_empty() {
        let empty = if screen.loading {
            "Carregando quadras..."
        } else {
            "Nenhuma quadra encontrada"
        };
        let paragraph = Paragraph::new(empty)
            .style(Style::default().fg(theme.muted()))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // Простое окно прокрутки: выделенная строка всегда видима.
    let rows_per_item = 3;
    let capacity = ((area.height.saturating_sub(2)) as usize / rows_per_item).max(1);
    let offset = screen.selected.saturating_sub(capacity - 1);

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(capacity)
        .map(|(i, court)| {
            let selected = i == screen.selected;
            let marker = if selected { "▶ " } else { "  " };
            let name_style = if selected { theme.highlight() } else { theme.title() };

            let title = Line::from(vec![
                Span::styled(marker, theme.highlight()),
                Span::styled(court.nome.clone(), name_style),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", tipo_piso_label(&court.tipo_piso)),
                    Style::default().fg(theme.accent()),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("★ {:.1}", court.avaliacao),
                    Style::default().fg(theme.rating()),
                ),
            ]);
            let address = Line::from(Span::styled(
                format!(
                    "    {} — {}, {}",
                    court.endereco.rua, court.endereco.cidade, court.endereco.estado
                ),
                Style::default().fg(theme.muted()),
            ));
            let price = Line::from(Span::styled(
                format!("    {}", court.preco_formatado()),
                Style::default().fg(theme.text()),
            ));

            ListItem::new(vec![title, address, price])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}
