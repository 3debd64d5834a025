//! Административный экран: таблица квадр + удаление с подтверждением.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table};
use ratatui::Frame;

use crate::api_client::ApiError;
use crate::models::court::tipo_piso_label;
use crate::models::Court;

use super::theme::Theme;
use super::Action;

#[derive(Debug, Default)]
pub struct AdminScreen {
    courts: Vec<Court>,
    selected: usize,
    /// Индекс строки, ждущей подтверждения удаления.
    confirm_delete: Option<usize>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AdminScreen {
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
                tracing::error!("Failed to load admin table: {err}");
                self.error = Some("Erro ao carregar quadras".to_string());
            }
        }
    }

    pub fn finish_delete(&mut self, result: Result<(), String>) {
        self.confirm_delete = None;
        if let Err(message) = result {
            self.error = Some(message);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if let Some(index) = self.confirm_delete {
            return self.handle_confirm_key(key, index);
        }

        match key.code {
            KeyCode::Esc => Some(Action::BackToCatalog),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('m') => Some(Action::ToggleTheme),
            KeyCode::Char('l') => Some(Action::ToggleLogs),
            KeyCode::Char('r') => Some(Action::ReloadAdmin),
            KeyCode::Char('n') => Some(Action::NewCourt),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.courts.is_empty() {
                    self.selected = (self.selected + 1).min(self.courts.len() - 1);
                }
                None
            }
            KeyCode::Enter | KeyCode::Char('e') => self
                .courts
                .get(self.selected)
                .map(|court| Action::EditCourt(Box::new(court.clone()))),
            KeyCode::Char('d') => {
                if self.courts.get(self.selected).is_some() {
                    self.confirm_delete = Some(self.selected);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, index: usize) -> Option<Action> {
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('y') | KeyCode::Enter => {
                self.courts.get(index).map(|court| {
                    // Подтверждение снимается, когда придёт Msg::Deleted.
                    Action::DeleteCourt(court.id.clone())
                })
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm_delete = None;
                None
            }
            _ => None,
        }
    }
}

pub fn draw(f: &mut Frame, area: Rect, screen: &AdminScreen, theme: &Theme) {
    let has_error = screen.error.is_some();
    let mut constraints = vec![];
    if has_error {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if let Some(error) = &screen.error {
        let banner = Paragraph::new(error.as_str()).style(Style::default().fg(theme.error()));
        f.render_widget(banner, chunks[0]);
    }
    let table_area = *chunks.last().expect("layout chunk");

    let block = Block::default()
        .title(format!(" Quadras cadastradas ({}) ", screen.courts.len()))
        .borders(Borders::ALL)
        .border_style(theme.border());

    if screen.courts.is_empty() {
        let empty = if screen.loading {
            "Carregando..."
        } else {
            "Nenhuma quadra cadastrada — pressione 'n' para criar"
        };
        let paragraph = Paragraph::new(empty)
            .style(Style::default().fg(theme.muted()))
            .block(block);
        f.render_widget(paragraph, table_area);
        return;
    }

    let header = Row::new(vec!["Nome", "Cidade", "Tipo", "Preço/h", "★"])
        .style(theme.title())
        .bottom_margin(1);

    // Окно прокрутки, выделенная строка всегда в кадре.
    let capacity = (table_area.height.saturating_sub(4) as usize).max(1);
    let offset = screen.selected.saturating_sub(capacity - 1);

    let rows: Vec<Row> = screen
        .courts
        .iter()
        .enumerate()
        .skip(offset)
        .take(capacity)
        .map(|(i, court)| {
            let preco = court
                .preco_por_hora
                .map(|p| format!("R$ {p:.2}"))
                .unwrap_or_else(|| "—".to_string());
            let row = Row::new(vec![
                court.nome.clone(),
                court.endereco.cidade.clone(),
                tipo_piso_label(&court.tipo_piso).to_string(),
                preco,
                format!("{:.1}", court.avaliacao),
            ]);
            if i == screen.selected {
                row.style(theme.highlight())
            } else {
                row.style(Style::default().fg(theme.text()))
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
            Constraint::Percentage(10),
        ],
    )
    .header(header)
    .block(block);
    f.render_widget(table, table_area);

    if let Some(index) = screen.confirm_delete {
        if let Some(court) = screen.courts.get(index) {
            draw_confirm(f, table_area, court, theme);
        }
    }
}

fn draw_confirm(f: &mut Frame, area: Rect, court: &Court, theme: &Theme) {
    let width = (area.width.saturating_sub(4)).min(60);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(5) / 2,
        width,
        height: 5,
    };

    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Excluir quadra ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error()));
    let lines = vec![
        Line::from(Span::styled(
            format!("Excluir \"{}\"?", court.nome),
            theme.title(),
        )),
        Line::default(),
        Line::from(Span::styled(
            "s — confirmar · n/Esc — cancelar",
            Style::default().fg(theme.muted()),
        )),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(body, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use crate::models::{Coordenadas, Endereco};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn court(id: &str, nome: &str) -> Court {
        Court {
            id: id.to_string(),
            nome: nome.to_string(),
            descricao: String::new(),
            endereco: Endereco::default(),
            coordenadas: Coordenadas::default(),
            preco_por_hora: None,
            tipo_piso: "society".to_string(),
            acesso: None,
            imagem_capa: String::new(),
            imagens: None,
            avaliacao: 0.0,
            telefone: None,
        }
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut screen = AdminScreen::default();
        screen.finish_loading(Ok(vec![court("1", "Arena"), court("2", "Campo")]));

        // 'd' открывает подтверждение, но ничего не удаляет.
        assert_eq!(screen.handle_key(key(KeyCode::Char('d'))), None);
        assert_eq!(screen.confirm_delete, Some(0));

        // 'n' отменяет.
        assert_eq!(screen.handle_key(key(KeyCode::Char('n'))), None);
        assert_eq!(screen.confirm_delete, None);

        // 's' подтверждает удаление выбранной записи.
        screen.handle_key(key(KeyCode::Down));
        screen.handle_key(key(KeyCode::Char('d')));
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('s'))),
            Some(Action::DeleteCourt("2".to_string()))
        );
    }

    #[test]
    fn selection_is_clamped_after_reload() {
        let mut screen = AdminScreen::default();
        screen.finish_loading(Ok(vec![court("1", "Arena"), court("2", "Campo")]));
        screen.handle_key(key(KeyCode::Down));
        assert_eq!(screen.selected, 1);

        screen.finish_loading(Ok(vec![court("1", "Arena")]));
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn failed_delete_surfaces_message() {
        let mut screen = AdminScreen::default();
        screen.finish_loading(Ok(vec![court("1", "Arena")]));
        screen.handle_key(key(KeyCode::Char('d')));
        screen.finish_delete(Err("Erro ao deletar quadra".to_string()));
        assert_eq!(screen.confirm_delete, None);
        assert_eq!(screen.error.as_deref(), Some("Erro ao deletar quadra"));
    }
}
