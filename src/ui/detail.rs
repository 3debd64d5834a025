//! Экран одной квадры: галерея, информация, заглушка брони и лайтбокс.

use chrono::{NaiveDate, NaiveTime};
use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::api_client::ApiError;
use crate::gallery::lightbox::Lightbox;
use crate::gallery::{layout as gallery_layout, GalleryImages};
use crate::models::court::tipo_piso_label;
use crate::models::Court;

use super::theme::Theme;
use super::Action;

/// Поля заглушки брони: дата, начало, конец.
///
/// Сама бронь не реализована (кнопка «em breve»), но ввод проверяется:
/// дата в формате ISO, время как `HH:MM`.
#[derive(Debug, Default)]
struct ReservaStub {
    data: Input,
    inicio: Input,
    fim: Input,
    /// None — фокус не на форме брони.
    focus: Option<usize>,
}

impl ReservaStub {
    fn data_valida(&self) -> bool {
        let value = self.data.value().trim();
        value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
    }

    fn hora_valida(input: &Input) -> bool {
        let value = input.value().trim();
        value.is_empty() || NaiveTime::parse_from_str(value, "%H:%M").is_ok()
    }
}

#[derive(Debug)]
pub struct DetailScreen {
    api_base: String,
    current_id: Option<String>,
    court: Option<Court>,
    images: Option<GalleryImages>,
    lightbox: Lightbox,
    reserva: ReservaStub,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailScreen {
    pub fn new(api_base: String) -> Self {
        Self {
            api_base,
            current_id: None,
            court: None,
            images: None,
            lightbox: Lightbox::default(),
            reserva: ReservaStub::default(),
            loading: false,
            error: None,
        }
    }

    pub fn begin_loading(&mut self, id: &str) {
        self.current_id = Some(id.to_string());
        self.loading = true;
        self.error = None;
        self.court = None;
        self.images = None;
        self.lightbox.close();
        self.reserva = ReservaStub::default();
    }

    pub fn finish_loading(&mut self, result: Result<Court, ApiError>) {
        self.loading = false;
        match result {
            Ok(court) => {
                self.images = Some(GalleryImages::build(
                    &court.imagem_capa,
                    court.imagens.as_deref(),
                    &self.api_base,
                ));
                self.court = Some(court);
                self.error = None;
            }
            Err(err) => {
                tracing::error!("Failed to load court: {err}");
                self.error = Some("Erro ao carregar a quadra".to_string());
            }
        }
    }

    pub fn finish_not_found(&mut self) {
        self.loading = false;
        self.court = None;
        self.images = None;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.lightbox.is_open() {
            self.handle_lightbox_key(key);
            return None;
        }
        if self.reserva.focus.is_some() {
            return self.handle_reserva_key(key);
        }

        let total = self.images.as_ref().map(|i| i.total()).unwrap_or(0);
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => Some(Action::BackToCatalog),
            KeyCode::Char('r') => self.current_id.clone().map(Action::OpenCourt),
            // Отдельный всегда доступный вход в просмотр — с первого снимка.
            KeyCode::Char('g') | KeyCode::Enter => {
                self.lightbox.open_at(0, total);
                None
            }
            // Плитки галереи: индекс в отображаемом подмножестве.
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                let displayed = self.images.as_ref().map(|i| i.displayed().len()).unwrap_or(0);
                if index < displayed {
                    self.lightbox.open_at(index, total);
                }
                None
            }
            KeyCode::Tab => {
                self.reserva.focus = Some(0);
                None
            }
            _ => None,
        }
    }

    // Клавиши лайтбокса: стрелки листают по кругу, цифры прыгают,
    // Esc закрывает.
    fn handle_lightbox_key(&mut self, key: KeyEvent) {
        let total = self.images.as_ref().map(|i| i.total()).unwrap_or(0);
        match key.code {
            KeyCode::Left => self.lightbox.previous(total),
            KeyCode::Right => self.lightbox.next(total),
            KeyCode::Esc => self.lightbox.close(),
            KeyCode::Char(c @ '1'..='9') => {
                self.lightbox.jump(c as usize - '1' as usize, total);
            }
            _ => {}
        }
    }

    fn handle_reserva_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.reserva.focus = None;
                None
            }
            KeyCode::Tab => {
                self.reserva.focus = match self.reserva.focus {
                    Some(i) if i < 2 => Some(i + 1),
                    _ => None,
                };
                None
            }
            _ => {
                if let Some(input) = self.focused_reserva_input() {
                    input.handle_event(&Event::Key(key));
                }
                None
            }
        }
    }

    fn focused_reserva_input(&mut self) -> Option<&mut Input> {
        match self.reserva.focus? {
            0 => Some(&mut self.reserva.data),
            1 => Some(&mut self.reserva.inicio),
            _ => Some(&mut self.reserva.fim),
        }
    }
}

pub fn handle_not_found_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => Some(Action::BackToCatalog),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

/// Последний сегмент пути URL — подпись плитки в терминале.
fn image_label(url: &str) -> &str {
    url.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(url)
}

pub fn draw(f: &mut Frame, area: Rect, screen: &DetailScreen, theme: &Theme) {
    let Some(court) = &screen.court else {
        let message = if screen.loading {
            Paragraph::new("Carregando quadra...").style(Style::default().fg(theme.muted()))
        } else if let Some(error) = &screen.error {
            Paragraph::new(error.as_str()).style(Style::default().fg(theme.error()))
        } else {
            Paragraph::new("")
        };
        f.render_widget(message.alignment(Alignment::Center), centered_line(area));
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Галерея
            Constraint::Length(1),  // Управление галереей
            Constraint::Length(3),  // Título + endereço
            Constraint::Length(4),  // Informações
            Constraint::Min(3),     // Descrição
        ])
        .split(columns[0]);

    if let Some(images) = &screen.images {
        draw_gallery(f, main[0], images, theme);
    }

    let browse_hint = Paragraph::new(Span::styled(
        " g — ver todas as fotos",
        Style::default().fg(theme.accent()),
    ));
    f.render_widget(browse_hint, main[1]);

    draw_title(f, main[2], court, theme);
    draw_info(f, main[3], court, theme);
    draw_description(f, main[4], court, theme);
    draw_reserva(f, columns[1], screen, court, theme);

    if screen.lightbox.is_open() {
        if let Some(images) = &screen.images {
            draw_lightbox(f, area, &screen.lightbox, images, theme);
        }
    }
}

fn draw_gallery(f: &mut Frame, area: Rect, images: &GalleryImages, theme: &Theme) {
    let cells = gallery_layout::plan(area, images.displayed().len(), images.total());
    let displayed = images.displayed();

    for cell in cells {
        let Some(url) = displayed.get(cell.index) else { continue };

        let block = Block::default()
            .title(format!(" {} ", cell.index + 1))
            .borders(Borders::ALL)
            .border_style(theme.border());

        let mut lines = vec![Line::from(Span::styled(
            image_label(url).to_string(),
            Style::default().fg(theme.text()),
        ))];
        if let Some(hidden) = cell.overflow {
            lines.push(Line::from(Span::styled(
                format!("+{hidden} restantes"),
                theme.highlight(),
            )));
        }

        let tile = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(tile, cell.area);
    }
}

fn draw_title(f: &mut Frame, area: Rect, court: &Court, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::styled(court.nome.clone(), theme.title()),
            Span::raw("  "),
            Span::styled(
                format!("★ {:.1}", court.avaliacao),
                Style::default().fg(theme.rating()),
            ),
        ]),
        Line::from(Span::styled(
            format!("{}, {}", court.endereco.rua, court.endereco.cidade),
            Style::default().fg(theme.muted()),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_info(f: &mut Frame, area: Rect, court: &Court, theme: &Theme) {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Tipo de piso: ", Style::default().fg(theme.muted())),
            Span::styled(
                tipo_piso_label(&court.tipo_piso).to_string(),
                Style::default().fg(theme.text()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Localização: ", Style::default().fg(theme.muted())),
            Span::styled(
                format!(
                    "{}, {}  ({:.4}, {:.4})",
                    court.endereco.cidade,
                    court.endereco.estado,
                    court.coordenadas.lat,
                    court.coordenadas.lng
                ),
                Style::default().fg(theme.text()),
            ),
        ]),
    ];
    if let Some(acesso) = court.acesso {
        lines.push(Line::from(vec![
            Span::styled("Acesso: ", Style::default().fg(theme.muted())),
            Span::styled(acesso.label(), Style::default().fg(theme.text())),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_description(f: &mut Frame, area: Rect, court: &Court, theme: &Theme) {
    let block = Block::default()
        .title(" Sobre esta quadra ")
        .borders(Borders::ALL)
        .border_style(theme.border());
    let text = Paragraph::new(court.descricao.clone())
        .style(Style::default().fg(theme.text()))
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(text, area);
}

fn draw_reserva(f: &mut Frame, area: Rect, screen: &DetailScreen, court: &Court, theme: &Theme) {
    let block = Block::default()
        .title(" Reserva ")
        .borders(Borders::ALL)
        .border_style(theme.border());

    let preco = court
        .preco_por_hora
        .map(|p| format!("R$ {p:.2}"))
        .unwrap_or_else(|| "—".to_string());

    let field = |label: &str, input: &Input, focused: bool, valid: bool| {
        let value_style = if valid {
            theme.input(focused)
        } else {
            Style::default().fg(theme.error())
        };
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(theme.muted())),
            Span::styled(input.value().to_string(), value_style),
            Span::styled(if focused { "▏" } else { "" }, theme.input(true)),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(court.preco_formatado(), theme.title())),
        Line::default(),
    ];
    if let Some(telefone) = &court.telefone {
        lines.push(Line::from(Span::styled(
            format!("☎ {telefone}"),
            Style::default().fg(theme.accent()),
        )));
        lines.push(Line::default());
    }
    lines.push(field(
        "Data",
        &screen.reserva.data,
        screen.reserva.focus == Some(0),
        screen.reserva.data_valida(),
    ));
    lines.push(field(
        "Início",
        &screen.reserva.inicio,
        screen.reserva.focus == Some(1),
        ReservaStub::hora_valida(&screen.reserva.inicio),
    ));
    lines.push(field(
        "Fim",
        &screen.reserva.fim,
        screen.reserva.focus == Some(2),
        ReservaStub::hora_valida(&screen.reserva.fim),
    ));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        " Reservar agora (em breve) ",
        Style::default()
            .fg(theme.muted())
            .add_modifier(Modifier::DIM | Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "Você ainda não será cobrado",
        Style::default().fg(theme.muted()),
    )));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(
            match court.preco_por_hora {
                Some(p) => format!("R$ {p:.2} x 1 hora"),
                None => "Consulte o preço".to_string(),
            },
            Style::default().fg(theme.muted()),
        ),
        Span::raw("  "),
        Span::styled(format!("Total: {preco}"), theme.title()),
    ]));

    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(card, area);
}

fn draw_lightbox(
    f: &mut Frame,
    area: Rect,
    lightbox: &Lightbox,
    images: &GalleryImages,
    theme: &Theme,
) {
    let Some(cursor) = lightbox.cursor() else { return };
    let all = images.all();
    let Some(url) = all.get(cursor) else { return };

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Fotos — {} / {} ", cursor + 1, all.len()))
        .borders(Borders::ALL)
        .border_style(theme.highlight());

    // Полоса миниатюр: номер каждого снимка, текущий подсвечен.
    let thumbnails = Line::from(
        all.iter()
            .enumerate()
            .flat_map(|(i, _)| {
                let style = if i == cursor {
                    theme.highlight().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(theme.muted())
                };
                vec![Span::styled(format!(" {} ", i + 1), style), Span::raw(" ")]
            })
            .collect::<Vec<_>>(),
    );

    let lines = vec![
        Line::default(),
        Line::from(Span::styled(image_label(url).to_string(), theme.title())),
        Line::from(Span::styled(
            url.clone(),
            Style::default().fg(theme.muted()),
        )),
        Line::default(),
        thumbnails,
        Line::default(),
        Line::from(Span::styled(
            "← anterior · → próxima · 1..9 miniatura · Esc fechar",
            Style::default().fg(theme.muted()),
        )),
    ];

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(body, area);
}

pub fn draw_not_found(f: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(Span::styled("Quadra não encontrada", theme.title())),
        Line::default(),
        Line::from(Span::styled(
            "Voltar para a busca (Esc)",
            theme.highlight(),
        )),
    ];
    let body = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(body, centered_block(area, 4));
}

fn centered_line(area: Rect) -> Rect {
    centered_block(area, 1)
}

fn centered_block(area: Rect, height: u16) -> Rect {
    let top = area.height.saturating_sub(height) / 2;
    Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height: height.min(area.height),
    }
}
