//! Форма создания/редактирования квадры.
//!
//! Валидация — целиком на клиенте, до отправки: невалидный черновик
//! в сеть не уходит, ошибка показывается прямо в форме. Ошибка
//! загрузки изображения живёт отдельно от ошибки сохранения и не
//! блокирует остальные поля.

use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::images::{is_displayable_image_url, FALLBACK_IMAGE};
use crate::models::court::TIPOS_PISO;
use crate::models::{Acesso, Coordenadas, Court, CourtDraft, Endereco};

use super::theme::Theme;
use super::Action;

/// Варианты доступа в селекторе; первый — «не указано».
const ACESSO_OPCOES: &[(Option<Acesso>, &str)] = &[
    (None, "—"),
    (Some(Acesso::Publica), "Pública"),
    (Some(Acesso::Socios), "Sócios do clube"),
    (Some(Acesso::Alugavel), "Disponível para aluguel"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Criar,
    Editar { id: String },
}

// Порядок обхода полей по Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Nome,
    Descricao,
    TipoPiso,
    Preco,
    Avaliacao,
    Telefone,
    Acesso,
    Imagem,
    Rua,
    Cidade,
    Estado,
    Cep,
    Lat,
    Lng,
}

const FIELDS: &[Field] = &[
    Field::Nome,
    Field::Descricao,
    Field::TipoPiso,
    Field::Preco,
    Field::Avaliacao,
    Field::Telefone,
    Field::Acesso,
    Field::Imagem,
    Field::Rua,
    Field::Cidade,
    Field::Estado,
    Field::Cep,
    Field::Lat,
    Field::Lng,
];

#[derive(Debug)]
pub struct FormScreen {
    pub mode: FormMode,
    nome: Input,
    descricao: Input,
    preco: Input,
    avaliacao: Input,
    telefone: Input,
    /// URL изображения или путь к локальному файлу — зависит от режима.
    imagem: Input,
    rua: Input,
    cidade: Input,
    estado: Input,
    cep: Input,
    lat: Input,
    lng: Input,
    /// Известные типы пола; при редактировании незнакомое значение
    /// добавляется как собственный вариант, чтобы не потерять его.
    tipo_opcoes: Vec<(String, String)>,
    tipo_idx: usize,
    acesso_idx: usize,
    focus: usize,
    /// true — в поле изображения вставляют готовый URL,
    /// false — путь к файлу для загрузки.
    url_mode: bool,
    pub uploading: bool,
    pub saving: bool,
    pub error: Option<String>,
    pub upload_error: Option<String>,
}

fn tipo_opcoes_padrao() -> Vec<(String, String)> {
    TIPOS_PISO
        .iter()
        .map(|(value, label)| (value.to_string(), label.to_string()))
        .collect()
}

impl FormScreen {
    pub fn criar() -> Self {
        Self {
            mode: FormMode::Criar,
            nome: Input::default(),
            descricao: Input::default(),
            preco: Input::default(),
            avaliacao: Input::new("0".to_string()),
            telefone: Input::default(),
            imagem: Input::default(),
            rua: Input::default(),
            cidade: Input::default(),
            estado: Input::default(),
            cep: Input::default(),
            lat: Input::default(),
            lng: Input::default(),
            tipo_opcoes: tipo_opcoes_padrao(),
            tipo_idx: 0,
            acesso_idx: 0,
            focus: 0,
            url_mode: false,
            uploading: false,
            saving: false,
            error: None,
            upload_error: None,
        }
    }

    pub fn editar(court: &Court) -> Self {
        let mut form = Self::criar();
        form.mode = FormMode::Editar { id: court.id.clone() };
        form.nome = Input::new(court.nome.clone());
        form.descricao = Input::new(court.descricao.clone());
        form.preco = Input::new(
            court
                .preco_por_hora
                .map(|p| p.to_string())
                .unwrap_or_default(),
        );
        form.avaliacao = Input::new(court.avaliacao.to_string());
        form.telefone = Input::new(court.telefone.clone().unwrap_or_default());
        form.imagem = Input::new(court.imagem_capa.clone());
        form.rua = Input::new(court.endereco.rua.clone());
        form.cidade = Input::new(court.endereco.cidade.clone());
        form.estado = Input::new(court.endereco.estado.clone());
        form.cep = Input::new(court.endereco.cep.clone());
        form.lat = Input::new(court.coordenadas.lat.to_string());
        form.lng = Input::new(court.coordenadas.lng.to_string());

        if let Some(idx) = form
            .tipo_opcoes
            .iter()
            .position(|(value, _)| *value == court.tipo_piso)
        {
            form.tipo_idx = idx;
        } else {
            form.tipo_opcoes
                .push((court.tipo_piso.clone(), court.tipo_piso.clone()));
            form.tipo_idx = form.tipo_opcoes.len() - 1;
        }

        form.acesso_idx = ACESSO_OPCOES
            .iter()
            .position(|(value, _)| *value == court.acesso)
            .unwrap_or(0);

        // Существующий URL — значит, режим URL, а не загрузки файла.
        form.url_mode = is_displayable_image_url(&court.imagem_capa);
        form
    }

    pub fn begin_saving(&mut self) {
        self.saving = true;
        self.error = None;
    }

    pub fn finish_saving(&mut self, error: Option<String>) {
        self.saving = false;
        self.error = error;
    }

    pub fn begin_upload(&mut self) {
        self.uploading = true;
        self.upload_error = None;
    }

    pub fn finish_upload(&mut self, result: Result<String, String>) {
        self.uploading = false;
        match result {
            Ok(url) => {
                self.imagem = Input::new(url);
                self.url_mode = true;
                self.upload_error = None;
            }
            Err(message) => self.upload_error = Some(message),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Сохранение заблокировано, пока идёт загрузка изображения.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            if self.saving || self.uploading {
                return None;
            }
            return match self.build_draft() {
                Ok(draft) => Some(Action::SaveDraft(Box::new(draft))),
                Err(message) => {
                    self.error = Some(message);
                    None
                }
            };
        }

        let field = FIELDS[self.focus];
        match key.code {
            KeyCode::Esc => Some(Action::CancelForm),
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELDS.len();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
                None
            }
            KeyCode::Left if field == Field::TipoPiso => {
                self.tipo_idx = (self.tipo_idx + self.tipo_opcoes.len() - 1) % self.tipo_opcoes.len();
                None
            }
            KeyCode::Right if field == Field::TipoPiso => {
                self.tipo_idx = (self.tipo_idx + 1) % self.tipo_opcoes.len();
                None
            }
            KeyCode::Left if field == Field::Acesso => {
                self.acesso_idx = (self.acesso_idx + ACESSO_OPCOES.len() - 1) % ACESSO_OPCOES.len();
                None
            }
            KeyCode::Right if field == Field::Acesso => {
                self.acesso_idx = (self.acesso_idx + 1) % ACESSO_OPCOES.len();
                None
            }
            KeyCode::F(2) if field == Field::Imagem => {
                self.url_mode = !self.url_mode;
                None
            }
            KeyCode::Enter if field == Field::Imagem && !self.url_mode => {
                if self.uploading {
                    return None;
                }
                let path = self.imagem.value().trim();
                if path.is_empty() {
                    self.upload_error = Some("Informe o caminho do arquivo.".to_string());
                    return None;
                }
                Some(Action::UploadFile(PathBuf::from(path)))
            }
            KeyCode::Enter => {
                self.focus = (self.focus + 1) % FIELDS.len();
                None
            }
            _ => {
                if let Some(input) = self.focused_input() {
                    input.handle_event(&Event::Key(key));
                }
                None
            }
        }
    }

    fn focused_input(&mut self) -> Option<&mut Input> {
        match FIELDS[self.focus] {
            Field::Nome => Some(&mut self.nome),
            Field::Descricao => Some(&mut self.descricao),
            Field::Preco => Some(&mut self.preco),
            Field::Avaliacao => Some(&mut self.avaliacao),
            Field::Telefone => Some(&mut self.telefone),
            Field::Imagem => Some(&mut self.imagem),
            Field::Rua => Some(&mut self.rua),
            Field::Cidade => Some(&mut self.cidade),
            Field::Estado => Some(&mut self.estado),
            Field::Cep => Some(&mut self.cep),
            Field::Lat => Some(&mut self.lat),
            Field::Lng => Some(&mut self.lng),
            Field::TipoPiso | Field::Acesso => None,
        }
    }

    /// Собирает и валидирует черновик. Ошибка — готовое сообщение
    /// для баннера формы.
    pub fn build_draft(&self) -> Result<CourtDraft, String> {
        let preco_texto = self.preco.value().trim();
        let preco_por_hora = if preco_texto.is_empty() {
            None
        } else {
            Some(
                preco_texto
                    .parse::<f64>()
                    .map_err(|_| "Preço por hora inválido.".to_string())?,
            )
        };

        let avaliacao = self
            .avaliacao
            .value()
            .trim()
            .parse::<f64>()
            .map_err(|_| "Avaliação deve ser entre 0 e 5.".to_string())?;

        // Нечитаемые координаты схлопываются в (0, 0).
        let lat = self.lat.value().trim().parse::<f64>().unwrap_or(0.0);
        let lng = self.lng.value().trim().parse::<f64>().unwrap_or(0.0);

        let imagem = self.imagem.value().trim();
        let telefone = self.telefone.value().trim();

        let draft = CourtDraft {
            nome: self.nome.value().trim().to_string(),
            descricao: self.descricao.value().trim().to_string(),
            endereco: Endereco {
                rua: self.rua.value().trim().to_string(),
                cidade: self.cidade.value().trim().to_string(),
                estado: self.estado.value().trim().to_string(),
                cep: self.cep.value().trim().to_string(),
            },
            coordenadas: Coordenadas { lat, lng },
            preco_por_hora,
            tipo_piso: self.tipo_opcoes[self.tipo_idx].0.clone(),
            acesso: ACESSO_OPCOES[self.acesso_idx].0,
            imagem_capa: if imagem.is_empty() {
                FALLBACK_IMAGE.to_string()
            } else {
                imagem.to_string()
            },
            telefone: (!telefone.is_empty()).then(|| telefone.to_string()),
            avaliacao,
        };

        draft
            .validate()
            .map_err(|errors| first_message(&errors))?;
        Ok(draft)
    }
}

// Первое сообщение из дерева ошибок валидации, включая вложенные
// структуры (endereco).
fn first_message(errors: &ValidationErrors) -> String {
    for kind in errors.errors().values() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    if let Some(message) = &error.message {
                        return message.to_string();
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => return first_message(nested),
            ValidationErrorsKind::List(items) => {
                if let Some(nested) = items.values().next() {
                    return first_message(nested);
                }
            }
        }
    }
    "Dados inválidos.".to_string()
}

/// MIME по расширению; `None` — файл не из списка допустимых.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

pub fn draw(f: &mut Frame, area: Rect, form: &FormScreen, theme: &Theme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_fields(f, columns[0], form, theme);
    draw_image_panel(f, columns[1], form, theme);
}

fn draw_fields(f: &mut Frame, area: Rect, form: &FormScreen, theme: &Theme) {
    let section = |title: &str| {
        Line::from(Span::styled(
            title.to_string(),
            theme.title().add_modifier(Modifier::UNDERLINED),
        ))
    };

    let text_field = |label: &str, input: &Input, field: Field| {
        let focused = FIELDS[form.focus] == field;
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(theme.muted())),
            Span::styled(input.value().to_string(), theme.input(focused)),
            Span::styled(if focused { "▏" } else { "" }, theme.input(true)),
        ])
    };

    let select_field = |label: &str, value: &str, field: Field| {
        let focused = FIELDS[form.focus] == field;
        let value = if focused {
            format!("◀ {value} ▶")
        } else {
            value.to_string()
        };
        Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(theme.muted())),
            Span::styled(value, theme.input(focused)),
        ])
    };

    let mut lines = vec![section("Informações Básicas")];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error()),
        )));
    }
    lines.push(text_field("Nome da Quadra *", &form.nome, Field::Nome));
    lines.push(text_field("Descrição *", &form.descricao, Field::Descricao));
    lines.push(select_field(
        "Tipo de Piso *",
        &form.tipo_opcoes[form.tipo_idx].1,
        Field::TipoPiso,
    ));
    lines.push(text_field("Preço por Hora (R$)", &form.preco, Field::Preco));
    lines.push(text_field("Avaliação (0–5)", &form.avaliacao, Field::Avaliacao));
    lines.push(text_field("Telefone", &form.telefone, Field::Telefone));
    lines.push(select_field(
        "Acesso",
        ACESSO_OPCOES[form.acesso_idx].1,
        Field::Acesso,
    ));
    lines.push(Line::default());

    lines.push(section("Endereço"));
    lines.push(text_field("Rua / Logradouro *", &form.rua, Field::Rua));
    lines.push(text_field("Cidade *", &form.cidade, Field::Cidade));
    lines.push(text_field("Estado *", &form.estado, Field::Estado));
    lines.push(text_field("CEP", &form.cep, Field::Cep));
    lines.push(Line::default());

    lines.push(section("Coordenadas (para o mapa)"));
    lines.push(text_field("Latitude", &form.lat, Field::Lat));
    lines.push(text_field("Longitude", &form.lng, Field::Lng));

    let title = if form.saving {
        " Formulário — Salvando... "
    } else {
        " Formulário "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.border());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_image_panel(f: &mut Frame, area: Rect, form: &FormScreen, theme: &Theme) {
    let focused = FIELDS[form.focus] == Field::Imagem;

    let mode_label = if form.url_mode {
        "URL  (F2: upload)"
    } else {
        "Upload  (F2: URL)"
    };
    let input_label = if form.url_mode {
        "URL da imagem"
    } else {
        "Caminho do arquivo"
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Modo: ", Style::default().fg(theme.muted())),
            Span::styled(mode_label, theme.highlight()),
        ]),
        Line::from(vec![
            Span::styled(format!("{input_label}: "), Style::default().fg(theme.muted())),
            Span::styled(form.imagem.value().to_string(), theme.input(focused)),
            Span::styled(if focused { "▏" } else { "" }, theme.input(true)),
        ]),
    ];

    if form.uploading {
        lines.push(Line::from(Span::styled(
            "Enviando...",
            Style::default().fg(theme.rating()),
        )));
    } else if !form.url_mode {
        lines.push(Line::from(Span::styled(
            "Enter — enviar arquivo (JPEG, PNG ou WebP)",
            Style::default().fg(theme.muted()),
        )));
    }
    if let Some(error) = &form.upload_error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error()),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Preview",
        theme.title().add_modifier(Modifier::UNDERLINED),
    )));
    let value = form.imagem.value().trim();
    if is_displayable_image_url(value) {
        lines.push(Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(theme.accent()),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Sem imagem selecionada",
            Style::default().fg(theme.muted()),
        )));
    }

    let block = Block::default()
        .title(" Foto de Capa ")
        .borders(Borders::ALL)
        .border_style(theme.border());
    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn preenchida() -> FormScreen {
        let mut form = FormScreen::criar();
        form.nome = Input::new("Arena Premium Sports".to_string());
        form.descricao = Input::new("Society com grama sintética".to_string());
        form.rua = Input::new("Rua das Acácias, 123".to_string());
        form.cidade = Input::new("São Paulo".to_string());
        form.estado = Input::new("SP".to_string());
        form.avaliacao = Input::new("4.8".to_string());
        form.preco = Input::new("150".to_string());
        form
    }

    #[test]
    fn valid_form_builds_draft() {
        let draft = preenchida().build_draft().expect("черновик валиден");
        assert_eq!(draft.preco_por_hora, Some(150.0));
        assert_eq!(draft.tipo_piso, "society");
        // Пустая обложка подменяется картинкой по умолчанию.
        assert_eq!(draft.imagem_capa, FALLBACK_IMAGE);
        assert_eq!(draft.telefone, None);
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let mut form = preenchida();
        form.avaliacao = Input::new("5.1".to_string());
        assert_eq!(
            form.build_draft().unwrap_err(),
            "Avaliação deve ser entre 0 e 5"
        );

        form.avaliacao = Input::new("5.0".to_string());
        assert!(form.build_draft().is_ok());

        form.avaliacao = Input::new("0.0".to_string());
        assert!(form.build_draft().is_ok());
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let mut form = preenchida();
        form.avaliacao = Input::new("ótima".to_string());
        assert_eq!(
            form.build_draft().unwrap_err(),
            "Avaliação deve ser entre 0 e 5."
        );
    }

    #[test]
    fn price_zero_or_negative_is_rejected() {
        let mut form = preenchida();
        form.preco = Input::new("0".to_string());
        assert_eq!(form.build_draft().unwrap_err(), "Preço por hora inválido");

        form.preco = Input::new("-10".to_string());
        assert!(form.build_draft().is_err());

        // Preço é opcional.
        form.preco = Input::default();
        let draft = form.build_draft().expect("preço vazio é aceito");
        assert_eq!(draft.preco_por_hora, None);
    }

    #[test]
    fn unparseable_coordinates_collapse_to_zero() {
        let mut form = preenchida();
        form.lat = Input::new("abc".to_string());
        form.lng = Input::default();
        let draft = form.build_draft().expect("coordenadas opcionais");
        assert_eq!(draft.coordenadas, Coordenadas { lat: 0.0, lng: 0.0 });
    }

    #[test]
    fn editing_unknown_floor_type_keeps_raw_value() {
        let court = Court {
            id: "7".to_string(),
            nome: "Tennis Club SP".to_string(),
            descricao: "Quadra de tênis".to_string(),
            endereco: Endereco {
                rua: "Rua Augusta, 2500".to_string(),
                cidade: "São Paulo".to_string(),
                estado: "SP".to_string(),
                cep: String::new(),
            },
            coordenadas: Coordenadas::default(),
            preco_por_hora: Some(120.0),
            tipo_piso: "tenis".to_string(),
            acesso: Some(Acesso::Socios),
            imagem_capa: "https://cdn.futzer.app/tenis.jpg".to_string(),
            imagens: None,
            avaliacao: 4.7,
            telefone: None,
        };

        let form = FormScreen::editar(&court);
        let draft = form.build_draft().expect("registro existente é válido");
        assert_eq!(draft.tipo_piso, "tenis");
        assert_eq!(draft.acesso, Some(Acesso::Socios));
        assert!(form.url_mode);
    }

    #[test]
    fn save_shortcut_reports_first_validation_error() {
        let mut form = FormScreen::criar();
        let action = form.handle_key(KeyEvent::new(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL,
        ));
        assert_eq!(action, None);
        assert!(form.error.is_some());
    }

    #[test]
    fn upload_result_switches_to_url_mode() {
        let mut form = FormScreen::criar();
        form.begin_upload();
        form.finish_upload(Ok("http://localhost:8000/uploads/x.png".to_string()));
        assert!(form.url_mode);
        assert!(!form.uploading);
        assert_eq!(form.imagem.value(), "http://localhost:8000/uploads/x.png");

        form.begin_upload();
        form.finish_upload(Err("Imagem acima de 5MB.".to_string()));
        assert_eq!(form.upload_error.as_deref(), Some("Imagem acima de 5MB."));
    }

    #[test]
    fn mime_allow_list() {
        assert_eq!(mime_for(Path::new("foto.jpg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("foto.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("foto.png")), Some("image/png"));
        assert_eq!(mime_for(Path::new("foto.webp")), Some("image/webp"));
        assert_eq!(mime_for(Path::new("documento.pdf")), None);
        assert_eq!(mime_for(Path::new("sem_extensao")), None);
    }

    #[test]
    fn tab_cycles_through_all_fields() {
        let mut form = FormScreen::criar();
        for _ in 0..FIELDS.len() {
            form.handle_key(key(KeyCode::Tab));
        }
        assert_eq!(form.focus, 0);
    }
}
