use serde::{Deserialize, Serialize};
use validator::Validate;

/// Endereço postal da quadra.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Endereco {
    #[validate(length(min = 1, message = "Informe a rua"))]
    pub rua: String,
    #[validate(length(min = 1, message = "Informe a cidade"))]
    pub cidade: String,
    #[validate(length(min = 1, message = "Informe o estado"))]
    pub estado: String,
    #[serde(default)]
    pub cep: String,
}

/// Геокоординаты; нечитаемый ввод в форме схлопывается в (0, 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordenadas {
    pub lat: f64,
    pub lng: f64,
}

/// Режим доступа к квадре.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acesso {
    #[serde(rename = "public")]
    Publica,
    #[serde(rename = "club-member")]
    Socios,
    #[serde(rename = "rentable")]
    Alugavel,
}

impl Acesso {
    pub fn label(&self) -> &'static str {
        match self {
            Acesso::Publica => "Pública",
            Acesso::Socios => "Sócios do clube",
            Acesso::Alugavel => "Disponível para aluguel",
        }
    }
}

/// Запись квадры так, как её отдаёт внешний API (camelCase на проводе).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: String,
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    pub endereco: Endereco,
    #[serde(default)]
    pub coordenadas: Coordenadas,
    #[serde(rename = "precoPorHora", default)]
    pub preco_por_hora: Option<f64>,
    #[serde(rename = "tipoPiso")]
    pub tipo_piso: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acesso: Option<Acesso>,
    #[serde(rename = "imagemCapa", default)]
    pub imagem_capa: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagens: Option<Vec<String>>,
    #[serde(default)]
    pub avaliacao: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
}

impl Court {
    /// Preço formatado para exibição.
    pub fn preco_formatado(&self) -> String {
        match self.preco_por_hora {
            Some(preco) => format!("R$ {preco:.2}/hora"),
            None => "Consulte o preço".to_string(),
        }
    }
}

/// Payload формы создания/редактирования — всё, кроме `id`.
///
/// Валидация выполняется на клиенте до отправки: невалидный черновик
/// в сеть не уходит.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct CourtDraft {
    #[validate(length(min = 1, message = "Informe o nome da quadra"))]
    pub nome: String,
    #[validate(length(min = 1, message = "Descreva a quadra"))]
    pub descricao: String,
    #[validate(nested)]
    pub endereco: Endereco,
    pub coordenadas: Coordenadas,
    #[serde(rename = "precoPorHora")]
    #[validate(range(exclusive_min = 0.0, message = "Preço por hora inválido"))]
    pub preco_por_hora: Option<f64>,
    #[serde(rename = "tipoPiso")]
    pub tipo_piso: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acesso: Option<Acesso>,
    #[serde(rename = "imagemCapa")]
    pub imagem_capa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Avaliação deve ser entre 0 e 5"))]
    pub avaliacao: f64,
}

impl CourtDraft {
    /// Черновик, предзаполненный существующей записью (режим «editar»).
    pub fn from_court(court: &Court) -> Self {
        Self {
            nome: court.nome.clone(),
            descricao: court.descricao.clone(),
            endereco: court.endereco.clone(),
            coordenadas: court.coordenadas,
            preco_por_hora: court.preco_por_hora,
            tipo_piso: court.tipo_piso.clone(),
            acesso: court.acesso,
            imagem_capa: court.imagem_capa.clone(),
            telefone: court.telefone.clone(),
            avaliacao: court.avaliacao,
        }
    }
}

/// Фильтры каталога; пустые поля в query string не попадают.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourtQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esporte: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_max: Option<f64>,
}

impl CourtQuery {
    pub fn is_empty(&self) -> bool {
        self == &CourtQuery::default()
    }
}

/// Типы de piso conhecidos e seus rótulos de exibição.
pub const TIPOS_PISO: &[(&str, &str)] = &[
    ("society", "Society"),
    ("grama", "Grama Natural"),
    ("salao", "Salão / Futsal"),
    ("quadra", "Quadra"),
    ("campo", "Campo"),
    ("areia", "Areia"),
];

/// Esportes disponíveis no filtro do catálogo.
pub const ESPORTES: &[(&str, &str)] = &[("futebol", "Futebol"), ("tenis", "Tênis")];

pub fn tipo_piso_label(tipo: &str) -> &str {
    TIPOS_PISO
        .iter()
        .chain(ESPORTES.iter())
        .find(|(value, _)| *value == tipo)
        .map(|(_, label)| *label)
        .unwrap_or(tipo)
}
