pub mod court;

pub use court::{Acesso, Coordenadas, Court, CourtDraft, CourtQuery, Endereco};
