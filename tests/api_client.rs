//! Интеграционные тесты клиента API поверх поддельного HTTP-сервера.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use futzer_client::api_client::{ApiError, CourtApiClient};
use futzer_client::config::ApiConfig;
use futzer_client::models::{CourtDraft, CourtQuery, Endereco};

fn client_for(server: &MockServer) -> CourtApiClient {
    CourtApiClient::from_config(&ApiConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_seconds: 5,
    })
}

fn arena_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nome": "Arena Premium Sports",
        "descricao": "Quadra de futebol society com grama sintética de alta qualidade",
        "endereco": {
            "rua": "Rua das Acácias, 123",
            "cidade": "São Paulo",
            "estado": "SP",
            "cep": "01234-567"
        },
        "coordenadas": { "lat": -23.5505, "lng": -46.6333 },
        "precoPorHora": 150.0,
        "tipoPiso": "society",
        "imagemCapa": "https://images.unsplash.com/photo-1529900748604-07564a03e7a6?w=800&h=600&fit=crop",
        "avaliacao": 4.8
    })
}

fn draft_valido() -> CourtDraft {
    CourtDraft {
        nome: "Arena Premium Sports".to_string(),
        descricao: "Quadra society".to_string(),
        endereco: Endereco {
            rua: "Rua das Acácias, 123".to_string(),
            cidade: "São Paulo".to_string(),
            estado: "SP".to_string(),
            cep: "01234-567".to_string(),
        },
        coordenadas: Default::default(),
        preco_por_hora: Some(150.0),
        tipo_piso: "society".to_string(),
        acesso: None,
        imagem_capa: "https://cdn.futzer.app/capa.jpg".to_string(),
        telefone: None,
        avaliacao: 4.8,
    }
}

#[tokio::test]
async fn list_courts_sends_filters_as_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/quadras/"))
        .and(query_param("tipo", "salao"))
        .and(query_param("preco_max", "120.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([arena_json("1")])))
        .expect(1)
        .mount(&server)
        .await;

    let query = CourtQuery {
        tipo: Some("salao".to_string()),
        preco_max: Some(120.5),
        ..CourtQuery::default()
    };

    let courts = client_for(&server)
        .list_courts(&query)
        .await
        .expect("lista filtrada");
    assert_eq!(courts.len(), 1);
    assert_eq!(courts[0].nome, "Arena Premium Sports");
    assert_eq!(courts[0].preco_por_hora, Some(150.0));
}

#[tokio::test]
async fn list_courts_without_filters_uses_bare_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/quadras/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let courts = client_for(&server)
        .list_courts(&CourtQuery::default())
        .await
        .expect("lista vazia");
    assert!(courts.is_empty());
}

#[tokio::test]
async fn get_court_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/quadras/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Quadra não encontrada"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .get_court("999")
        .await
        .expect_err("404 vira NotFound");
    assert!(matches!(error, ApiError::NotFound));
    assert!(error.is_not_found());
}

#[tokio::test]
async fn create_court_sends_camel_case_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/quadras/"))
        .and(body_partial_json(json!({
            "nome": "Arena Premium Sports",
            "tipoPiso": "society",
            "precoPorHora": 150.0,
            "imagemCapa": "https://cdn.futzer.app/capa.jpg"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(arena_json("42")))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_court(&draft_valido())
        .await
        .expect("criação");
    assert_eq!(created.id, "42");
}

#[tokio::test]
async fn rejection_detail_is_extracted_from_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/quadras/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": "Preço por hora deve ser maior que zero"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .create_court(&draft_valido())
        .await
        .expect_err("422 vira Rejected");
    match error {
        ApiError::Rejected { status, detail } => {
            assert_eq!(status, 422);
            assert_eq!(detail, "Preço por hora deve ser maior que zero");
        }
        other => panic!("esperava Rejected, veio {other:?}"),
    }
}

#[tokio::test]
async fn rejection_without_body_falls_back_to_generic_detail() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/quadras/7"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .update_court("7", &draft_valido())
        .await
        .expect_err("500 vira Rejected");
    match error {
        ApiError::Rejected { status, detail } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "Erro inesperado na API");
        }
        other => panic!("esperava Rejected, veio {other:?}"),
    }
}

#[tokio::test]
async fn delete_court_succeeds_on_204() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/quadras/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_court("7")
        .await
        .expect("remoção");
}

#[tokio::test]
async fn uploaded_url_is_normalized_against_api_origin() {
    let server = MockServer::start().await;

    // API отвечает относительным путём — клиент обязан вернуть
    // абсолютный URL относительно origin (база без «/api»).
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "/uploads/foto.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = client_for(&server)
        .upload_image("foto.png", "image/png", vec![0u8; 16])
        .await
        .expect("upload");
    assert_eq!(url, format!("{}/uploads/foto.png", server.uri()));
}

#[tokio::test]
async fn upload_rejection_carries_detail_for_inline_display() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(415).set_body_json(json!({
            "detail": "Formato de imagem não suportado"
        })))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .upload_image("foto.gif", "image/png", vec![0u8; 16])
        .await
        .expect_err("upload rejeitado");
    assert_eq!(error.to_string(), "Formato de imagem não suportado");
}
