use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use synctech::models::config::ServerConfig;
use synctech::repository::DieselRepository;
use synctech::routes;

mod common;

fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        environment: "test".to_string(),
        cors_origin: "*".to_string(),
    }
}

macro_rules! init_app {
    ($test_db:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(DieselRepository::new($test_db.pool())))
                .app_data(web::Data::new(server_config()))
                .configure(routes::configure)
                .default_service(web::to(routes::main::not_found)),
        )
        .await
    };
}

fn acme() -> Value {
    json!({
        "tipo_pessoa": "PJ",
        "nome_empresa": "ACME Ltda",
        "cnpj": "12.345.678/0001-90",
        "email": "contato@acme.com",
        "uf": "pe"
    })
}

#[actix_web::test]
async fn test_create_client_returns_created_row() {
    let test_db = common::TestDb::new("test_routes_create_client.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(acme())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Cliente criado com sucesso");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["nome_empresa"], "ACME Ltda");
    assert_eq!(body["data"]["uf"], "PE");
    assert_eq!(body["data"]["ativo"], true);
}

#[actix_web::test]
async fn test_missing_row_is_not_found() {
    let test_db = common::TestDb::new("test_routes_missing_row.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get().uri("/api/clientes/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Cliente não encontrado"}));
}

#[actix_web::test]
async fn test_invalid_payload_is_rejected_without_write() {
    let test_db = common::TestDb::new("test_routes_invalid_payload.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(json!({"tipo_pessoa": "PF", "nome_completo": "Maria", "email": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Dados inválidos");
    let details = body["details"].as_array().unwrap();
    assert!(!details.is_empty());

    let req = test::TestRequest::get().uri("/api/clientes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[actix_web::test]
async fn test_malformed_json_uses_error_envelope() {
    let test_db = common::TestDb::new("test_routes_malformed_json.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"tipo_pessoa\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], routes::INVALID_JSON);
    assert_eq!(body["details"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_list_pagination_metadata() {
    let test_db = common::TestDb::new("test_routes_pagination.db");
    let app = init_app!(test_db);

    for name in ["Alpha", "Beta", "Gamma"] {
        let mut client = acme();
        client["nome_empresa"] = json!(name);
        let req = test::TestRequest::post()
            .uri("/api/clientes")
            .set_json(client)
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri("/api/clientes?page=2&limit=2")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["pagination"],
        json!({"page": 2, "limit": 2, "total": 3, "pages": 2})
    );

    let req = test::TestRequest::get()
        .uri("/api/clientes?page=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/clientes?page=2305843009213693953&limit=4")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Parâmetros inválidos");
}

#[actix_web::test]
async fn test_project_rows_are_denormalized() {
    let test_db = common::TestDb::new("test_routes_projects.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/projetos")
        .set_json(json!({"cliente_id": 1, "nome": "Portal"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Cliente não encontrado"}));

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(acme())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/projetos")
        .set_json(json!({"cliente_id": 1, "nome": "Portal", "tecnologias": ["rust"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri("/api/projetos?cliente_id=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let row = &body["data"][0];
    assert_eq!(row["nome"], "Portal");
    assert_eq!(row["cliente_nome"], "ACME Ltda");
    assert_eq!(row["nome_completo"], Value::Null);
    assert_eq!(row["tecnologias"], json!(["rust"]));

    let req = test::TestRequest::get()
        .uri("/api/projetos?cliente_id=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_receivables_and_payment() {
    let test_db = common::TestDb::new("test_routes_receivables.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(acme())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/contratos")
        .set_json(json!({"cliente_id": 1, "valor_contrato": 2000.0, "qtd_parcelas": 2}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["numero_contrato"], 1);

    for (parcela, due) in [(1, "2020-01-10"), (2, "2099-01-10")] {
        let req = test::TestRequest::post()
            .uri("/api/financeiro")
            .set_json(json!({
                "contrato_id": 1,
                "tipo_movimento": "entrada",
                "descricao": format!("Parcela {parcela}"),
                "valor": 1000.0,
                "numero_parcela": parcela,
                "data_vencimento": due
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/financeiro/contas-receber?vencidas=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["numero_parcela"], 1);
    assert_eq!(rows[0]["numero_contrato"], 1);
    assert!(rows[0]["dias_vencimento"].as_i64().unwrap() < 0);
    assert!(body.get("pagination").is_none());

    let req = test::TestRequest::put()
        .uri("/api/financeiro/1/pagar")
        .set_json(json!({"data_pagamento": "2020-01-09", "forma_pagamento": "boleto"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Movimento marcado como pago");
    assert_eq!(body["data"]["status"], "pago");
    assert_eq!(body["data"]["forma_pagamento"], "boleto");

    let req = test::TestRequest::get()
        .uri("/api/financeiro/contas-receber")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["numero_parcela"], 2);
}

#[actix_web::test]
async fn test_client_delete_is_soft_by_default() {
    let test_db = common::TestDb::new("test_routes_client_delete.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(acme())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete().uri("/api/clientes/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Cliente desativado com sucesso");
    assert_eq!(body["data"]["ativo"], false);

    let req = test::TestRequest::delete()
        .uri("/api/clientes/1?hard=true")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Cliente excluído permanentemente"}));

    let req = test::TestRequest::delete().uri("/api/clientes/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_unknown_route_and_health() {
    let test_db = common::TestDb::new("test_routes_unknown.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get().uri("/api/orcamentos").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Rota não encontrada"}));

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "test");
}

#[actix_web::test]
async fn test_schedule_phase_lifecycle() {
    let test_db = common::TestDb::new("test_routes_schedule.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(acme())
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/projetos")
        .set_json(json!({"cliente_id": 1, "nome": "Portal"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/cronograma")
        .set_json(json!({
            "projeto_id": 1,
            "fase": "Levantamento",
            "data_inicio": "2020-03-10",
            "data_fim": "2020-03-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["details"],
        json!(["Data de fim deve ser posterior à data de início"])
    );

    let req = test::TestRequest::post()
        .uri("/api/cronograma")
        .set_json(json!({
            "projeto_id": 1,
            "fase": "Levantamento",
            "data_inicio": "2020-03-01",
            "data_fim": "2020-03-10",
            "dependencias": "Kickoff, Contrato"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Cronograma criado com sucesso");
    assert_eq!(body["data"]["status"], "nao_iniciado");

    // Planned end long past, still open.
    let req = test::TestRequest::get().uri("/api/cronograma/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "atrasado");
    assert_eq!(body["data"]["duracao_planejada"], 9);
    assert_eq!(body["data"]["projeto_nome"], "Portal");

    let req = test::TestRequest::put()
        .uri("/api/cronograma/1/progresso")
        .set_json(json!({"percentual_concluido": 150}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/cronograma/1/progresso")
        .set_json(json!({"percentual_concluido": 100}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Progresso atualizado com sucesso");
    assert_eq!(body["data"]["status"], "concluido");
    assert!(body["data"]["data_fim_real"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/cronograma?projeto_id=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["status"], "concluido");
    assert_eq!(body["data"][0]["duracao_real"], 0);

    let req = test::TestRequest::get()
        .uri("/api/cronograma/projeto/1/gantt")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["name"], "Levantamento");
    assert_eq!(body["data"][0]["progress"], 100);
    assert_eq!(body["data"][0]["dependencies"], json!(["Kickoff", "Contrato"]));

    let req = test::TestRequest::delete().uri("/api/cronograma/1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Cronograma excluído com sucesso"}));

    let req = test::TestRequest::get().uri("/api/cronograma/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Cronograma não encontrado"}));
}

#[actix_web::test]
async fn test_dashboard_on_empty_and_populated_store() {
    let test_db = common::TestDb::new("test_routes_dashboard.db");
    let app = init_app!(test_db);

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["metricas"]["clientes"]["total"], 0);
    assert_eq!(body["data"]["metricas"]["projetos"]["percentual_concluido"], 0);
    assert_eq!(body["data"]["resumo"]["saldo_financeiro"], 0.0);

    let req = test::TestRequest::post()
        .uri("/api/clientes")
        .set_json(acme())
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/projetos")
        .set_json(json!({"cliente_id": 1, "nome": "Portal", "status": "concluido"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let data = &body["data"];
    assert_eq!(data["metricas"]["clientes"]["pj"], 1);
    assert_eq!(data["metricas"]["projetos"]["concluido"], 1);
    assert_eq!(data["metricas"]["projetos"]["em_andamento"], 0);
    assert_eq!(data["metricas"]["projetos"]["percentual_concluido"], 100);
    assert_eq!(data["atividades_recentes"]["novos_projetos"], 1);
    assert_eq!(data["resumo"]["total_clientes"], 1);
}
