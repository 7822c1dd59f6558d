use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;
use serde_json::json;

use crate::dto::envelope::ErrorResponse;
use crate::models::config::ServerConfig;

#[get("/health")]
pub async fn health(server_config: web::Data<ServerConfig>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": server_config.environment,
    }))
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "SyncTech API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for every unmatched path.
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ErrorResponse::new("Rota não encontrada"))
}
