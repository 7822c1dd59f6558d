//! HTTP surface. Handlers stay thin: they extract the request, call one
//! service and wrap the result in the shared envelope. Every failure goes
//! through the [`ResponseError`] impl below.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, error, web};

use crate::dto::envelope::ErrorResponse;
use crate::services::ServiceError;
use crate::services::errors::INVALID_PARAMETERS;

pub mod client;
pub mod contract;
pub mod dashboard;
pub mod financial;
pub mod main;
pub mod meeting;
pub mod project;
pub mod schedule;

pub const INTERNAL_ERROR: &str = "Erro interno do servidor";
pub const INVALID_JSON: &str = "JSON inválido na requisição";

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation { .. } | ServiceError::InvalidReference(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::Validation { message, details } => {
                ErrorResponse::with_details(message.clone(), details.clone())
            }
            ServiceError::InvalidReference(message) | ServiceError::NotFound(message) => {
                ErrorResponse::new(message.clone())
            }
            ServiceError::Internal(detail) => {
                log::error!("Request failed: {detail}");
                ErrorResponse::new(INTERNAL_ERROR)
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

fn rejected(message: &str, detail: String) -> error::Error {
    ServiceError::Validation {
        message: message.to_string(),
        details: vec![detail],
    }
    .into()
}

/// Registers every endpoint together with extractor configs that report
/// malformed bodies, paths and query strings in the shared error shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| rejected(INVALID_JSON, err.to_string())),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| rejected(INVALID_PARAMETERS, err.to_string())),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| rejected(INVALID_PARAMETERS, err.to_string())),
    )
    .service(main::health)
    .service(main::index)
    .service(
        web::scope("/api")
            .service(client::list_clients)
            .service(client::show_client)
            .service(client::create_client)
            .service(client::update_client)
            .service(client::remove_client)
            .service(project::list_projects)
            .service(project::show_project)
            .service(project::create_project)
            .service(project::update_project)
            .service(project::delete_project)
            .service(contract::list_contracts)
            .service(contract::show_contract)
            .service(contract::create_contract)
            .service(contract::update_contract)
            .service(contract::delete_contract)
            // Fixed segments before `/{id}`.
            .service(financial::receivables)
            .service(financial::list_entries)
            .service(financial::show_entry)
            .service(financial::create_entry)
            .service(financial::pay_entry)
            .service(financial::update_entry)
            .service(financial::delete_entry)
            .service(meeting::agenda)
            .service(meeting::list_meetings)
            .service(meeting::show_meeting)
            .service(meeting::create_meeting)
            .service(meeting::update_meeting)
            .service(meeting::delete_meeting)
            .service(schedule::gantt)
            .service(schedule::list_phases)
            .service(schedule::show_phase)
            .service(schedule::create_phase)
            .service(schedule::update_progress)
            .service(schedule::update_phase)
            .service(schedule::delete_phase)
            .service(dashboard::dashboard),
    );
}
