use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::dto::envelope::{DataResponse, MessageResponse};
use crate::forms::client::ClientForm;
use crate::query::FilterSet;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::client::{self as client_service, ClientRemoval};

#[derive(Debug, Default, Deserialize)]
pub struct RemovalParams {
    #[serde(default)]
    pub hard: bool,
}

#[get("/clientes")]
pub async fn list_clients(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let page = client_service::list_clients(repo.get_ref(), &filters)?;
    Ok(HttpResponse::Ok().json(DataResponse::from(page)))
}

#[get("/clientes/{id}")]
pub async fn show_client(
    repo: web::Data<DieselRepository>,
    client_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::get_client(repo.get_ref(), client_id.into_inner())?;
    Ok(HttpResponse::Ok().json(DataResponse::new(client)))
}

#[post("/clientes")]
pub async fn create_client(
    repo: web::Data<DieselRepository>,
    form: web::Json<ClientForm>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::create_client(repo.get_ref(), form.into_inner())?;
    Ok(HttpResponse::Created().json(MessageResponse::with_data(
        "Cliente criado com sucesso",
        client,
    )))
}

#[put("/clientes/{id}")]
pub async fn update_client(
    repo: web::Data<DieselRepository>,
    client_id: web::Path<i32>,
    form: web::Json<ClientForm>,
) -> Result<HttpResponse, ServiceError> {
    let client = client_service::update_client(
        repo.get_ref(),
        client_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Cliente atualizado com sucesso",
        client,
    )))
}

/// Soft delete by default; `?hard=true` removes the row.
#[delete("/clientes/{id}")]
pub async fn remove_client(
    repo: web::Data<DieselRepository>,
    client_id: web::Path<i32>,
    params: web::Query<RemovalParams>,
) -> Result<HttpResponse, ServiceError> {
    let removal =
        client_service::remove_client(repo.get_ref(), client_id.into_inner(), params.hard)?;
    let response = match removal {
        ClientRemoval::Deactivated(client) => HttpResponse::Ok().json(
            MessageResponse::with_data("Cliente desativado com sucesso", client),
        ),
        ClientRemoval::Deleted => {
            HttpResponse::Ok().json(MessageResponse::message("Cliente excluído permanentemente"))
        }
    };
    Ok(response)
}
