use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::dto::envelope::{DataResponse, MessageResponse};
use crate::forms::contract::ContractForm;
use crate::query::FilterSet;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::contract as contract_service;

#[get("/contratos")]
pub async fn list_contracts(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let page = contract_service::list_contracts(repo.get_ref(), &filters)?;
    Ok(HttpResponse::Ok().json(DataResponse::from(page)))
}

#[get("/contratos/{id}")]
pub async fn show_contract(
    repo: web::Data<DieselRepository>,
    contract_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let contract = contract_service::get_contract(repo.get_ref(), contract_id.into_inner())?;
    Ok(HttpResponse::Ok().json(DataResponse::new(contract)))
}

#[post("/contratos")]
pub async fn create_contract(
    repo: web::Data<DieselRepository>,
    form: web::Json<ContractForm>,
) -> Result<HttpResponse, ServiceError> {
    let contract = contract_service::create_contract(repo.get_ref(), form.into_inner())?;
    Ok(HttpResponse::Created().json(MessageResponse::with_data(
        "Contrato criado com sucesso",
        contract,
    )))
}

#[put("/contratos/{id}")]
pub async fn update_contract(
    repo: web::Data<DieselRepository>,
    contract_id: web::Path<i32>,
    form: web::Json<ContractForm>,
) -> Result<HttpResponse, ServiceError> {
    let contract = contract_service::update_contract(
        repo.get_ref(),
        contract_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Contrato atualizado com sucesso",
        contract,
    )))
}

#[delete("/contratos/{id}")]
pub async fn delete_contract(
    repo: web::Data<DieselRepository>,
    contract_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    contract_service::delete_contract(repo.get_ref(), contract_id.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::message("Contrato excluído com sucesso")))
}
