use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Local;

use crate::dto::envelope::{DataResponse, MessageResponse};
use crate::forms::financial::{FinancialEntryForm, PaymentForm};
use crate::query::FilterSet;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::financial as financial_service;

#[get("/financeiro")]
pub async fn list_entries(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let page = financial_service::list_entries(repo.get_ref(), &filters)?;
    Ok(HttpResponse::Ok().json(DataResponse::from(page)))
}

/// Open receivables, soonest due first; `?vencidas=true` keeps overdue ones.
#[get("/financeiro/contas-receber")]
pub async fn receivables(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let today = Local::now().date_naive();
    let rows = financial_service::list_receivables(repo.get_ref(), &filters, today)?;
    Ok(HttpResponse::Ok().json(DataResponse::new(rows)))
}

#[get("/financeiro/{id}")]
pub async fn show_entry(
    repo: web::Data<DieselRepository>,
    entry_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let entry = financial_service::get_entry(repo.get_ref(), entry_id.into_inner())?;
    Ok(HttpResponse::Ok().json(DataResponse::new(entry)))
}

#[post("/financeiro")]
pub async fn create_entry(
    repo: web::Data<DieselRepository>,
    form: web::Json<FinancialEntryForm>,
) -> Result<HttpResponse, ServiceError> {
    let entry = financial_service::create_entry(repo.get_ref(), form.into_inner())?;
    Ok(HttpResponse::Created().json(MessageResponse::with_data(
        "Movimento criado com sucesso",
        entry,
    )))
}

#[put("/financeiro/{id}")]
pub async fn update_entry(
    repo: web::Data<DieselRepository>,
    entry_id: web::Path<i32>,
    form: web::Json<FinancialEntryForm>,
) -> Result<HttpResponse, ServiceError> {
    let entry = financial_service::update_entry(
        repo.get_ref(),
        entry_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Movimento atualizado com sucesso",
        entry,
    )))
}

/// The body is optional; an empty request pays today with no method.
#[put("/financeiro/{id}/pagar")]
pub async fn pay_entry(
    repo: web::Data<DieselRepository>,
    entry_id: web::Path<i32>,
    form: Option<web::Json<PaymentForm>>,
) -> Result<HttpResponse, ServiceError> {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    let today = Local::now().date_naive();
    let entry = financial_service::pay_entry(repo.get_ref(), entry_id.into_inner(), form, today)?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Movimento marcado como pago",
        entry,
    )))
}

#[delete("/financeiro/{id}")]
pub async fn delete_entry(
    repo: web::Data<DieselRepository>,
    entry_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    financial_service::delete_entry(repo.get_ref(), entry_id.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::message("Movimento excluído com sucesso")))
}
