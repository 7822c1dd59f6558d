use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Local;

use crate::dto::envelope::{DataResponse, MessageResponse};
use crate::forms::schedule::{ProgressForm, ScheduleForm};
use crate::query::FilterSet;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::schedule as schedule_service;

#[get("/cronograma")]
pub async fn list_phases(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let today = Local::now().date_naive();
    let page = schedule_service::list_phases(repo.get_ref(), &filters, today)?;
    Ok(HttpResponse::Ok().json(DataResponse::from(page)))
}

#[get("/cronograma/projeto/{projeto_id}/gantt")]
pub async fn gantt(
    repo: web::Data<DieselRepository>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let bars = schedule_service::gantt(repo.get_ref(), project_id.into_inner())?;
    Ok(HttpResponse::Ok().json(DataResponse::new(bars)))
}

#[get("/cronograma/{id}")]
pub async fn show_phase(
    repo: web::Data<DieselRepository>,
    phase_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let today = Local::now().date_naive();
    let phase = schedule_service::get_phase(repo.get_ref(), phase_id.into_inner(), today)?;
    Ok(HttpResponse::Ok().json(DataResponse::new(phase)))
}

#[post("/cronograma")]
pub async fn create_phase(
    repo: web::Data<DieselRepository>,
    form: web::Json<ScheduleForm>,
) -> Result<HttpResponse, ServiceError> {
    let phase = schedule_service::create_phase(repo.get_ref(), form.into_inner())?;
    Ok(HttpResponse::Created().json(MessageResponse::with_data(
        "Cronograma criado com sucesso",
        phase,
    )))
}

#[put("/cronograma/{id}/progresso")]
pub async fn update_progress(
    repo: web::Data<DieselRepository>,
    phase_id: web::Path<i32>,
    form: web::Json<ProgressForm>,
) -> Result<HttpResponse, ServiceError> {
    let today = Local::now().date_naive();
    let phase = schedule_service::update_progress(
        repo.get_ref(),
        phase_id.into_inner(),
        form.into_inner(),
        today,
    )?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Progresso atualizado com sucesso",
        phase,
    )))
}

#[put("/cronograma/{id}")]
pub async fn update_phase(
    repo: web::Data<DieselRepository>,
    phase_id: web::Path<i32>,
    form: web::Json<ScheduleForm>,
) -> Result<HttpResponse, ServiceError> {
    let phase =
        schedule_service::update_phase(repo.get_ref(), phase_id.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Cronograma atualizado com sucesso",
        phase,
    )))
}

#[delete("/cronograma/{id}")]
pub async fn delete_phase(
    repo: web::Data<DieselRepository>,
    phase_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    schedule_service::delete_phase(repo.get_ref(), phase_id.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::message("Cronograma excluído com sucesso")))
}
