use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Local;

use crate::dto::envelope::{DataResponse, MessageResponse};
use crate::forms::meeting::MeetingForm;
use crate::query::FilterSet;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::meeting as meeting_service;

#[get("/reunioes")]
pub async fn list_meetings(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let page = meeting_service::list_meetings(repo.get_ref(), &filters)?;
    Ok(HttpResponse::Ok().json(DataResponse::from(page)))
}

#[get("/reunioes/agenda")]
pub async fn agenda(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let today = Local::now().date_naive();
    let rows = meeting_service::agenda(repo.get_ref(), &filters, today)?;
    Ok(HttpResponse::Ok().json(DataResponse::new(rows)))
}

#[get("/reunioes/{id}")]
pub async fn show_meeting(
    repo: web::Data<DieselRepository>,
    meeting_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let meeting = meeting_service::get_meeting(repo.get_ref(), meeting_id.into_inner())?;
    Ok(HttpResponse::Ok().json(DataResponse::new(meeting)))
}

#[post("/reunioes")]
pub async fn create_meeting(
    repo: web::Data<DieselRepository>,
    form: web::Json<MeetingForm>,
) -> Result<HttpResponse, ServiceError> {
    let meeting = meeting_service::create_meeting(repo.get_ref(), form.into_inner())?;
    Ok(HttpResponse::Created().json(MessageResponse::with_data(
        "Reunião criada com sucesso",
        meeting,
    )))
}

#[put("/reunioes/{id}")]
pub async fn update_meeting(
    repo: web::Data<DieselRepository>,
    meeting_id: web::Path<i32>,
    form: web::Json<MeetingForm>,
) -> Result<HttpResponse, ServiceError> {
    let meeting = meeting_service::update_meeting(
        repo.get_ref(),
        meeting_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Reunião atualizada com sucesso",
        meeting,
    )))
}

#[delete("/reunioes/{id}")]
pub async fn delete_meeting(
    repo: web::Data<DieselRepository>,
    meeting_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    meeting_service::delete_meeting(repo.get_ref(), meeting_id.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::message("Reunião excluída com sucesso")))
}
