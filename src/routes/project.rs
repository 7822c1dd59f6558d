use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::dto::envelope::{DataResponse, MessageResponse};
use crate::forms::project::ProjectForm;
use crate::query::FilterSet;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::project as project_service;

#[get("/projetos")]
pub async fn list_projects(
    repo: web::Data<DieselRepository>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, ServiceError> {
    let filters = FilterSet::from(params.into_inner());
    let page = project_service::list_projects(repo.get_ref(), &filters)?;
    Ok(HttpResponse::Ok().json(DataResponse::from(page)))
}

#[get("/projetos/{id}")]
pub async fn show_project(
    repo: web::Data<DieselRepository>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let project = project_service::get_project(repo.get_ref(), project_id.into_inner())?;
    Ok(HttpResponse::Ok().json(DataResponse::new(project)))
}

#[post("/projetos")]
pub async fn create_project(
    repo: web::Data<DieselRepository>,
    form: web::Json<ProjectForm>,
) -> Result<HttpResponse, ServiceError> {
    let project = project_service::create_project(repo.get_ref(), form.into_inner())?;
    Ok(HttpResponse::Created().json(MessageResponse::with_data(
        "Projeto criado com sucesso",
        project,
    )))
}

#[put("/projetos/{id}")]
pub async fn update_project(
    repo: web::Data<DieselRepository>,
    project_id: web::Path<i32>,
    form: web::Json<ProjectForm>,
) -> Result<HttpResponse, ServiceError> {
    let project = project_service::update_project(
        repo.get_ref(),
        project_id.into_inner(),
        form.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(MessageResponse::with_data(
        "Projeto atualizado com sucesso",
        project,
    )))
}

#[delete("/projetos/{id}")]
pub async fn delete_project(
    repo: web::Data<DieselRepository>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    project_service::delete_project(repo.get_ref(), project_id.into_inner())?;
    Ok(HttpResponse::Ok().json(MessageResponse::message("Projeto excluído com sucesso")))
}
