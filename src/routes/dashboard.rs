use actix_web::{HttpResponse, get, web};
use chrono::Local;

use crate::dto::envelope::DataResponse;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::dashboard as dashboard_service;

#[get("/dashboard")]
pub async fn dashboard(repo: web::Data<DieselRepository>) -> Result<HttpResponse, ServiceError> {
    let today = Local::now().date_naive();
    let dashboard = dashboard_service::dashboard(repo.get_ref(), today)?;
    Ok(HttpResponse::Ok().json(DataResponse::new(dashboard)))
}
