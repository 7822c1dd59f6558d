use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::denormalize::{Projection, flatten};
use crate::domain::types::{ProjectId, TypeConstraintError};
use crate::pagination::PageRequest;
use crate::query::FilterSet;
use crate::repository::ProjectReader;
use crate::repository::errors::RepositoryError;

pub mod client;
pub mod contract;
pub mod dashboard;
pub mod errors;
pub mod financial;
pub mod meeting;
pub mod project;
pub mod schedule;

pub use errors::{ServiceError, ServiceResult};

/// Reads `page` and `limit` from the request parameters.
fn page_request(filters: &FilterSet) -> ServiceResult<PageRequest> {
    Ok(PageRequest::parse(filters.get("page"), filters.get("limit"))?)
}

/// Runs the form's rules before anything touches the store.
fn validated<T: Validate>(form: T) -> ServiceResult<T> {
    crate::validation::validate(form).map_err(ServiceError::validation)
}

/// Identifiers arrive as raw path segments; a non-positive one cannot
/// name a row.
fn path_id<T>(id: i32, not_found: &str) -> ServiceResult<T>
where
    T: TryFrom<i32, Error = TypeConstraintError>,
{
    T::try_from(id).map_err(|_| ServiceError::NotFound(not_found.to_string()))
}

/// Logs unexpected storage failures under `context`, then converts them.
fn repository_failure(
    context: &'static str,
    not_found: &'static str,
) -> impl Fn(RepositoryError) -> ServiceError {
    move |err| {
        if !matches!(
            err,
            RepositoryError::NotFound | RepositoryError::InvalidFilter(_)
        ) {
            log::error!("{context}: {err}");
        }
        ServiceError::from_repository(err, not_found)
    }
}

/// A child row must point at a project that exists.
fn ensure_project<R>(repo: &R, project_id: ProjectId) -> ServiceResult<()>
where
    R: ProjectReader + ?Sized,
{
    repo.get_project_by_id(project_id)
        .map_err(repository_failure("Failed to load project", project::PROJECT_NOT_FOUND))?
        .map(|_| ())
        .ok_or_else(|| ServiceError::InvalidReference(project::PROJECT_NOT_FOUND.to_string()))
}

fn flatten_row<T: Serialize>(row: &T, projections: &[Projection]) -> ServiceResult<Value> {
    Ok(flatten(serde_json::to_value(row)?, projections))
}

fn flatten_rows<T: Serialize>(rows: &[T], projections: &[Projection]) -> ServiceResult<Vec<Value>> {
    rows.iter()
        .map(|row| flatten_row(row, projections))
        .collect()
}
