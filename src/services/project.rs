//! Project workflows. Project rows are returned with their client's names
//! flattened next to the embedded `clientes` object.

use serde_json::Value;

use crate::denormalize::Projection;
use crate::domain::project::{NewProject, Project};
use crate::domain::types::{ClientId, ProjectId};
use crate::forms::project::ProjectForm;
use crate::pagination::Paginated;
use crate::query::{FilterRule, FilterSet, QuerySpec, SortKey};
use crate::repository::{ClientReader, ProjectReader, ProjectWriter};
use crate::services::client::CLIENT_NOT_FOUND;
use crate::services::{
    ServiceError, ServiceResult, flatten_row, flatten_rows, page_request, path_id,
    repository_failure, validated,
};

pub const PROJECT_NOT_FOUND: &str = "Projeto não encontrado";

pub const PROJECT_QUERY: QuerySpec = QuerySpec {
    rules: &[
        FilterRule::Equals {
            param: "status",
            field: "status",
        },
        FilterRule::Equals {
            param: "cliente_id",
            field: "cliente_id",
        },
        FilterRule::Search {
            param: "busca",
            fields: &["nome", "descricao"],
        },
    ],
    sort: &[SortKey::desc("created_at"), SortKey::desc("id")],
};

pub const PROJECT_FIELDS: &[Projection] = &[
    Projection::new("nome_empresa", &["clientes.nome_empresa"]),
    Projection::new("nome_completo", &["clientes.nome_completo"]),
    Projection::new(
        "cliente_nome",
        &["clientes.nome_empresa", "clientes.nome_completo"],
    ),
];

pub fn list_projects<R>(repo: &R, filters: &FilterSet) -> ServiceResult<Paginated<Value>>
where
    R: ProjectReader + ?Sized,
{
    let page = page_request(filters)?;
    let query = PROJECT_QUERY.build(filters).paginate(page.window());

    let (total, projects) = repo
        .list_projects(&query)
        .map_err(repository_failure("Failed to list projects", PROJECT_NOT_FOUND))?;

    Ok(Paginated::new(
        flatten_rows(&projects, PROJECT_FIELDS)?,
        page,
        total,
    ))
}

pub fn get_project<R>(repo: &R, project_id: i32) -> ServiceResult<Value>
where
    R: ProjectReader + ?Sized,
{
    let project_id: ProjectId = path_id(project_id, PROJECT_NOT_FOUND)?;

    let project = repo
        .get_project_by_id(project_id)
        .map_err(repository_failure("Failed to load project", PROJECT_NOT_FOUND))?
        .ok_or_else(|| ServiceError::NotFound(PROJECT_NOT_FOUND.to_string()))?;

    flatten_row(&project, PROJECT_FIELDS)
}

/// Rejects payloads whose `cliente_id` names no stored client.
fn ensure_client<R>(repo: &R, client_id: ClientId) -> ServiceResult<()>
where
    R: ClientReader + ?Sized,
{
    match repo
        .get_client_by_id(client_id)
        .map_err(repository_failure("Failed to load client", CLIENT_NOT_FOUND))?
    {
        Some(_) => Ok(()),
        None => Err(ServiceError::InvalidReference(CLIENT_NOT_FOUND.to_string())),
    }
}

pub fn create_project<R>(repo: &R, form: ProjectForm) -> ServiceResult<Project>
where
    R: ProjectWriter + ClientReader + ?Sized,
{
    let project = NewProject::from(validated(form)?);
    ensure_client(repo, project.cliente_id)?;

    repo.create_project(&project)
        .map_err(repository_failure("Failed to create project", PROJECT_NOT_FOUND))
}

pub fn update_project<R>(repo: &R, project_id: i32, form: ProjectForm) -> ServiceResult<Project>
where
    R: ProjectWriter + ClientReader + ?Sized,
{
    let project = NewProject::from(validated(form)?);
    let project_id: ProjectId = path_id(project_id, PROJECT_NOT_FOUND)?;
    ensure_client(repo, project.cliente_id)?;

    repo.update_project(project_id, &project)
        .map_err(repository_failure("Failed to update project", PROJECT_NOT_FOUND))
}

pub fn delete_project<R>(repo: &R, project_id: i32) -> ServiceResult<()>
where
    R: ProjectWriter + ?Sized,
{
    let project_id: ProjectId = path_id(project_id, PROJECT_NOT_FOUND)?;

    repo.delete_project(project_id)
        .map_err(repository_failure("Failed to delete project", PROJECT_NOT_FOUND))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{client, client_summary, project, project_listing};

    fn form(cliente_id: i32) -> ProjectForm {
        serde_json::from_value(json!({
            "cliente_id": cliente_id,
            "nome": "Portal do cliente",
            "tecnologias": ["rust", "postgres"]
        }))
        .unwrap()
    }

    #[test]
    fn list_flattens_client_names() {
        let mut repo = MockRepository::new();
        repo.expect_list_projects().returning(|_| {
            Ok((
                2,
                vec![
                    project_listing(1, Some(client_summary())),
                    project_listing(2, None),
                ],
            ))
        });

        let page = list_projects(&repo, &FilterSet::default()).unwrap();

        assert_eq!(page.items[0]["cliente_nome"], json!("ACME Ltda"));
        assert_eq!(page.items[0]["clientes"]["nome_empresa"], json!("ACME Ltda"));
        assert_eq!(page.items[1]["cliente_nome"], json!(null));
        assert_eq!(page.items[1]["nome_empresa"], json!(null));
        assert_eq!(page.meta.pages, 1);
    }

    #[test]
    fn get_missing_project_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_project_by_id().returning(|_| Ok(None));

        assert!(matches!(
            get_project(&repo, 3),
            Err(ServiceError::NotFound(ref msg)) if msg == PROJECT_NOT_FOUND
        ));
    }

    /// Projects cannot point at a client that does not exist.
    #[test]
    fn create_requires_existing_client() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_| Ok(None));
        repo.expect_create_project().times(0);

        assert!(matches!(
            create_project(&repo, form(5)),
            Err(ServiceError::InvalidReference(ref msg)) if msg == CLIENT_NOT_FOUND
        ));
    }

    #[test]
    fn create_stores_project() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|id| Ok(Some(client(id.get(), true))));
        repo.expect_create_project()
            .withf(|new| new.tecnologias == ["rust", "postgres"])
            .times(1)
            .returning(|new| Ok(project(10, new.cliente_id.get())));

        let created = create_project(&repo, form(1)).unwrap();

        assert_eq!(created.id.get(), 10);
    }

    #[test]
    fn short_name_is_rejected_without_lookups() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().times(0);
        repo.expect_update_project().times(0);

        let form: ProjectForm =
            serde_json::from_value(json!({"cliente_id": 1, "nome": "ab"})).unwrap();

        assert!(matches!(
            update_project(&repo, 1, form),
            Err(ServiceError::Validation { .. })
        ));
    }
}
