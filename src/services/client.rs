//! Client registry workflows.

use crate::domain::client::{Client, NewClient};
use crate::domain::types::ClientId;
use crate::forms::client::ClientForm;
use crate::pagination::Paginated;
use crate::query::{FilterRule, FilterSet, QuerySpec, SortKey};
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{
    ServiceError, ServiceResult, page_request, path_id, repository_failure, validated,
};

pub const CLIENT_NOT_FOUND: &str = "Cliente não encontrado";

pub const CLIENT_QUERY: QuerySpec = QuerySpec {
    rules: &[
        FilterRule::Equals {
            param: "ativo",
            field: "ativo",
        },
        FilterRule::Equals {
            param: "tipo_pessoa",
            field: "tipo_pessoa",
        },
        FilterRule::Search {
            param: "busca",
            fields: &["nome_empresa", "nome_completo", "email"],
        },
    ],
    sort: &[SortKey::desc("created_at"), SortKey::desc("id")],
};

/// Outcome of a client removal request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientRemoval {
    /// Soft delete: the row stays, flagged inactive.
    Deactivated(Client),
    Deleted,
}

/// Lists clients matching the request filters, one page at a time.
pub fn list_clients<R>(repo: &R, filters: &FilterSet) -> ServiceResult<Paginated<Client>>
where
    R: ClientReader + ?Sized,
{
    let page = page_request(filters)?;
    let query = CLIENT_QUERY.build(filters).paginate(page.window());

    let (total, clients) = repo
        .list_clients(&query)
        .map_err(repository_failure("Failed to list clients", CLIENT_NOT_FOUND))?;

    Ok(Paginated::new(clients, page, total))
}

pub fn get_client<R>(repo: &R, client_id: i32) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    let client_id: ClientId = path_id(client_id, CLIENT_NOT_FOUND)?;

    repo.get_client_by_id(client_id)
        .map_err(repository_failure("Failed to load client", CLIENT_NOT_FOUND))?
        .ok_or_else(|| ServiceError::NotFound(CLIENT_NOT_FOUND.to_string()))
}

/// Validates the form and stores a new client.
pub fn create_client<R>(repo: &R, form: ClientForm) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let client = NewClient::from(validated(form)?);

    repo.create_client(&client)
        .map_err(repository_failure("Failed to create client", CLIENT_NOT_FOUND))
}

/// Validates the form and replaces the stored client with it.
pub fn update_client<R>(repo: &R, client_id: i32, form: ClientForm) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let client = NewClient::from(validated(form)?);
    let client_id: ClientId = path_id(client_id, CLIENT_NOT_FOUND)?;

    repo.update_client(client_id, &client)
        .map_err(repository_failure("Failed to update client", CLIENT_NOT_FOUND))
}

/// Deactivates the client, or removes the row when `hard` is set.
pub fn remove_client<R>(repo: &R, client_id: i32, hard: bool) -> ServiceResult<ClientRemoval>
where
    R: ClientWriter + ?Sized,
{
    let client_id: ClientId = path_id(client_id, CLIENT_NOT_FOUND)?;

    if hard {
        repo.delete_client(client_id)
            .map_err(repository_failure("Failed to delete client", CLIENT_NOT_FOUND))?;
        return Ok(ClientRemoval::Deleted);
    }

    repo.deactivate_client(client_id)
        .map(ClientRemoval::Deactivated)
        .map_err(repository_failure("Failed to deactivate client", CLIENT_NOT_FOUND))
}
