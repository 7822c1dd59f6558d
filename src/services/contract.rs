//! Contract workflows.

use serde_json::Value;

use crate::denormalize::Projection;
use crate::domain::contract::{Contract, NewContract};
use crate::domain::types::ContractId;
use crate::forms::contract::ContractForm;
use crate::pagination::Paginated;
use crate::query::{FilterRule, FilterSet, QuerySpec, SortKey};
use crate::repository::{ClientReader, ContractReader, ContractWriter, ProjectReader};
use crate::services::client::CLIENT_NOT_FOUND;
use crate::services::project::PROJECT_NOT_FOUND;
use crate::services::{
    ServiceError, ServiceResult, flatten_row, flatten_rows, page_request, path_id,
    repository_failure, validated,
};

pub const CONTRACT_NOT_FOUND: &str = "Contrato não encontrado";
pub const INACTIVE_CLIENT: &str = "Cliente não encontrado ou inativo";

pub const CONTRACT_QUERY: QuerySpec = QuerySpec {
    rules: &[
        FilterRule::Equals {
            param: "status",
            field: "status",
        },
        FilterRule::Equals {
            param: "cliente_id",
            field: "cliente_id",
        },
    ],
    sort: &[SortKey::desc("created_at"), SortKey::desc("id")],
};

pub const CONTRACT_FIELDS: &[Projection] = &[
    Projection::new("nome_empresa", &["clientes.nome_empresa"]),
    Projection::new("nome_completo", &["clientes.nome_completo"]),
    Projection::new("projeto_nome", &["projetos.nome"]),
];

pub fn list_contracts<R>(repo: &R, filters: &FilterSet) -> ServiceResult<Paginated<Value>>
where
    R: ContractReader + ?Sized,
{
    let page = page_request(filters)?;
    let query = CONTRACT_QUERY.build(filters).paginate(page.window());

    let (total, contracts) = repo
        .list_contracts(&query)
        .map_err(repository_failure("Failed to list contracts", CONTRACT_NOT_FOUND))?;

    Ok(Paginated::new(
        flatten_rows(&contracts, CONTRACT_FIELDS)?,
        page,
        total,
    ))
}

pub fn get_contract<R>(repo: &R, contract_id: i32) -> ServiceResult<Value>
where
    R: ContractReader + ?Sized,
{
    let contract_id: ContractId = path_id(contract_id, CONTRACT_NOT_FOUND)?;

    let contract = repo
        .get_contract_by_id(contract_id)
        .map_err(repository_failure("Failed to load contract", CONTRACT_NOT_FOUND))?
        .ok_or_else(|| ServiceError::NotFound(CONTRACT_NOT_FOUND.to_string()))?;

    flatten_row(&contract, CONTRACT_FIELDS)
}

/// Contracts need an active client and, when one is named, an existing project.
fn ensure_parents<R>(repo: &R, contract: &NewContract) -> ServiceResult<()>
where
    R: ClientReader + ProjectReader + ?Sized,
{
    let client = repo
        .get_client_by_id(contract.cliente_id)
        .map_err(repository_failure("Failed to load client", CLIENT_NOT_FOUND))?;
    if !client.is_some_and(|client| client.ativo) {
        return Err(ServiceError::InvalidReference(INACTIVE_CLIENT.to_string()));
    }

    if let Some(project_id) = contract.projeto_id {
        repo.get_project_by_id(project_id)
            .map_err(repository_failure("Failed to load project", PROJECT_NOT_FOUND))?
            .ok_or_else(|| ServiceError::InvalidReference(PROJECT_NOT_FOUND.to_string()))?;
    }

    Ok(())
}

/// Stores a new contract. The contract number is assigned by the store.
pub fn create_contract<R>(repo: &R, form: ContractForm) -> ServiceResult<Contract>
where
    R: ContractWriter + ClientReader + ProjectReader + ?Sized,
{
    let contract = NewContract::from(validated(form)?);
    ensure_parents(repo, &contract)?;

    repo.create_contract(&contract)
        .map_err(repository_failure("Failed to create contract", CONTRACT_NOT_FOUND))
}

pub fn update_contract<R>(repo: &R, contract_id: i32, form: ContractForm) -> ServiceResult<Contract>
where
    R: ContractWriter + ClientReader + ProjectReader + ?Sized,
{
    let contract = NewContract::from(validated(form)?);
    let contract_id: ContractId = path_id(contract_id, CONTRACT_NOT_FOUND)?;
    ensure_parents(repo, &contract)?;

    repo.update_contract(contract_id, &contract)
        .map_err(repository_failure("Failed to update contract", CONTRACT_NOT_FOUND))
}

pub fn delete_contract<R>(repo: &R, contract_id: i32) -> ServiceResult<()>
where
    R: ContractWriter + ?Sized,
{
    let contract_id: ContractId = path_id(contract_id, CONTRACT_NOT_FOUND)?;

    repo.delete_contract(contract_id)
        .map_err(repository_failure("Failed to delete contract", CONTRACT_NOT_FOUND))
}
