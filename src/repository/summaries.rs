//! Batch loading of parent records embedded in child listings.
//!
//! Each loader takes the parent ids referenced by a page of rows and fetches
//! them with a single `IN` query, so a listing costs a fixed number of
//! statements regardless of page size.

use std::collections::{HashMap, HashSet};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::client::ClientSummary;
use crate::domain::contract::ContractSummary;
use crate::domain::project::ProjectSummary;
use crate::repository::errors::RepositoryResult;

fn unique(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let set: HashSet<i32> = ids.into_iter().collect();
    set.into_iter().collect()
}

pub(super) fn clients(
    conn: &mut SqliteConnection,
    ids: impl IntoIterator<Item = i32>,
) -> RepositoryResult<HashMap<i32, ClientSummary>> {
    use crate::schema::clientes;

    let rows = clientes::table
        .filter(clientes::id.eq_any(unique(ids)))
        .select((
            clientes::id,
            clientes::nome_empresa,
            clientes::nome_completo,
            clientes::email,
            clientes::telefone,
        ))
        .load::<(i32, Option<String>, Option<String>, Option<String>, Option<String>)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, nome_empresa, nome_completo, email, telefone)| {
            (
                id,
                ClientSummary {
                    nome_empresa,
                    nome_completo,
                    email,
                    telefone,
                },
            )
        })
        .collect())
}

/// Projects with their clients attached.
pub(super) fn projects(
    conn: &mut SqliteConnection,
    ids: impl IntoIterator<Item = i32>,
) -> RepositoryResult<HashMap<i32, ProjectSummary>> {
    use crate::schema::projetos;

    let rows = projetos::table
        .filter(projetos::id.eq_any(unique(ids)))
        .select((
            projetos::id,
            projetos::cliente_id,
            projetos::nome,
            projetos::descricao,
        ))
        .load::<(i32, i32, String, Option<String>)>(conn)?;

    let owners = clients(conn, rows.iter().map(|row| row.1))?;

    Ok(rows
        .into_iter()
        .map(|(id, cliente_id, nome, descricao)| {
            (
                id,
                ProjectSummary {
                    nome,
                    descricao,
                    clientes: owners.get(&cliente_id).cloned(),
                },
            )
        })
        .collect())
}

/// Contracts with their clients and projects attached.
pub(super) fn contracts(
    conn: &mut SqliteConnection,
    ids: impl IntoIterator<Item = i32>,
) -> RepositoryResult<HashMap<i32, ContractSummary>> {
    use crate::schema::contratos;

    let rows = contratos::table
        .filter(contratos::id.eq_any(unique(ids)))
        .select((
            contratos::id,
            contratos::cliente_id,
            contratos::projeto_id,
            contratos::numero_contrato,
            contratos::valor_contrato,
        ))
        .load::<(i32, i32, Option<i32>, i32, f64)>(conn)?;

    let owners = clients(conn, rows.iter().map(|row| row.1))?;
    let projects = projects(conn, rows.iter().filter_map(|row| row.2))?;

    Ok(rows
        .into_iter()
        .map(|(id, cliente_id, projeto_id, numero_contrato, valor_contrato)| {
            (
                id,
                ContractSummary {
                    numero_contrato,
                    valor_contrato,
                    projetos: projeto_id.and_then(|pid| projects.get(&pid).cloned()),
                    clientes: owners.get(&cliente_id).cloned(),
                },
            )
        })
        .collect())
}
