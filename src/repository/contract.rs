use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::contract::{Contract, ContractListing, NewContract};
use crate::domain::types::ContractId;
use crate::models::contract::{
    Contract as DbContract, NewContract as DbNewContract, UpdateContract as DbUpdateContract,
};
use crate::query::{Predicate, QueryDescriptor, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Condition, ContractReader, ContractWriter, DieselRepository, conditions, parse_id, summaries,
    unsupported,
};
use crate::schema::contratos;

type ContractQuery = contratos::BoxedQuery<'static, Sqlite>;

fn condition(predicate: &Predicate) -> RepositoryResult<Condition<contratos::table>> {
    let condition: Condition<contratos::table> = match predicate {
        Predicate::Equals {
            field: "status",
            value,
        } => Box::new(contratos::status.eq(value.clone()).nullable()),
        Predicate::Equals {
            field: field @ "cliente_id",
            value,
        } => Box::new(contratos::cliente_id.eq(parse_id(field, value)?).nullable()),
        other => return Err(unsupported("contratos", other)),
    };
    Ok(condition)
}

fn filtered(query: &QueryDescriptor) -> RepositoryResult<ContractQuery> {
    conditions(query, condition).map(|conditions| {
        conditions
            .into_iter()
            .fold(contratos::table.into_boxed(), |items, condition| {
                items.filter(condition)
            })
    })
}

fn sorted(mut items: ContractQuery, query: &QueryDescriptor) -> RepositoryResult<ContractQuery> {
    for (position, key) in query.sort().iter().enumerate() {
        let first = position == 0;
        items = match (key.field, key.direction) {
            ("created_at", SortDirection::Descending) => {
                order!(items, first, contratos::created_at.desc())
            }
            ("created_at", SortDirection::Ascending) => {
                order!(items, first, contratos::created_at.asc())
            }
            ("numero_contrato", SortDirection::Descending) => {
                order!(items, first, contratos::numero_contrato.desc())
            }
            ("id", SortDirection::Descending) => order!(items, first, contratos::id.desc()),
            ("id", SortDirection::Ascending) => order!(items, first, contratos::id.asc()),
            _ => return Err(unsupported("contratos", key)),
        };
    }
    Ok(items)
}

impl DieselRepository {
    /// Attaches each contract's client and project.
    fn contract_listings(
        &self,
        conn: &mut SqliteConnection,
        rows: Vec<DbContract>,
    ) -> RepositoryResult<Vec<ContractListing>> {
        let owners = summaries::clients(conn, rows.iter().map(|row| row.cliente_id))?;
        let projects = summaries::projects(conn, rows.iter().filter_map(|row| row.projeto_id))?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<ContractListing> {
                let clientes = owners.get(&row.cliente_id).cloned();
                let projetos = row.projeto_id.and_then(|id| projects.get(&id).cloned());
                Ok(ContractListing {
                    contract: Contract::try_from(row)?,
                    clientes,
                    projetos,
                })
            })
            .collect()
    }
}

impl ContractReader for DieselRepository {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<ContractListing>> {
        let mut conn = self.conn()?;

        let Some(row) = contratos::table
            .find(id.get())
            .first::<DbContract>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        Ok(self.contract_listings(&mut conn, vec![row])?.pop())
    }

    fn list_contracts(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<ContractListing>)> {
        let mut conn = self.conn()?;

        let (total, rows) = load_page!(&mut conn, query, filtered, sorted, DbContract);
        let contracts = self.contract_listings(&mut conn, rows)?;

        Ok((total, contracts))
    }
}

impl ContractWriter for DieselRepository {
    fn create_contract(&self, contract: &NewContract) -> RepositoryResult<Contract> {
        let mut conn = self.conn()?;

        // Takes the write lock before reading MAX so concurrent creates queue.
        let created = conn.immediate_transaction::<DbContract, diesel::result::Error, _>(|conn| {
            let last = contratos::table
                .select(max(contratos::numero_contrato))
                .first::<Option<i32>>(conn)?;
            let numero_contrato = last.unwrap_or(0) + 1;

            diesel::insert_into(contratos::table)
                .values(DbNewContract::new(contract, numero_contrato))
                .get_result::<DbContract>(conn)
        })?;

        Ok(Contract::try_from(created)?)
    }

    fn update_contract(
        &self,
        id: ContractId,
        contract: &NewContract,
    ) -> RepositoryResult<Contract> {
        let mut conn = self.conn()?;

        let updated = diesel::update(contratos::table.find(id.get()))
            .set(DbUpdateContract::new(contract, Utc::now().naive_utc()))
            .get_result::<DbContract>(&mut conn)?;

        Ok(Contract::try_from(updated)?)
    }

    fn delete_contract(&self, id: ContractId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(contratos::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
