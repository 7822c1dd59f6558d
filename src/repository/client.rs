use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::fold_case;
use crate::domain::client::{Client, NewClient};
use crate::domain::types::ClientId;
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::query::{Predicate, QueryDescriptor, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientReader, ClientWriter, Condition, DieselRepository, any_of, conditions, like_pattern,
    parse_bool, unsupported,
};
use crate::schema::clientes;

type ClientQuery = clientes::BoxedQuery<'static, Sqlite>;

fn search_field(field: &str, pattern: &str) -> RepositoryResult<Condition<clientes::table>> {
    let pattern = pattern.to_string();
    let condition: Condition<clientes::table> = match field {
        "nome_empresa" => Box::new(fold_case(clientes::nome_empresa).like(pattern)),
        "nome_completo" => Box::new(fold_case(clientes::nome_completo).like(pattern)),
        "email" => Box::new(fold_case(clientes::email).like(pattern)),
        other => return Err(unsupported("clientes", other)),
    };
    Ok(condition)
}

fn condition(predicate: &Predicate) -> RepositoryResult<Condition<clientes::table>> {
    let condition: Condition<clientes::table> = match predicate {
        Predicate::Equals {
            field: field @ "ativo",
            value,
        } => Box::new(clientes::ativo.eq(parse_bool(field, value)?).nullable()),
        Predicate::Equals {
            field: "tipo_pessoa",
            value,
        } => Box::new(clientes::tipo_pessoa.eq(value.clone()).nullable()),
        Predicate::Matches { fields, term } => {
            let pattern = like_pattern(term);
            let matches = fields
                .iter()
                .map(|field| search_field(field, &pattern))
                .collect::<RepositoryResult<Vec<_>>>()?;
            any_of(matches).ok_or_else(|| unsupported("clientes", predicate))?
        }
        other => return Err(unsupported("clientes", other)),
    };
    Ok(condition)
}

fn filtered(query: &QueryDescriptor) -> RepositoryResult<ClientQuery> {
    conditions(query, condition).map(|conditions| {
        conditions
            .into_iter()
            .fold(clientes::table.into_boxed(), |items, condition| {
                items.filter(condition)
            })
    })
}

fn sorted(mut items: ClientQuery, query: &QueryDescriptor) -> RepositoryResult<ClientQuery> {
    for (position, key) in query.sort().iter().enumerate() {
        let first = position == 0;
        items = match (key.field, key.direction) {
            ("created_at", SortDirection::Descending) => {
                order!(items, first, clientes::created_at.desc())
            }
            ("created_at", SortDirection::Ascending) => {
                order!(items, first, clientes::created_at.asc())
            }
            ("id", SortDirection::Descending) => order!(items, first, clientes::id.desc()),
            ("id", SortDirection::Ascending) => order!(items, first, clientes::id.asc()),
            _ => return Err(unsupported("clientes", key)),
        };
    }
    Ok(items)
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        let mut conn = self.conn()?;

        let client = clientes::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(Client::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_clients(&self, query: &QueryDescriptor) -> RepositoryResult<(usize, Vec<Client>)> {
        let mut conn = self.conn()?;

        let (total, rows) = load_page!(&mut conn, query, filtered, sorted, DbClient);
        let clients = rows
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(clientes::table)
            .values(DbNewClient::from(client))
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(created)?)
    }

    fn update_client(&self, id: ClientId, client: &NewClient) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let updated = diesel::update(clientes::table.find(id.get()))
            .set(DbUpdateClient::new(client, Utc::now().naive_utc()))
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(updated)?)
    }

    fn deactivate_client(&self, id: ClientId) -> RepositoryResult<Client> {
        let mut conn = self.conn()?;

        let updated = diesel::update(clientes::table.find(id.get()))
            .set((
                clientes::ativo.eq(false),
                clientes::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(updated)?)
    }

    fn delete_client(&self, id: ClientId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(clientes::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
