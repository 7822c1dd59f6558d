use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::financial::{FinancialEntry, FinancialListing, NewFinancialEntry, Payment};
use crate::domain::types::{EntryStatus, FinancialEntryId, PaymentMethod};
use crate::models::financial::{
    FinancialEntry as DbFinancialEntry, NewFinancialEntry as DbNewFinancialEntry,
    PayFinancialEntry as DbPayFinancialEntry, UpdateFinancialEntry as DbUpdateFinancialEntry,
};
use crate::query::{Predicate, QueryDescriptor, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Condition, DieselRepository, FinancialReader, FinancialWriter, conditions, parse_date,
    parse_id, summaries, unsupported,
};
use crate::schema::financeiro;

type EntryQuery = financeiro::BoxedQuery<'static, Sqlite>;

fn condition(predicate: &Predicate) -> RepositoryResult<Condition<financeiro::table>> {
    let condition: Condition<financeiro::table> = match predicate {
        Predicate::Equals {
            field: "tipo_movimento",
            value,
        } => Box::new(financeiro::tipo_movimento.eq(value.clone()).nullable()),
        Predicate::Equals {
            field: "status",
            value,
        } => Box::new(financeiro::status.eq(value.clone()).nullable()),
        Predicate::Equals {
            field: field @ "contrato_id",
            value,
        } => Box::new(financeiro::contrato_id.eq(parse_id(field, value)?).nullable()),
        Predicate::AtLeast {
            field: field @ "data_vencimento",
            value,
        } => Box::new(financeiro::data_vencimento.ge(parse_date(field, value)?)),
        Predicate::AtMost {
            field: field @ "data_vencimento",
            value,
        } => Box::new(financeiro::data_vencimento.le(parse_date(field, value)?)),
        Predicate::Before {
            field: field @ "data_vencimento",
            value,
        } => Box::new(financeiro::data_vencimento.lt(parse_date(field, value)?)),
        other => return Err(unsupported("financeiro", other)),
    };
    Ok(condition)
}

fn filtered(query: &QueryDescriptor) -> RepositoryResult<EntryQuery> {
    conditions(query, condition).map(|conditions| {
        conditions
            .into_iter()
            .fold(financeiro::table.into_boxed(), |items, condition| {
                items.filter(condition)
            })
    })
}

fn sorted(mut items: EntryQuery, query: &QueryDescriptor) -> RepositoryResult<EntryQuery> {
    for (position, key) in query.sort().iter().enumerate() {
        let first = position == 0;
        items = match (key.field, key.direction) {
            ("data_vencimento", SortDirection::Descending) => {
                order!(items, first, financeiro::data_vencimento.desc())
            }
            ("data_vencimento", SortDirection::Ascending) => {
                order!(items, first, financeiro::data_vencimento.asc())
            }
            ("id", SortDirection::Descending) => order!(items, first, financeiro::id.desc()),
            ("id", SortDirection::Ascending) => order!(items, first, financeiro::id.asc()),
            _ => return Err(unsupported("financeiro", key)),
        };
    }
    Ok(items)
}

impl DieselRepository {
    /// Attaches each entry's contract, with the contract's client and project.
    fn entry_listings(
        &self,
        conn: &mut SqliteConnection,
        rows: Vec<DbFinancialEntry>,
    ) -> RepositoryResult<Vec<FinancialListing>> {
        let contracts = summaries::contracts(conn, rows.iter().map(|row| row.contrato_id))?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<FinancialListing> {
                let contratos = contracts.get(&row.contrato_id).cloned();
                Ok(FinancialListing {
                    entry: FinancialEntry::try_from(row)?,
                    contratos,
                })
            })
            .collect()
    }
}

impl FinancialReader for DieselRepository {
    fn get_entry_by_id(&self, id: FinancialEntryId) -> RepositoryResult<Option<FinancialListing>> {
        let mut conn = self.conn()?;

        let Some(row) = financeiro::table
            .find(id.get())
            .first::<DbFinancialEntry>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        Ok(self.entry_listings(&mut conn, vec![row])?.pop())
    }

    fn list_entries(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<FinancialListing>)> {
        let mut conn = self.conn()?;

        let (total, rows) = load_page!(&mut conn, query, filtered, sorted, DbFinancialEntry);
        let entries = self.entry_listings(&mut conn, rows)?;

        Ok((total, entries))
    }
}

impl FinancialWriter for DieselRepository {
    fn create_entry(&self, entry: &NewFinancialEntry) -> RepositoryResult<FinancialEntry> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(financeiro::table)
            .values(DbNewFinancialEntry::from(entry))
            .get_result::<DbFinancialEntry>(&mut conn)?;

        Ok(FinancialEntry::try_from(created)?)
    }

    fn update_entry(
        &self,
        id: FinancialEntryId,
        entry: &NewFinancialEntry,
    ) -> RepositoryResult<FinancialEntry> {
        let mut conn = self.conn()?;

        let updated = diesel::update(financeiro::table.find(id.get()))
            .set(DbUpdateFinancialEntry::new(entry, Utc::now().naive_utc()))
            .get_result::<DbFinancialEntry>(&mut conn)?;

        Ok(FinancialEntry::try_from(updated)?)
    }

    fn mark_entry_paid(
        &self,
        id: FinancialEntryId,
        payment: &Payment,
    ) -> RepositoryResult<FinancialEntry> {
        let mut conn = self.conn()?;

        let changes = DbPayFinancialEntry {
            status: EntryStatus::Paid.as_str(),
            data_pagamento: payment.data_pagamento,
            forma_pagamento: payment.forma_pagamento.map(PaymentMethod::as_str),
            updated_at: Utc::now().naive_utc(),
        };

        let updated = diesel::update(financeiro::table.find(id.get()))
            .set(changes)
            .get_result::<DbFinancialEntry>(&mut conn)?;

        Ok(FinancialEntry::try_from(updated)?)
    }

    fn delete_entry(&self, id: FinancialEntryId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(financeiro::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
