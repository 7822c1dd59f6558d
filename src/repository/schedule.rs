use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::db::fold_case;
use crate::domain::schedule::{NewSchedulePhase, Progress, ScheduleListing, SchedulePhase};
use crate::domain::types::PhaseId;
use crate::models::schedule::{
    NewSchedulePhase as DbNewPhase, RecordProgress as DbRecordProgress, SchedulePhase as DbPhase,
    UpdateSchedulePhase as DbUpdatePhase,
};
use crate::query::{Predicate, QueryDescriptor, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Condition, DieselRepository, ScheduleReader, ScheduleWriter, any_of, conditions, like_pattern,
    parse_id, summaries, unsupported,
};
use crate::schema::cronograma;

type PhaseQuery = cronograma::BoxedQuery<'static, Sqlite>;

fn search_field(field: &str, pattern: &str) -> RepositoryResult<Condition<cronograma::table>> {
    let pattern = pattern.to_string();
    let condition: Condition<cronograma::table> = match field {
        "fase" => Box::new(fold_case(cronograma::fase.nullable()).like(pattern)),
        other => return Err(unsupported("cronograma", other)),
    };
    Ok(condition)
}

fn condition(predicate: &Predicate) -> RepositoryResult<Condition<cronograma::table>> {
    let condition: Condition<cronograma::table> = match predicate {
        Predicate::Equals {
            field: field @ "projeto_id",
            value,
        } => Box::new(cronograma::projeto_id.eq(parse_id(field, value)?).nullable()),
        Predicate::Equals {
            field: "status",
            value,
        } => Box::new(cronograma::status.eq(value.clone()).nullable()),
        Predicate::Matches { fields, term } => {
            let pattern = like_pattern(term);
            let matches = fields
                .iter()
                .map(|field| search_field(field, &pattern))
                .collect::<RepositoryResult<Vec<_>>>()?;
            any_of(matches).ok_or_else(|| unsupported("cronograma", predicate))?
        }
        other => return Err(unsupported("cronograma", other)),
    };
    Ok(condition)
}

fn filtered(query: &QueryDescriptor) -> RepositoryResult<PhaseQuery> {
    conditions(query, condition).map(|conditions| {
        conditions
            .into_iter()
            .fold(cronograma::table.into_boxed(), |items, condition| {
                items.filter(condition)
            })
    })
}

fn sorted(mut items: PhaseQuery, query: &QueryDescriptor) -> RepositoryResult<PhaseQuery> {
    for (position, key) in query.sort().iter().enumerate() {
        let first = position == 0;
        items = match (key.field, key.direction) {
            ("data_inicio", SortDirection::Descending) => {
                order!(items, first, cronograma::data_inicio.desc())
            }
            ("data_inicio", SortDirection::Ascending) => {
                order!(items, first, cronograma::data_inicio.asc())
            }
            ("id", SortDirection::Descending) => order!(items, first, cronograma::id.desc()),
            ("id", SortDirection::Ascending) => order!(items, first, cronograma::id.asc()),
            _ => return Err(unsupported("cronograma", key)),
        };
    }
    Ok(items)
}

impl DieselRepository {
    /// Attaches each phase's project, with the project's client.
    fn phase_listings(
        &self,
        conn: &mut SqliteConnection,
        rows: Vec<DbPhase>,
    ) -> RepositoryResult<Vec<ScheduleListing>> {
        let projects = summaries::projects(conn, rows.iter().map(|row| row.projeto_id))?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<ScheduleListing> {
                let projetos = projects.get(&row.projeto_id).cloned();
                Ok(ScheduleListing {
                    phase: SchedulePhase::try_from(row)?,
                    projetos,
                })
            })
            .collect()
    }
}

impl ScheduleReader for DieselRepository {
    fn get_phase_by_id(&self, id: PhaseId) -> RepositoryResult<Option<ScheduleListing>> {
        let mut conn = self.conn()?;

        let Some(row) = cronograma::table
            .find(id.get())
            .first::<DbPhase>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        Ok(self.phase_listings(&mut conn, vec![row])?.pop())
    }

    fn list_phases(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<ScheduleListing>)> {
        let mut conn = self.conn()?;

        let (total, rows) = load_page!(&mut conn, query, filtered, sorted, DbPhase);
        let phases = self.phase_listings(&mut conn, rows)?;

        Ok((total, phases))
    }
}

impl ScheduleWriter for DieselRepository {
    fn create_phase(&self, phase: &NewSchedulePhase) -> RepositoryResult<SchedulePhase> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(cronograma::table)
            .values(DbNewPhase::from(phase))
            .get_result::<DbPhase>(&mut conn)?;

        Ok(SchedulePhase::try_from(created)?)
    }

    fn update_phase(
        &self,
        id: PhaseId,
        phase: &NewSchedulePhase,
    ) -> RepositoryResult<SchedulePhase> {
        let mut conn = self.conn()?;

        let updated = diesel::update(cronograma::table.find(id.get()))
            .set(DbUpdatePhase::new(phase, Utc::now().naive_utc()))
            .get_result::<DbPhase>(&mut conn)?;

        Ok(SchedulePhase::try_from(updated)?)
    }

    fn record_progress(
        &self,
        id: PhaseId,
        progress: &Progress,
    ) -> RepositoryResult<SchedulePhase> {
        let mut conn = self.conn()?;

        let updated = diesel::update(cronograma::table.find(id.get()))
            .set(DbRecordProgress::new(progress, Utc::now().naive_utc()))
            .get_result::<DbPhase>(&mut conn)?;

        Ok(SchedulePhase::try_from(updated)?)
    }

    fn delete_phase(&self, id: PhaseId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(cronograma::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
