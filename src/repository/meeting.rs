use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::domain::meeting::{Meeting, MeetingListing, NewMeeting};
use crate::domain::types::MeetingId;
use crate::models::meeting::{
    Meeting as DbMeeting, NewMeeting as DbNewMeeting, UpdateMeeting as DbUpdateMeeting,
};
use crate::query::{Predicate, QueryDescriptor, SortDirection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    Condition, DieselRepository, MeetingReader, MeetingWriter, conditions, parse_date, parse_id,
    summaries, unsupported,
};
use crate::schema::reunioes;

type MeetingQuery = reunioes::BoxedQuery<'static, Sqlite>;

fn condition(predicate: &Predicate) -> RepositoryResult<Condition<reunioes::table>> {
    let condition: Condition<reunioes::table> = match predicate {
        Predicate::Equals {
            field: field @ "projeto_id",
            value,
        } => Box::new(reunioes::projeto_id.eq(parse_id(field, value)?).nullable()),
        Predicate::Equals {
            field: "status",
            value,
        } => Box::new(reunioes::status.eq(value.clone()).nullable()),
        Predicate::AtLeast {
            field: field @ "data_reuniao",
            value,
        } => Box::new(reunioes::data_reuniao.ge(parse_date(field, value)?).nullable()),
        Predicate::AtMost {
            field: field @ "data_reuniao",
            value,
        } => Box::new(reunioes::data_reuniao.le(parse_date(field, value)?).nullable()),
        other => return Err(unsupported("reunioes", other)),
    };
    Ok(condition)
}

fn filtered(query: &QueryDescriptor) -> RepositoryResult<MeetingQuery> {
    conditions(query, condition).map(|conditions| {
        conditions
            .into_iter()
            .fold(reunioes::table.into_boxed(), |items, condition| {
                items.filter(condition)
            })
    })
}

fn sorted(mut items: MeetingQuery, query: &QueryDescriptor) -> RepositoryResult<MeetingQuery> {
    for (position, key) in query.sort().iter().enumerate() {
        let first = position == 0;
        items = match (key.field, key.direction) {
            ("data_reuniao", SortDirection::Descending) => {
                order!(items, first, reunioes::data_reuniao.desc())
            }
            ("data_reuniao", SortDirection::Ascending) => {
                order!(items, first, reunioes::data_reuniao.asc())
            }
            ("hora_inicio", SortDirection::Descending) => {
                order!(items, first, reunioes::hora_inicio.desc())
            }
            ("hora_inicio", SortDirection::Ascending) => {
                order!(items, first, reunioes::hora_inicio.asc())
            }
            ("id", SortDirection::Descending) => order!(items, first, reunioes::id.desc()),
            ("id", SortDirection::Ascending) => order!(items, first, reunioes::id.asc()),
            _ => return Err(unsupported("reunioes", key)),
        };
    }
    Ok(items)
}

impl DieselRepository {
    /// Attaches each meeting's project, with the project's client.
    fn meeting_listings(
        &self,
        conn: &mut SqliteConnection,
        rows: Vec<DbMeeting>,
    ) -> RepositoryResult<Vec<MeetingListing>> {
        let projects = summaries::projects(conn, rows.iter().map(|row| row.projeto_id))?;

        rows.into_iter()
            .map(|row| -> RepositoryResult<MeetingListing> {
                let projetos = projects.get(&row.projeto_id).cloned();
                Ok(MeetingListing {
                    meeting: Meeting::try_from(row)?,
                    projetos,
                })
            })
            .collect()
    }
}

impl MeetingReader for DieselRepository {
    fn get_meeting_by_id(&self, id: MeetingId) -> RepositoryResult<Option<MeetingListing>> {
        let mut conn = self.conn()?;

        let Some(row) = reunioes::table
            .find(id.get())
            .first::<DbMeeting>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        Ok(self.meeting_listings(&mut conn, vec![row])?.pop())
    }

    fn list_meetings(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<MeetingListing>)> {
        let mut conn = self.conn()?;

        let (total, rows) = load_page!(&mut conn, query, filtered, sorted, DbMeeting);
        let meetings = self.meeting_listings(&mut conn, rows)?;

        Ok((total, meetings))
    }
}

impl MeetingWriter for DieselRepository {
    fn create_meeting(&self, meeting: &NewMeeting) -> RepositoryResult<Meeting> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(reunioes::table)
            .values(DbNewMeeting::from(meeting))
            .get_result::<DbMeeting>(&mut conn)?;

        Ok(Meeting::try_from(created)?)
    }

    fn update_meeting(&self, id: MeetingId, meeting: &NewMeeting) -> RepositoryResult<Meeting> {
        let mut conn = self.conn()?;

        let updated = diesel::update(reunioes::table.find(id.get()))
            .set(DbUpdateMeeting::new(meeting, Utc::now().naive_utc()))
            .get_result::<DbMeeting>(&mut conn)?;

        Ok(Meeting::try_from(updated)?)
    }

    fn delete_meeting(&self, id: MeetingId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(reunioes::table.find(id.get())).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
