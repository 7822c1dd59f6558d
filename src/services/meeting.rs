//! Meeting workflows and the upcoming-meetings agenda.

use chrono::NaiveDate;
use serde_json::Value;

use crate::denormalize::Projection;
use crate::domain::meeting::{Meeting, NewMeeting};
use crate::domain::types::{MeetingId, MeetingStatus};
use crate::forms::meeting::MeetingForm;
use crate::pagination::Paginated;
use crate::query::{FilterRule, FilterSet, Predicate, QueryDescriptor, QuerySpec, SortKey};
use crate::repository::{MeetingReader, MeetingWriter, ProjectReader};
use crate::services::{
    ServiceError, ServiceResult, ensure_project, flatten_row, flatten_rows, page_request, path_id,
    repository_failure, validated,
};

pub const MEETING_NOT_FOUND: &str = "Reunião não encontrada";

pub const MEETING_QUERY: QuerySpec = QuerySpec {
    rules: &[
        FilterRule::Equals {
            param: "projeto_id",
            field: "projeto_id",
        },
        FilterRule::Equals {
            param: "status",
            field: "status",
        },
        FilterRule::From {
            param: "data_inicio",
            field: "data_reuniao",
        },
        FilterRule::Until {
            param: "data_fim",
            field: "data_reuniao",
        },
    ],
    sort: &[SortKey::desc("data_reuniao"), SortKey::desc("id")],
};

const AGENDA_SORT: &[SortKey] = &[
    SortKey::asc("data_reuniao"),
    SortKey::asc("hora_inicio"),
    SortKey::asc("id"),
];

pub const MEETING_FIELDS: &[Projection] = &[
    Projection::new("projeto_nome", &["projetos.nome"]),
    Projection::new("nome_empresa", &["projetos.clientes.nome_empresa"]),
    Projection::new("nome_completo", &["projetos.clientes.nome_completo"]),
];

pub fn list_meetings<R>(repo: &R, filters: &FilterSet) -> ServiceResult<Paginated<Value>>
where
    R: MeetingReader + ?Sized,
{
    let page = page_request(filters)?;
    let query = MEETING_QUERY.build(filters).paginate(page.window());

    let (total, meetings) = repo
        .list_meetings(&query)
        .map_err(repository_failure("Failed to list meetings", MEETING_NOT_FOUND))?;

    Ok(Paginated::new(
        flatten_rows(&meetings, MEETING_FIELDS)?,
        page,
        total,
    ))
}

pub fn get_meeting<R>(repo: &R, meeting_id: i32) -> ServiceResult<Value>
where
    R: MeetingReader + ?Sized,
{
    let meeting_id: MeetingId = path_id(meeting_id, MEETING_NOT_FOUND)?;

    let meeting = repo
        .get_meeting_by_id(meeting_id)
        .map_err(repository_failure("Failed to load meeting", MEETING_NOT_FOUND))?
        .ok_or_else(|| ServiceError::NotFound(MEETING_NOT_FOUND.to_string()))?;

    flatten_row(&meeting, MEETING_FIELDS)
}

pub fn create_meeting<R>(repo: &R, form: MeetingForm) -> ServiceResult<Meeting>
where
    R: MeetingWriter + ProjectReader + ?Sized,
{
    let meeting = NewMeeting::from(validated(form)?);
    ensure_project(repo, meeting.projeto_id)?;

    repo.create_meeting(&meeting)
        .map_err(repository_failure("Failed to create meeting", MEETING_NOT_FOUND))
}

pub fn update_meeting<R>(repo: &R, meeting_id: i32, form: MeetingForm) -> ServiceResult<Meeting>
where
    R: MeetingWriter + ProjectReader + ?Sized,
{
    let meeting = NewMeeting::from(validated(form)?);
    let meeting_id: MeetingId = path_id(meeting_id, MEETING_NOT_FOUND)?;
    ensure_project(repo, meeting.projeto_id)?;

    repo.update_meeting(meeting_id, &meeting)
        .map_err(repository_failure("Failed to update meeting", MEETING_NOT_FOUND))
}

pub fn delete_meeting<R>(repo: &R, meeting_id: i32) -> ServiceResult<()>
where
    R: MeetingWriter + ?Sized,
{
    let meeting_id: MeetingId = path_id(meeting_id, MEETING_NOT_FOUND)?;

    repo.delete_meeting(meeting_id)
        .map_err(repository_failure("Failed to delete meeting", MEETING_NOT_FOUND))
}

/// Scheduled meetings from `data_inicio` (default `today`) up to the
/// optional `data_fim`, in calendar order.
pub fn agenda<R>(repo: &R, filters: &FilterSet, today: NaiveDate) -> ServiceResult<Vec<Value>>
where
    R: MeetingReader + ?Sized,
{
    let start = filters
        .get("data_inicio")
        .map(str::to_string)
        .unwrap_or_else(|| today.to_string());

    let mut query = QueryDescriptor::new(AGENDA_SORT)
        .with(Predicate::Equals {
            field: "status",
            value: MeetingStatus::Scheduled.as_str().to_string(),
        })
        .with(Predicate::AtLeast {
            field: "data_reuniao",
            value: start,
        });
    if let Some(end) = filters.get("data_fim") {
        query = query.with(Predicate::AtMost {
            field: "data_reuniao",
            value: end.to_string(),
        });
    }

    let (_, meetings) = repo
        .list_meetings(&query)
        .map_err(repository_failure("Failed to load agenda", MEETING_NOT_FOUND))?;

    flatten_rows(&meetings, MEETING_FIELDS)
}
