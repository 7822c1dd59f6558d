//! Persistence traits and their Diesel implementation.
//!
//! Services depend on the `*Reader` / `*Writer` traits only; the concrete
//! [`DieselRepository`] implements all of them over one SQLite pool. List
//! methods execute a [`QueryDescriptor`] as two independent statements, a
//! count over the filtered rows and a windowed data query, and return
//! `(total, rows)`.

use chrono::NaiveDate;
use diesel::expression::BoxableExpression;
use diesel::sql_types::{Bool, Nullable};
use diesel::sqlite::Sqlite;

use crate::db::{DbConnection, DbPool};
use crate::domain::client::{Client, NewClient};
use crate::domain::contract::{Contract, ContractListing, NewContract};
use crate::domain::dashboard::{ActivityWindow, DashboardSnapshot};
use crate::domain::financial::{FinancialEntry, FinancialListing, NewFinancialEntry, Payment};
use crate::domain::meeting::{Meeting, MeetingListing, NewMeeting};
use crate::domain::project::{NewProject, Project, ProjectListing};
use crate::domain::schedule::{NewSchedulePhase, Progress, ScheduleListing, SchedulePhase};
use crate::domain::types::{
    ClientId, ContractId, FinancialEntryId, MeetingId, PhaseId, ProjectId,
};
use crate::pagination::Window;
use crate::query::{Predicate, QueryDescriptor};
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Orders a boxed query by `$expr`, replacing the clause for the first key
/// and appending for the rest.
macro_rules! order {
    ($query:expr, $first:expr, $expr:expr) => {
        if $first {
            $query.order_by($expr)
        } else {
            $query.then_order_by($expr)
        }
    };
}

/// Counts the rows `$filtered` selects, then loads the `$sorted` window of
/// them as `$row`. Evaluates to `(total, rows)`.
macro_rules! load_page {
    ($conn:expr, $query:expr, $filtered:path, $sorted:path, $row:ty) => {{
        let total = $filtered($query)?.count().get_result::<i64>($conn)?;
        let mut items = $sorted($filtered($query)?, $query)?;
        if let Some(window) = $query.window() {
            let (offset, limit) = $crate::repository::window_bounds(window)?;
            items = items.offset(offset).limit(limit);
        }
        let rows = items.load::<$row>($conn)?;
        ($crate::repository::row_count(total)?, rows)
    }};
}

pub mod client;
pub mod contract;
pub mod dashboard;
pub mod errors;
pub mod financial;
pub mod meeting;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod project;
pub mod schedule;
mod summaries;

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: &QueryDescriptor) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, id: ClientId, client: &NewClient) -> RepositoryResult<Client>;
    /// Soft delete: clears the `ativo` flag.
    fn deactivate_client(&self, id: ClientId) -> RepositoryResult<Client>;
    fn delete_client(&self, id: ClientId) -> RepositoryResult<()>;
}

pub trait ProjectReader {
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<ProjectListing>>;
    fn list_projects(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<ProjectListing>)>;
}

pub trait ProjectWriter {
    fn create_project(&self, project: &NewProject) -> RepositoryResult<Project>;
    fn update_project(&self, id: ProjectId, project: &NewProject) -> RepositoryResult<Project>;
    fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;
}

pub trait ContractReader {
    fn get_contract_by_id(&self, id: ContractId) -> RepositoryResult<Option<ContractListing>>;
    fn list_contracts(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<ContractListing>)>;
}

pub trait ContractWriter {
    /// Inserts the contract with the next free `numero_contrato`.
    fn create_contract(&self, contract: &NewContract) -> RepositoryResult<Contract>;
    fn update_contract(&self, id: ContractId, contract: &NewContract)
    -> RepositoryResult<Contract>;
    fn delete_contract(&self, id: ContractId) -> RepositoryResult<()>;
}

pub trait FinancialReader {
    fn get_entry_by_id(&self, id: FinancialEntryId) -> RepositoryResult<Option<FinancialListing>>;
    fn list_entries(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<FinancialListing>)>;
}

pub trait FinancialWriter {
    fn create_entry(&self, entry: &NewFinancialEntry) -> RepositoryResult<FinancialEntry>;
    fn update_entry(
        &self,
        id: FinancialEntryId,
        entry: &NewFinancialEntry,
    ) -> RepositoryResult<FinancialEntry>;
    fn mark_entry_paid(
        &self,
        id: FinancialEntryId,
        payment: &Payment,
    ) -> RepositoryResult<FinancialEntry>;
    fn delete_entry(&self, id: FinancialEntryId) -> RepositoryResult<()>;
}

pub trait MeetingReader {
    fn get_meeting_by_id(&self, id: MeetingId) -> RepositoryResult<Option<MeetingListing>>;
    fn list_meetings(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<MeetingListing>)>;
}

pub trait MeetingWriter {
    fn create_meeting(&self, meeting: &NewMeeting) -> RepositoryResult<Meeting>;
    fn update_meeting(&self, id: MeetingId, meeting: &NewMeeting) -> RepositoryResult<Meeting>;
    fn delete_meeting(&self, id: MeetingId) -> RepositoryResult<()>;
}

pub trait ScheduleReader {
    fn get_phase_by_id(&self, id: PhaseId) -> RepositoryResult<Option<ScheduleListing>>;
    fn list_phases(
        &self,
        query: &QueryDescriptor,
    ) -> RepositoryResult<(usize, Vec<ScheduleListing>)>;
}

pub trait ScheduleWriter {
    fn create_phase(&self, phase: &NewSchedulePhase) -> RepositoryResult<SchedulePhase>;
    fn update_phase(
        &self,
        id: PhaseId,
        phase: &NewSchedulePhase,
    ) -> RepositoryResult<SchedulePhase>;
    fn record_progress(&self, id: PhaseId, progress: &Progress)
    -> RepositoryResult<SchedulePhase>;
    fn delete_phase(&self, id: PhaseId) -> RepositoryResult<()>;
}

pub trait DashboardReader {
    /// Counts and sums across every table, with activity bounded by `window`.
    fn dashboard_snapshot(&self, window: &ActivityWindow) -> RepositoryResult<DashboardSnapshot>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Filter expression over `T`. Every condition is widened to
/// `Nullable<Bool>` so nullable and non-null columns combine freely.
type Condition<T> = Box<dyn BoxableExpression<T, Sqlite, SqlType = Nullable<Bool>>>;

/// ORs the conditions together. `None` when the list is empty.
fn any_of<T: 'static>(conditions: Vec<Condition<T>>) -> Option<Condition<T>> {
    use diesel::BoolExpressionMethods;

    conditions
        .into_iter()
        .reduce(|acc, next| Box::new(acc.or(next)))
}

/// Substring pattern for `LIKE` against a [`fold_case`](crate::db::fold_case)d column.
fn like_pattern(term: &str) -> String {
    format!("%{}%", term.to_lowercase())
}

fn parse_id(field: &str, value: &str) -> RepositoryResult<i32> {
    value
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            RepositoryError::InvalidFilter(format!("{field}: `{value}` is not a valid id"))
        })
}

fn parse_date(field: &str, value: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        RepositoryError::InvalidFilter(format!("{field}: `{value}` is not a YYYY-MM-DD date"))
    })
}

fn parse_bool(field: &str, value: &str) -> RepositoryResult<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(RepositoryError::InvalidFilter(format!(
            "{field}: `{value}` is not a boolean"
        ))),
    }
}

/// `OFFSET`/`LIMIT` operands for `window`.
fn window_bounds(window: Window) -> RepositoryResult<(i64, i64)> {
    match (i64::try_from(window.offset), i64::try_from(window.limit)) {
        (Ok(offset), Ok(limit)) => Ok((offset, limit)),
        _ => Err(RepositoryError::InvalidFilter(format!(
            "window {window:?} exceeds the addressable range"
        ))),
    }
}

fn row_count(total: i64) -> RepositoryResult<usize> {
    usize::try_from(total)
        .map_err(|_| RepositoryError::Unexpected(format!("count returned {total}")))
}

/// A predicate or sort key that names a column the entity does not filter on.
fn unsupported(entity: &str, what: impl std::fmt::Debug) -> RepositoryError {
    RepositoryError::Unexpected(format!("{entity}: unsupported query element {what:?}"))
}

/// Fails on the first predicate that does not map to a condition.
fn conditions<T, F>(query: &QueryDescriptor, mut map: F) -> RepositoryResult<Vec<Condition<T>>>
where
    F: FnMut(&Predicate) -> RepositoryResult<Condition<T>>,
{
    query.predicates().iter().map(&mut map).collect()
}
