use chrono::NaiveTime;
use diesel::dsl::{count_star, sum};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::dashboard::{ActivityWindow, DashboardSnapshot};
use crate::domain::types::{EntryKind, EntryStatus, MeetingStatus, PhaseStatus};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DashboardReader, DieselRepository, row_count};
use crate::schema::{clientes, contratos, cronograma, financeiro, projetos, reunioes};

/// Converts `(token, count)` rows from a `GROUP BY`.
fn tokens(rows: Vec<(String, i64)>) -> RepositoryResult<Vec<(String, usize)>> {
    rows.into_iter()
        .map(|(token, count)| Ok((token, row_count(count)?)))
        .collect()
}

fn income_or_expense(conn: &mut SqliteConnection, kind: EntryKind) -> RepositoryResult<f64> {
    let total = financeiro::table
        .filter(financeiro::tipo_movimento.eq(kind.as_str()))
        .select(sum(financeiro::valor))
        .first::<Option<f64>>(conn)?;
    Ok(total.unwrap_or(0.0))
}

impl DashboardReader for DieselRepository {
    fn dashboard_snapshot(&self, window: &ActivityWindow) -> RepositoryResult<DashboardSnapshot> {
        let mut conn = self.conn()?;
        let since = window.recent_since.and_time(NaiveTime::MIN);
        let closed_phases = [PhaseStatus::Finished.as_str(), PhaseStatus::Cancelled.as_str()];

        let clients_by_kind = clientes::table
            .group_by(clientes::tipo_pessoa)
            .select((clientes::tipo_pessoa, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let active_clients = clientes::table
            .filter(clientes::ativo.eq(true))
            .count()
            .get_result::<i64>(&mut conn)?;
        let new_clients = clientes::table
            .filter(clientes::created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?;

        let projects_by_status = projetos::table
            .group_by(projetos::status)
            .select((projetos::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let new_projects = projetos::table
            .filter(projetos::created_at.ge(since))
            .count()
            .get_result::<i64>(&mut conn)?;

        let contracts_by_status = contratos::table
            .group_by(contratos::status)
            .select((contratos::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let contract_value = contratos::table
            .select(sum(contratos::valor_contrato))
            .first::<Option<f64>>(&mut conn)?;

        let entries_by_status = financeiro::table
            .group_by(financeiro::status)
            .select((financeiro::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let income = income_or_expense(&mut conn, EntryKind::Income)?;
        let expenses = income_or_expense(&mut conn, EntryKind::Expense)?;
        let entries_due_soon = financeiro::table
            .filter(financeiro::status.eq(EntryStatus::Open.as_str()))
            .filter(financeiro::data_vencimento.ge(window.today))
            .filter(financeiro::data_vencimento.le(window.upcoming_until))
            .count()
            .get_result::<i64>(&mut conn)?;

        let meetings_by_status = reunioes::table
            .group_by(reunioes::status)
            .select((reunioes::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let meetings_by_kind = reunioes::table
            .group_by(reunioes::tipo)
            .select((reunioes::tipo, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let recent_meetings_held = reunioes::table
            .filter(reunioes::status.eq(MeetingStatus::Held.as_str()))
            .filter(reunioes::data_reuniao.ge(window.recent_since))
            .filter(reunioes::data_reuniao.le(window.today))
            .count()
            .get_result::<i64>(&mut conn)?;
        let upcoming_meetings = reunioes::table
            .filter(reunioes::status.eq(MeetingStatus::Scheduled.as_str()))
            .filter(reunioes::data_reuniao.ge(window.today))
            .filter(reunioes::data_reuniao.le(window.upcoming_until))
            .count()
            .get_result::<i64>(&mut conn)?;

        let phases_by_status = cronograma::table
            .group_by(cronograma::status)
            .select((cronograma::status, count_star()))
            .load::<(String, i64)>(&mut conn)?;
        let late_phases = cronograma::table
            .filter(cronograma::status.ne_all(closed_phases))
            .filter(cronograma::data_fim.lt(window.today))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(DashboardSnapshot {
            clients_by_kind: tokens(clients_by_kind)?,
            active_clients: row_count(active_clients)?,
            projects_by_status: tokens(projects_by_status)?,
            contracts_by_status: tokens(contracts_by_status)?,
            contract_value: contract_value.unwrap_or(0.0),
            entries_by_status: tokens(entries_by_status)?,
            income,
            expenses,
            meetings_by_status: tokens(meetings_by_status)?,
            meetings_by_kind: tokens(meetings_by_kind)?,
            phases_by_status: tokens(phases_by_status)?,
            late_phases: row_count(late_phases)?,
            new_clients: row_count(new_clients)?,
            new_projects: row_count(new_projects)?,
            recent_meetings_held: row_count(recent_meetings_held)?,
            upcoming_meetings: row_count(upcoming_meetings)?,
            entries_due_soon: row_count(entries_due_soon)?,
        })
    }
}
