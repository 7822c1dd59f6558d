use chrono::NaiveDate;

use crate::domain::dashboard::{ActivityWindow, Dashboard};
use crate::repository::DashboardReader;
use crate::services::{ServiceResult, repository_failure};

const DASHBOARD_UNAVAILABLE: &str = "Dados do dashboard indisponíveis";

/// Aggregates for the home screen, with activity counted a week either
/// side of `today`.
pub fn dashboard<R>(repo: &R, today: NaiveDate) -> ServiceResult<Dashboard>
where
    R: DashboardReader + ?Sized,
{
    let window = ActivityWindow::around(today);

    let snapshot = repo
        .dashboard_snapshot(&window)
        .map_err(repository_failure("Failed to load dashboard", DASHBOARD_UNAVAILABLE))?;

    Ok(Dashboard::from_snapshot(&snapshot))
}
