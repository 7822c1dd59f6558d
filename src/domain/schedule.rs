use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::project::ProjectSummary;
use crate::domain::types::{PhaseId, PhaseStatus, ProjectId};

/// One phase of a project's schedule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SchedulePhase {
    pub id: PhaseId,
    pub projeto_id: ProjectId,
    pub fase: String,
    pub descricao: Option<String>,
    /// Planned start; always before `data_fim`.
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    pub percentual_concluido: i32,
    pub status: PhaseStatus,
    pub responsavel: Option<String>,
    /// Comma-separated references to the phases this one waits on.
    pub dependencias: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SchedulePhase {
    /// The stored status, except that an open phase whose planned end has
    /// passed reports [`PhaseStatus::Late`].
    pub fn effective_status(&self, today: NaiveDate) -> PhaseStatus {
        if !self.status.is_closed() && self.data_fim < today {
            PhaseStatus::Late
        } else {
            self.status
        }
    }

    pub fn planned_days(&self) -> i64 {
        (self.data_fim - self.data_inicio).num_days()
    }

    /// `None` until both actual dates are recorded.
    pub fn actual_days(&self) -> Option<i64> {
        match (self.data_inicio_real, self.data_fim_real) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }

    pub fn dependency_list(&self) -> Vec<String> {
        self.dependencias
            .as_deref()
            .map(|deps| {
                deps.split(',')
                    .map(str::trim)
                    .filter(|dep| !dep.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewSchedulePhase {
    pub projeto_id: ProjectId,
    pub fase: String,
    pub descricao: Option<String>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    pub percentual_concluido: i32,
    pub status: PhaseStatus,
    pub responsavel: Option<String>,
    pub dependencias: Option<String>,
    pub observacoes: Option<String>,
}

/// A phase with its project (and the project's client) embedded.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ScheduleListing {
    #[serde(flatten)]
    pub phase: SchedulePhase,
    pub projetos: Option<ProjectSummary>,
}

/// Completion update. `None` dates leave the stored value alone.
#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    pub percentual_concluido: i32,
    pub status: PhaseStatus,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
}

impl Progress {
    /// Derives the status from `percent`. Starting work stamps the actual
    /// start once; reaching 100% stamps the actual end.
    pub fn record(phase: &SchedulePhase, percent: i32, today: NaiveDate) -> Self {
        let data_inicio_real = (percent > 0 && phase.data_inicio_real.is_none()).then_some(today);
        let data_fim_real = (percent >= 100).then_some(today);
        Self {
            percentual_concluido: percent,
            status: PhaseStatus::for_progress(percent),
            data_inicio_real,
            data_fim_real,
        }
    }
}

/// Row of the Gantt chart feed.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GanttBar {
    pub id: PhaseId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: i32,
    pub status: PhaseStatus,
    pub dependencies: Vec<String>,
    pub responsavel: Option<String>,
    pub descricao: Option<String>,
}

impl From<SchedulePhase> for GanttBar {
    fn from(phase: SchedulePhase) -> Self {
        let dependencies = phase.dependency_list();
        Self {
            id: phase.id,
            name: phase.fase,
            start: phase.data_inicio,
            end: phase.data_fim,
            progress: phase.percentual_concluido,
            status: phase.status,
            dependencies,
            responsavel: phase.responsavel,
            descricao: phase.descricao,
        }
    }
}
