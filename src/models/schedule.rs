use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::schedule::{
    NewSchedulePhase as DomainNewPhase, Progress, SchedulePhase as DomainPhase,
};
use crate::domain::types::{PhaseId, ProjectId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::cronograma)]
pub struct SchedulePhase {
    pub id: i32,
    pub projeto_id: i32,
    pub fase: String,
    pub descricao: Option<String>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    pub percentual_concluido: i32,
    pub status: String,
    pub responsavel: Option<String>,
    pub dependencias: Option<String>,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::cronograma)]
pub struct NewSchedulePhase<'a> {
    pub projeto_id: i32,
    pub fase: &'a str,
    pub descricao: Option<&'a str>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    pub percentual_concluido: i32,
    pub status: &'a str,
    pub responsavel: Option<&'a str>,
    pub dependencias: Option<&'a str>,
    pub observacoes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::cronograma)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateSchedulePhase<'a> {
    pub projeto_id: i32,
    pub fase: &'a str,
    pub descricao: Option<&'a str>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    pub percentual_concluido: i32,
    pub status: &'a str,
    pub responsavel: Option<&'a str>,
    pub dependencias: Option<&'a str>,
    pub observacoes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// Progress changeset; absent dates are skipped rather than cleared.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::cronograma)]
pub struct RecordProgress {
    pub percentual_concluido: i32,
    pub status: &'static str,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<SchedulePhase> for DomainPhase {
    type Error = TypeConstraintError;

    fn try_from(phase: SchedulePhase) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PhaseId::new(phase.id)?,
            projeto_id: ProjectId::new(phase.projeto_id)?,
            fase: phase.fase,
            descricao: phase.descricao,
            data_inicio: phase.data_inicio,
            data_fim: phase.data_fim,
            data_inicio_real: phase.data_inicio_real,
            data_fim_real: phase.data_fim_real,
            percentual_concluido: phase.percentual_concluido,
            status: phase.status.parse()?,
            responsavel: phase.responsavel,
            dependencias: phase.dependencias,
            observacoes: phase.observacoes,
            created_at: phase.created_at,
            updated_at: phase.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPhase> for NewSchedulePhase<'a> {
    fn from(phase: &'a DomainNewPhase) -> Self {
        Self {
            projeto_id: phase.projeto_id.get(),
            fase: phase.fase.as_str(),
            descricao: phase.descricao.as_deref(),
            data_inicio: phase.data_inicio,
            data_fim: phase.data_fim,
            data_inicio_real: phase.data_inicio_real,
            data_fim_real: phase.data_fim_real,
            percentual_concluido: phase.percentual_concluido,
            status: phase.status.as_str(),
            responsavel: phase.responsavel.as_deref(),
            dependencias: phase.dependencias.as_deref(),
            observacoes: phase.observacoes.as_deref(),
        }
    }
}

impl<'a> UpdateSchedulePhase<'a> {
    pub fn new(phase: &'a DomainNewPhase, updated_at: NaiveDateTime) -> Self {
        let row = NewSchedulePhase::from(phase);
        Self {
            projeto_id: row.projeto_id,
            fase: row.fase,
            descricao: row.descricao,
            data_inicio: row.data_inicio,
            data_fim: row.data_fim,
            data_inicio_real: row.data_inicio_real,
            data_fim_real: row.data_fim_real,
            percentual_concluido: row.percentual_concluido,
            status: row.status,
            responsavel: row.responsavel,
            dependencias: row.dependencias,
            observacoes: row.observacoes,
            updated_at,
        }
    }
}

impl RecordProgress {
    pub fn new(progress: &Progress, updated_at: NaiveDateTime) -> Self {
        Self {
            percentual_concluido: progress.percentual_concluido,
            status: progress.status.as_str(),
            data_inicio_real: progress.data_inicio_real,
            data_fim_real: progress.data_fim_real,
            updated_at,
        }
    }
}
