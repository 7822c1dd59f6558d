use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::schedule::NewSchedulePhase;
use crate::domain::types::{PhaseStatus, ProjectId, optional_rich_text, optional_text};

pub const END_BEFORE_START: &str = "Data de fim deve ser posterior à data de início";
pub const PERCENT_RANGE: &str = "Percentual deve estar entre 0 e 100";

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "ends_after_start", skip_on_field_errors = false))]
/// Payload for creating or replacing a schedule phase.
pub struct ScheduleForm {
    pub projeto_id: ProjectId,
    #[validate(length(min = 3, max = 255))]
    pub fase: String,
    pub descricao: Option<String>,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub data_inicio_real: Option<NaiveDate>,
    pub data_fim_real: Option<NaiveDate>,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "Percentual deve estar entre 0 e 100"))]
    pub percentual_concluido: i32,
    #[serde(default)]
    pub status: PhaseStatus,
    pub responsavel: Option<String>,
    pub dependencias: Option<String>,
    pub observacoes: Option<String>,
}

fn ends_after_start(form: &ScheduleForm) -> Result<(), ValidationError> {
    if form.data_fim > form.data_inicio {
        Ok(())
    } else {
        Err(ValidationError::new("date_order").with_message(Cow::Borrowed(END_BEFORE_START)))
    }
}

impl From<ScheduleForm> for NewSchedulePhase {
    fn from(form: ScheduleForm) -> Self {
        Self {
            projeto_id: form.projeto_id,
            fase: form.fase.trim().to_string(),
            descricao: optional_rich_text(form.descricao),
            data_inicio: form.data_inicio,
            data_fim: form.data_fim,
            data_inicio_real: form.data_inicio_real,
            data_fim_real: form.data_fim_real,
            percentual_concluido: form.percentual_concluido,
            status: form.status,
            responsavel: optional_text(form.responsavel),
            dependencias: optional_text(form.dependencias),
            observacoes: optional_rich_text(form.observacoes),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Body of the progress update.
pub struct ProgressForm {
    #[validate(range(min = 0, max = 100, message = "Percentual deve estar entre 0 e 100"))]
    pub percentual_concluido: i32,
}
