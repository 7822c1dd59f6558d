use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::project::NewProject;
use crate::domain::types::{ClientId, ProjectStatus, optional_rich_text};

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating or replacing a project.
pub struct ProjectForm {
    pub cliente_id: ClientId,
    #[validate(length(min = 3, max = 255))]
    pub nome: String,
    pub descricao: Option<String>,
    #[serde(default)]
    pub tecnologias: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub data_inicio: Option<NaiveDate>,
    pub data_alvo: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub horas_estimadas: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub horas_trabalhadas: f64,
    #[validate(range(min = 0.0))]
    pub valor_estimado: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub progresso: f64,
    pub observacoes: Option<String>,
}

impl From<ProjectForm> for NewProject {
    fn from(form: ProjectForm) -> Self {
        Self {
            cliente_id: form.cliente_id,
            nome: form.nome.trim().to_string(),
            descricao: optional_rich_text(form.descricao),
            tecnologias: form
                .tecnologias
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            status: form.status,
            data_inicio: form.data_inicio,
            data_alvo: form.data_alvo,
            data_conclusao: form.data_conclusao,
            horas_estimadas: form.horas_estimadas,
            horas_trabalhadas: form.horas_trabalhadas,
            valor_estimado: form.valor_estimado,
            progresso: form.progresso,
            observacoes: optional_rich_text(form.observacoes),
        }
    }
}
