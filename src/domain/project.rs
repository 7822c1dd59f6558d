use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientSummary;
use crate::domain::types::{ClientId, ProjectId, ProjectStatus};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub cliente_id: ClientId,
    pub nome: String,
    pub descricao: Option<String>,
    pub tecnologias: Vec<String>,
    pub status: ProjectStatus,
    pub data_inicio: Option<NaiveDate>,
    pub data_alvo: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    pub horas_estimadas: Option<f64>,
    pub horas_trabalhadas: f64,
    pub valor_estimado: Option<f64>,
    /// Completion percentage in `0..=100`.
    pub progresso: f64,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewProject {
    pub cliente_id: ClientId,
    pub nome: String,
    pub descricao: Option<String>,
    pub tecnologias: Vec<String>,
    pub status: ProjectStatus,
    pub data_inicio: Option<NaiveDate>,
    pub data_alvo: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    pub horas_estimadas: Option<f64>,
    pub horas_trabalhadas: f64,
    pub valor_estimado: Option<f64>,
    pub progresso: f64,
    pub observacoes: Option<String>,
}

/// Project row together with its client.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProjectListing {
    #[serde(flatten)]
    pub project: Project,
    pub clientes: Option<ClientSummary>,
}

/// Project fields embedded in contract, entry and meeting rows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectSummary {
    pub nome: String,
    pub descricao: Option<String>,
    pub clientes: Option<ClientSummary>,
}
