use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::project::{NewProject as DomainNewProject, Project as DomainProject};
use crate::domain::types::{ClientId, ProjectId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::projetos)]
/// Diesel model for [`crate::domain::project::Project`].
pub struct Project {
    pub id: i32,
    pub cliente_id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    /// JSON array of technology names.
    pub tecnologias: String,
    pub status: String,
    pub data_inicio: Option<NaiveDate>,
    pub data_alvo: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    pub horas_estimadas: Option<f64>,
    pub horas_trabalhadas: f64,
    pub valor_estimado: Option<f64>,
    pub progresso: f64,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::projetos)]
pub struct NewProject<'a> {
    pub cliente_id: i32,
    pub nome: &'a str,
    pub descricao: Option<&'a str>,
    pub tecnologias: String,
    pub status: &'a str,
    pub data_inicio: Option<NaiveDate>,
    pub data_alvo: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    pub horas_estimadas: Option<f64>,
    pub horas_trabalhadas: f64,
    pub valor_estimado: Option<f64>,
    pub progresso: f64,
    pub observacoes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::projetos)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProject<'a> {
    pub cliente_id: i32,
    pub nome: &'a str,
    pub descricao: Option<&'a str>,
    pub tecnologias: String,
    pub status: &'a str,
    pub data_inicio: Option<NaiveDate>,
    pub data_alvo: Option<NaiveDate>,
    pub data_conclusao: Option<NaiveDate>,
    pub horas_estimadas: Option<f64>,
    pub horas_trabalhadas: f64,
    pub valor_estimado: Option<f64>,
    pub progresso: f64,
    pub observacoes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

fn encode_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}

impl TryFrom<Project> for DomainProject {
    type Error = TypeConstraintError;

    fn try_from(project: Project) -> Result<Self, Self::Error> {
        let tecnologias = serde_json::from_str(&project.tecnologias)
            .map_err(|e| TypeConstraintError::MalformedList(e.to_string()))?;
        Ok(Self {
            id: ProjectId::new(project.id)?,
            cliente_id: ClientId::new(project.cliente_id)?,
            nome: project.nome,
            descricao: project.descricao,
            tecnologias,
            status: project.status.parse()?,
            data_inicio: project.data_inicio,
            data_alvo: project.data_alvo,
            data_conclusao: project.data_conclusao,
            horas_estimadas: project.horas_estimadas,
            horas_trabalhadas: project.horas_trabalhadas,
            valor_estimado: project.valor_estimado,
            progresso: project.progresso,
            observacoes: project.observacoes,
            created_at: project.created_at,
            updated_at: project.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewProject> for NewProject<'a> {
    fn from(project: &'a DomainNewProject) -> Self {
        Self {
            cliente_id: project.cliente_id.get(),
            nome: project.nome.as_str(),
            descricao: project.descricao.as_deref(),
            tecnologias: encode_list(&project.tecnologias),
            status: project.status.as_str(),
            data_inicio: project.data_inicio,
            data_alvo: project.data_alvo,
            data_conclusao: project.data_conclusao,
            horas_estimadas: project.horas_estimadas,
            horas_trabalhadas: project.horas_trabalhadas,
            valor_estimado: project.valor_estimado,
            progresso: project.progresso,
            observacoes: project.observacoes.as_deref(),
        }
    }
}

impl<'a> UpdateProject<'a> {
    pub fn new(project: &'a DomainNewProject, updated_at: NaiveDateTime) -> Self {
        Self {
            cliente_id: project.cliente_id.get(),
            nome: project.nome.as_str(),
            descricao: project.descricao.as_deref(),
            tecnologias: encode_list(&project.tecnologias),
            status: project.status.as_str(),
            data_inicio: project.data_inicio,
            data_alvo: project.data_alvo,
            data_conclusao: project.data_conclusao,
            horas_estimadas: project.horas_estimadas,
            horas_trabalhadas: project.horas_trabalhadas,
            valor_estimado: project.valor_estimado,
            progresso: project.progresso,
            observacoes: project.observacoes.as_deref(),
            updated_at,
        }
    }
}
