use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::meeting::{Meeting as DomainMeeting, NewMeeting as DomainNewMeeting};
use crate::domain::types::{MeetingId, ProjectId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reunioes)]
pub struct Meeting {
    pub id: i32,
    pub projeto_id: i32,
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_reuniao: NaiveDate,
    pub hora_inicio: String,
    pub hora_fim: Option<String>,
    pub local: Option<String>,
    pub tipo: String,
    pub link_reuniao: Option<String>,
    pub participantes: Option<String>,
    pub ata: Option<String>,
    pub status: String,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reunioes)]
pub struct NewMeeting<'a> {
    pub projeto_id: i32,
    pub titulo: &'a str,
    pub descricao: Option<&'a str>,
    pub data_reuniao: NaiveDate,
    pub hora_inicio: &'a str,
    pub hora_fim: Option<&'a str>,
    pub local: Option<&'a str>,
    pub tipo: &'a str,
    pub link_reuniao: Option<&'a str>,
    pub participantes: Option<&'a str>,
    pub ata: Option<&'a str>,
    pub status: &'a str,
    pub observacoes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::reunioes)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateMeeting<'a> {
    pub projeto_id: i32,
    pub titulo: &'a str,
    pub descricao: Option<&'a str>,
    pub data_reuniao: NaiveDate,
    pub hora_inicio: &'a str,
    pub hora_fim: Option<&'a str>,
    pub local: Option<&'a str>,
    pub tipo: &'a str,
    pub link_reuniao: Option<&'a str>,
    pub participantes: Option<&'a str>,
    pub ata: Option<&'a str>,
    pub status: &'a str,
    pub observacoes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Meeting> for DomainMeeting {
    type Error = TypeConstraintError;

    fn try_from(meeting: Meeting) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MeetingId::new(meeting.id)?,
            projeto_id: ProjectId::new(meeting.projeto_id)?,
            titulo: meeting.titulo,
            descricao: meeting.descricao,
            data_reuniao: meeting.data_reuniao,
            hora_inicio: meeting.hora_inicio,
            hora_fim: meeting.hora_fim,
            local: meeting.local,
            tipo: meeting.tipo.parse()?,
            link_reuniao: meeting.link_reuniao,
            participantes: meeting.participantes,
            ata: meeting.ata,
            status: meeting.status.parse()?,
            observacoes: meeting.observacoes,
            created_at: meeting.created_at,
            updated_at: meeting.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewMeeting> for NewMeeting<'a> {
    fn from(meeting: &'a DomainNewMeeting) -> Self {
        Self {
            projeto_id: meeting.projeto_id.get(),
            titulo: meeting.titulo.as_str(),
            descricao: meeting.descricao.as_deref(),
            data_reuniao: meeting.data_reuniao,
            hora_inicio: meeting.hora_inicio.as_str(),
            hora_fim: meeting.hora_fim.as_deref(),
            local: meeting.local.as_deref(),
            tipo: meeting.tipo.as_str(),
            link_reuniao: meeting.link_reuniao.as_deref(),
            participantes: meeting.participantes.as_deref(),
            ata: meeting.ata.as_deref(),
            status: meeting.status.as_str(),
            observacoes: meeting.observacoes.as_deref(),
        }
    }
}

impl<'a> UpdateMeeting<'a> {
    pub fn new(meeting: &'a DomainNewMeeting, updated_at: NaiveDateTime) -> Self {
        let row = NewMeeting::from(meeting);
        Self {
            projeto_id: row.projeto_id,
            titulo: row.titulo,
            descricao: row.descricao,
            data_reuniao: row.data_reuniao,
            hora_inicio: row.hora_inicio,
            hora_fim: row.hora_fim,
            local: row.local,
            tipo: row.tipo,
            link_reuniao: row.link_reuniao,
            participantes: row.participantes,
            ata: row.ata,
            status: row.status,
            observacoes: row.observacoes,
            updated_at,
        }
    }
}
