use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::project::ProjectSummary;
use crate::domain::types::{MeetingId, MeetingKind, MeetingStatus, ProjectId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Meeting {
    pub id: MeetingId,
    pub projeto_id: ProjectId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_reuniao: NaiveDate,
    /// `HH:MM`.
    pub hora_inicio: String,
    pub hora_fim: Option<String>,
    pub local: Option<String>,
    pub tipo: MeetingKind,
    pub link_reuniao: Option<String>,
    pub participantes: Option<String>,
    /// Minutes recorded after the meeting.
    pub ata: Option<String>,
    pub status: MeetingStatus,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewMeeting {
    pub projeto_id: ProjectId,
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_reuniao: NaiveDate,
    pub hora_inicio: String,
    pub hora_fim: Option<String>,
    pub local: Option<String>,
    pub tipo: MeetingKind,
    pub link_reuniao: Option<String>,
    pub participantes: Option<String>,
    pub ata: Option<String>,
    pub status: MeetingStatus,
    pub observacoes: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MeetingListing {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub projetos: Option<ProjectSummary>,
}
