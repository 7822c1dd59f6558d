use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::meeting::NewMeeting;
use crate::domain::types::{
    MeetingKind, MeetingStatus, ProjectId, optional_rich_text, optional_text,
};
use crate::validation::{clock_time, optional_url};

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating or replacing a meeting.
pub struct MeetingForm {
    pub projeto_id: ProjectId,
    #[validate(length(min = 3, max = 255))]
    pub titulo: String,
    pub descricao: Option<String>,
    pub data_reuniao: NaiveDate,
    #[validate(custom(function = "clock_time"))]
    pub hora_inicio: String,
    #[validate(custom(function = "clock_time"))]
    pub hora_fim: Option<String>,
    pub local: Option<String>,
    #[serde(default)]
    pub tipo: MeetingKind,
    #[validate(custom(function = "optional_url"))]
    pub link_reuniao: Option<String>,
    pub participantes: Option<String>,
    pub ata: Option<String>,
    #[serde(default)]
    pub status: MeetingStatus,
    pub observacoes: Option<String>,
}

/// Zero-pads the hour so stored times sort lexically.
fn pad_time(value: &str) -> String {
    let value = value.trim();
    if value.len() == 4 {
        format!("0{value}")
    } else {
        value.to_string()
    }
}

impl From<MeetingForm> for NewMeeting {
    fn from(form: MeetingForm) -> Self {
        Self {
            projeto_id: form.projeto_id,
            titulo: form.titulo.trim().to_string(),
            descricao: optional_rich_text(form.descricao),
            data_reuniao: form.data_reuniao,
            hora_inicio: pad_time(&form.hora_inicio),
            hora_fim: optional_text(form.hora_fim).map(|t| pad_time(&t)),
            local: optional_text(form.local),
            tipo: form.tipo,
            link_reuniao: optional_text(form.link_reuniao),
            participantes: optional_text(form.participantes),
            ata: optional_rich_text(form.ata),
            status: form.status,
            observacoes: optional_rich_text(form.observacoes),
        }
    }
}
