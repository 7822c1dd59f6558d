use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, PersonKind};

/// A customer, either a natural person (`PF`) or a company (`PJ`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub tipo_pessoa: PersonKind,
    pub nome_empresa: Option<String>,
    pub nome_completo: Option<String>,
    pub representante_legal: Option<String>,
    pub razao_social: Option<String>,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub cep: Option<String>,
    pub numero: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Company name for `PJ` clients, full name otherwise.
    pub fn display_name(&self) -> Option<&str> {
        self.nome_empresa
            .as_deref()
            .or(self.nome_completo.as_deref())
    }
}

/// Editable client fields. Used for inserts and for full updates.
#[derive(Clone, Debug, Deserialize, PartialEq, Default)]
pub struct NewClient {
    pub tipo_pessoa: PersonKind,
    pub nome_empresa: Option<String>,
    pub nome_completo: Option<String>,
    pub representante_legal: Option<String>,
    pub razao_social: Option<String>,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub cep: Option<String>,
    pub numero: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub uf: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub observacoes: Option<String>,
    pub ativo: bool,
}

/// Client fields embedded in child rows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ClientSummary {
    pub nome_empresa: Option<String>,
    pub nome_completo: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            nome_empresa: client.nome_empresa.clone(),
            nome_completo: client.nome_completo.clone(),
            email: client.email.clone(),
            telefone: client.telefone.clone(),
        }
    }
}
