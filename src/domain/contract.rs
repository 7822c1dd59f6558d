use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientSummary;
use crate::domain::project::ProjectSummary;
use crate::domain::types::{ClientId, ContractId, ContractStatus, ProjectId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    pub id: ContractId,
    pub cliente_id: ClientId,
    pub projeto_id: Option<ProjectId>,
    /// Sequential number assigned by the repository on insert.
    pub numero_contrato: i32,
    pub valor_orcado: Option<f64>,
    pub desconto: f64,
    pub valor_contrato: f64,
    pub data_assinatura: Option<NaiveDate>,
    pub qtd_parcelas: i32,
    pub arquivo_pdf_path: Option<String>,
    pub status: ContractStatus,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewContract {
    pub cliente_id: ClientId,
    pub projeto_id: Option<ProjectId>,
    pub valor_orcado: Option<f64>,
    pub desconto: f64,
    pub valor_contrato: f64,
    pub data_assinatura: Option<NaiveDate>,
    pub qtd_parcelas: i32,
    pub arquivo_pdf_path: Option<String>,
    pub status: ContractStatus,
    pub observacoes: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ContractListing {
    #[serde(flatten)]
    pub contract: Contract,
    pub clientes: Option<ClientSummary>,
    pub projetos: Option<ProjectSummary>,
}

/// Contract fields embedded in financial entries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct ContractSummary {
    pub numero_contrato: i32,
    pub valor_contrato: f64,
    pub projetos: Option<ProjectSummary>,
    pub clientes: Option<ClientSummary>,
}
