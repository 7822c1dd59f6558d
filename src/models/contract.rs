use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::contract::{Contract as DomainContract, NewContract as DomainNewContract};
use crate::domain::types::{ClientId, ContractId, ProjectId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::contratos)]
pub struct Contract {
    pub id: i32,
    pub cliente_id: i32,
    pub projeto_id: Option<i32>,
    pub numero_contrato: i32,
    pub valor_orcado: Option<f64>,
    pub desconto: f64,
    pub valor_contrato: f64,
    pub data_assinatura: Option<NaiveDate>,
    pub qtd_parcelas: i32,
    pub arquivo_pdf_path: Option<String>,
    pub status: String,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::contratos)]
pub struct NewContract<'a> {
    pub cliente_id: i32,
    pub projeto_id: Option<i32>,
    pub numero_contrato: i32,
    pub valor_orcado: Option<f64>,
    pub desconto: f64,
    pub valor_contrato: f64,
    pub data_assinatura: Option<NaiveDate>,
    pub qtd_parcelas: i32,
    pub arquivo_pdf_path: Option<&'a str>,
    pub status: &'a str,
    pub observacoes: Option<&'a str>,
}

/// Update leaves `numero_contrato` untouched.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::contratos)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateContract<'a> {
    pub cliente_id: i32,
    pub projeto_id: Option<i32>,
    pub valor_orcado: Option<f64>,
    pub desconto: f64,
    pub valor_contrato: f64,
    pub data_assinatura: Option<NaiveDate>,
    pub qtd_parcelas: i32,
    pub arquivo_pdf_path: Option<&'a str>,
    pub status: &'a str,
    pub observacoes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Contract> for DomainContract {
    type Error = TypeConstraintError;

    fn try_from(contract: Contract) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ContractId::new(contract.id)?,
            cliente_id: ClientId::new(contract.cliente_id)?,
            projeto_id: contract.projeto_id.map(ProjectId::new).transpose()?,
            numero_contrato: contract.numero_contrato,
            valor_orcado: contract.valor_orcado,
            desconto: contract.desconto,
            valor_contrato: contract.valor_contrato,
            data_assinatura: contract.data_assinatura,
            qtd_parcelas: contract.qtd_parcelas,
            arquivo_pdf_path: contract.arquivo_pdf_path,
            status: contract.status.parse()?,
            observacoes: contract.observacoes,
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        })
    }
}

impl<'a> NewContract<'a> {
    pub fn new(contract: &'a DomainNewContract, numero_contrato: i32) -> Self {
        Self {
            cliente_id: contract.cliente_id.get(),
            projeto_id: contract.projeto_id.map(ProjectId::get),
            numero_contrato,
            valor_orcado: contract.valor_orcado,
            desconto: contract.desconto,
            valor_contrato: contract.valor_contrato,
            data_assinatura: contract.data_assinatura,
            qtd_parcelas: contract.qtd_parcelas,
            arquivo_pdf_path: contract.arquivo_pdf_path.as_deref(),
            status: contract.status.as_str(),
            observacoes: contract.observacoes.as_deref(),
        }
    }
}

impl<'a> UpdateContract<'a> {
    pub fn new(contract: &'a DomainNewContract, updated_at: NaiveDateTime) -> Self {
        Self {
            cliente_id: contract.cliente_id.get(),
            projeto_id: contract.projeto_id.map(ProjectId::get),
            valor_orcado: contract.valor_orcado,
            desconto: contract.desconto,
            valor_contrato: contract.valor_contrato,
            data_assinatura: contract.data_assinatura,
            qtd_parcelas: contract.qtd_parcelas,
            arquivo_pdf_path: contract.arquivo_pdf_path.as_deref(),
            status: contract.status.as_str(),
            observacoes: contract.observacoes.as_deref(),
            updated_at,
        }
    }
}
