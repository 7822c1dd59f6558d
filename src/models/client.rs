use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{Client as DomainClient, NewClient as DomainNewClient};
use crate::domain::types::{ClientId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clientes)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub tipo_pessoa: String,
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

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clientes)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub tipo_pessoa: &'a str,
    pub nome_empresa: Option<&'a str>,
    pub nome_completo: Option<&'a str>,
    pub representante_legal: Option<&'a str>,
    pub razao_social: Option<&'a str>,
    pub cpf: Option<&'a str>,
    pub cnpj: Option<&'a str>,
    pub cep: Option<&'a str>,
    pub numero: Option<&'a str>,
    pub endereco: Option<&'a str>,
    pub cidade: Option<&'a str>,
    pub uf: Option<&'a str>,
    pub telefone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub observacoes: Option<&'a str>,
    pub ativo: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clientes)]
#[diesel(treat_none_as_null = true)]
/// Full replacement of the editable columns of a [`Client`].
pub struct UpdateClient<'a> {
    pub tipo_pessoa: &'a str,
    pub nome_empresa: Option<&'a str>,
    pub nome_completo: Option<&'a str>,
    pub representante_legal: Option<&'a str>,
    pub razao_social: Option<&'a str>,
    pub cpf: Option<&'a str>,
    pub cnpj: Option<&'a str>,
    pub cep: Option<&'a str>,
    pub numero: Option<&'a str>,
    pub endereco: Option<&'a str>,
    pub cidade: Option<&'a str>,
    pub uf: Option<&'a str>,
    pub telefone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub observacoes: Option<&'a str>,
    pub ativo: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::new(client.id)?,
            tipo_pessoa: client.tipo_pessoa.parse()?,
            nome_empresa: client.nome_empresa,
            nome_completo: client.nome_completo,
            representante_legal: client.representante_legal,
            razao_social: client.razao_social,
            cpf: client.cpf,
            cnpj: client.cnpj,
            cep: client.cep,
            numero: client.numero,
            endereco: client.endereco,
            cidade: client.cidade,
            uf: client.uf,
            telefone: client.telefone,
            email: client.email,
            observacoes: client.observacoes,
            ativo: client.ativo,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            tipo_pessoa: client.tipo_pessoa.as_str(),
            nome_empresa: client.nome_empresa.as_deref(),
            nome_completo: client.nome_completo.as_deref(),
            representante_legal: client.representante_legal.as_deref(),
            razao_social: client.razao_social.as_deref(),
            cpf: client.cpf.as_deref(),
            cnpj: client.cnpj.as_deref(),
            cep: client.cep.as_deref(),
            numero: client.numero.as_deref(),
            endereco: client.endereco.as_deref(),
            cidade: client.cidade.as_deref(),
            uf: client.uf.as_deref(),
            telefone: client.telefone.as_deref(),
            email: client.email.as_deref(),
            observacoes: client.observacoes.as_deref(),
            ativo: client.ativo,
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn new(client: &'a DomainNewClient, updated_at: NaiveDateTime) -> Self {
        let row = NewClient::from(client);
        Self {
            tipo_pessoa: row.tipo_pessoa,
            nome_empresa: row.nome_empresa,
            nome_completo: row.nome_completo,
            representante_legal: row.representante_legal,
            razao_social: row.razao_social,
            cpf: row.cpf,
            cnpj: row.cnpj,
            cep: row.cep,
            numero: row.numero,
            endereco: row.endereco,
            cidade: row.cidade,
            uf: row.uf,
            telefone: row.telefone,
            email: row.email,
            observacoes: row.observacoes,
            ativo: row.ativo,
            updated_at,
        }
    }
}
