use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::financial::{
    FinancialEntry as DomainFinancialEntry, NewFinancialEntry as DomainNewFinancialEntry,
};
use crate::domain::types::{ContractId, FinancialEntryId, PaymentMethod, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::financeiro)]
pub struct FinancialEntry {
    pub id: i32,
    pub contrato_id: i32,
    pub tipo_movimento: String,
    pub descricao: String,
    pub valor: f64,
    pub forma_pagamento: Option<String>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    pub status: String,
    pub numero_parcela: Option<i32>,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::financeiro)]
pub struct NewFinancialEntry<'a> {
    pub contrato_id: i32,
    pub tipo_movimento: &'a str,
    pub descricao: &'a str,
    pub valor: f64,
    pub forma_pagamento: Option<&'a str>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    pub status: &'a str,
    pub numero_parcela: Option<i32>,
    pub observacoes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::financeiro)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateFinancialEntry<'a> {
    pub contrato_id: i32,
    pub tipo_movimento: &'a str,
    pub descricao: &'a str,
    pub valor: f64,
    pub forma_pagamento: Option<&'a str>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    pub status: &'a str,
    pub numero_parcela: Option<i32>,
    pub observacoes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// Columns touched when settling an entry. A missing payment method keeps
/// the stored one.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::financeiro)]
pub struct PayFinancialEntry<'a> {
    pub status: &'a str,
    pub data_pagamento: NaiveDate,
    pub forma_pagamento: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<FinancialEntry> for DomainFinancialEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: FinancialEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: FinancialEntryId::new(entry.id)?,
            contrato_id: ContractId::new(entry.contrato_id)?,
            tipo_movimento: entry.tipo_movimento.parse()?,
            descricao: entry.descricao,
            valor: entry.valor,
            forma_pagamento: entry
                .forma_pagamento
                .as_deref()
                .map(str::parse::<PaymentMethod>)
                .transpose()?,
            data_vencimento: entry.data_vencimento,
            data_pagamento: entry.data_pagamento,
            status: entry.status.parse()?,
            numero_parcela: entry.numero_parcela,
            observacoes: entry.observacoes,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewFinancialEntry> for NewFinancialEntry<'a> {
    fn from(entry: &'a DomainNewFinancialEntry) -> Self {
        Self {
            contrato_id: entry.contrato_id.get(),
            tipo_movimento: entry.tipo_movimento.as_str(),
            descricao: entry.descricao.as_str(),
            valor: entry.valor,
            forma_pagamento: entry.forma_pagamento.map(PaymentMethod::as_str),
            data_vencimento: entry.data_vencimento,
            data_pagamento: entry.data_pagamento,
            status: entry.status.as_str(),
            numero_parcela: entry.numero_parcela,
            observacoes: entry.observacoes.as_deref(),
        }
    }
}

impl<'a> UpdateFinancialEntry<'a> {
    pub fn new(entry: &'a DomainNewFinancialEntry, updated_at: NaiveDateTime) -> Self {
        let row = NewFinancialEntry::from(entry);
        Self {
            contrato_id: row.contrato_id,
            tipo_movimento: row.tipo_movimento,
            descricao: row.descricao,
            valor: row.valor,
            forma_pagamento: row.forma_pagamento,
            data_vencimento: row.data_vencimento,
            data_pagamento: row.data_pagamento,
            status: row.status,
            numero_parcela: row.numero_parcela,
            observacoes: row.observacoes,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{EntryKind, EntryStatus};

    fn db_entry(forma_pagamento: Option<&str>) -> FinancialEntry {
        let now = Utc::now().naive_utc();
        FinancialEntry {
            id: 9,
            contrato_id: 2,
            tipo_movimento: "entrada".to_string(),
            descricao: "Parcela 2/3".to_string(),
            valor: 1_500.0,
            forma_pagamento: forma_pagamento.map(str::to_string),
            data_vencimento: NaiveDate::from_ymd_opt(2025, 5, 10),
            data_pagamento: None,
            status: "em_aberto".to_string(),
            numero_parcela: Some(2),
            observacoes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn entry_into_domain() {
        let domain = DomainFinancialEntry::try_from(db_entry(Some("boleto"))).unwrap();
        assert_eq!(domain.tipo_movimento, EntryKind::Income);
        assert_eq!(domain.status, EntryStatus::Open);
        assert_eq!(domain.forma_pagamento, Some(PaymentMethod::Boleto));
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        assert!(DomainFinancialEntry::try_from(db_entry(Some("cheque"))).is_err());
        assert!(DomainFinancialEntry::try_from(db_entry(None)).is_ok());
    }
}
