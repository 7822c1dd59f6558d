use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::contract::ContractSummary;
use crate::domain::types::{ContractId, EntryKind, EntryStatus, FinancialEntryId, PaymentMethod};

/// Incoming or outgoing movement tied to a contract, usually one installment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FinancialEntry {
    pub id: FinancialEntryId,
    pub contrato_id: ContractId,
    pub tipo_movimento: EntryKind,
    pub descricao: String,
    pub valor: f64,
    pub forma_pagamento: Option<PaymentMethod>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    pub status: EntryStatus,
    pub numero_parcela: Option<i32>,
    pub observacoes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FinancialEntry {
    /// Days from `today` until the due date; negative once overdue.
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.data_vencimento
            .map(|due| due.signed_duration_since(today).num_days())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewFinancialEntry {
    pub contrato_id: ContractId,
    pub tipo_movimento: EntryKind,
    pub descricao: String,
    pub valor: f64,
    pub forma_pagamento: Option<PaymentMethod>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    pub status: EntryStatus,
    pub numero_parcela: Option<i32>,
    pub observacoes: Option<String>,
}

/// Settlement of an entry.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Payment {
    pub data_pagamento: NaiveDate,
    pub forma_pagamento: Option<PaymentMethod>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FinancialListing {
    #[serde(flatten)]
    pub entry: FinancialEntry,
    pub contratos: Option<ContractSummary>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn entry(due: Option<NaiveDate>) -> FinancialEntry {
        let now = Utc::now().naive_utc();
        FinancialEntry {
            id: FinancialEntryId::new(1).unwrap(),
            contrato_id: ContractId::new(1).unwrap(),
            tipo_movimento: EntryKind::Income,
            descricao: "Parcela 1".to_string(),
            valor: 100.0,
            forma_pagamento: None,
            data_vencimento: due,
            data_pagamento: None,
            status: EntryStatus::Open,
            numero_parcela: Some(1),
            observacoes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn days_until_due_is_signed() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let ahead = entry(NaiveDate::from_ymd_opt(2025, 3, 15));
        let behind = entry(NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(ahead.days_until_due(today), Some(5));
        assert_eq!(behind.days_until_due(today), Some(-9));
        assert_eq!(entry(None).days_until_due(today), None);
    }
}
