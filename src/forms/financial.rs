use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::financial::{NewFinancialEntry, Payment};
use crate::domain::types::{ContractId, EntryKind, EntryStatus, PaymentMethod, optional_rich_text};

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating or replacing a financial entry.
pub struct FinancialEntryForm {
    pub contrato_id: ContractId,
    pub tipo_movimento: EntryKind,
    #[validate(length(min = 3, max = 255))]
    pub descricao: String,
    #[validate(range(exclusive_min = 0.0))]
    pub valor: f64,
    pub forma_pagamento: Option<PaymentMethod>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    #[serde(default)]
    pub status: EntryStatus,
    #[validate(range(min = 1))]
    pub numero_parcela: Option<i32>,
    pub observacoes: Option<String>,
}

impl From<FinancialEntryForm> for NewFinancialEntry {
    fn from(form: FinancialEntryForm) -> Self {
        Self {
            contrato_id: form.contrato_id,
            tipo_movimento: form.tipo_movimento,
            descricao: form.descricao.trim().to_string(),
            valor: form.valor,
            forma_pagamento: form.forma_pagamento,
            data_vencimento: form.data_vencimento,
            data_pagamento: form.data_pagamento,
            status: form.status,
            numero_parcela: form.numero_parcela,
            observacoes: optional_rich_text(form.observacoes),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
/// Body of the "mark as paid" request. Both fields are optional.
pub struct PaymentForm {
    pub data_pagamento: Option<NaiveDate>,
    pub forma_pagamento: Option<PaymentMethod>,
}

impl PaymentForm {
    /// Resolves the payment, dating it `today` unless a date was given.
    pub fn into_payment(self, today: NaiveDate) -> Payment {
        Payment {
            data_pagamento: self.data_pagamento.unwrap_or(today),
            forma_pagamento: self.forma_pagamento,
        }
    }
}
