use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::contract::NewContract;
use crate::domain::types::{ClientId, ContractStatus, ProjectId, optional_rich_text, optional_text};

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating or replacing a contract. The contract number is
/// assigned by the server.
pub struct ContractForm {
    pub cliente_id: ClientId,
    pub projeto_id: Option<ProjectId>,
    #[validate(range(min = 0.0))]
    pub valor_orcado: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub desconto: f64,
    #[validate(range(min = 0.0))]
    pub valor_contrato: f64,
    pub data_assinatura: Option<NaiveDate>,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub qtd_parcelas: i32,
    pub arquivo_pdf_path: Option<String>,
    #[serde(default)]
    pub status: ContractStatus,
    pub observacoes: Option<String>,
}

impl From<ContractForm> for NewContract {
    fn from(form: ContractForm) -> Self {
        Self {
            cliente_id: form.cliente_id,
            projeto_id: form.projeto_id,
            valor_orcado: form.valor_orcado,
            desconto: form.desconto,
            valor_contrato: form.valor_contrato,
            data_assinatura: form.data_assinatura,
            qtd_parcelas: form.qtd_parcelas,
            arquivo_pdf_path: optional_text(form.arquivo_pdf_path),
            status: form.status,
            observacoes: optional_rich_text(form.observacoes),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::validate;

    #[test]
    fn defaults_and_conversion() {
        let form: ContractForm =
            serde_json::from_value(json!({"cliente_id": 2, "valor_contrato": 5000.0})).unwrap();
        let contract = NewContract::from(validate(form).unwrap());
        assert_eq!(contract.qtd_parcelas, 1);
        assert_eq!(contract.desconto, 0.0);
        assert_eq!(contract.status, ContractStatus::Active);
        assert_eq!(contract.projeto_id, None);
    }

    #[test]
    fn zero_installments_are_rejected() {
        let form: ContractForm = serde_json::from_value(json!({
            "cliente_id": 2,
            "valor_contrato": 5000.0,
            "qtd_parcelas": 0
        }))
        .unwrap();
        assert_eq!(
            validate(form).err().unwrap(),
            vec!["qtd_parcelas: valor fora do intervalo".to_string()]
        );
    }

    #[test]
    fn missing_contract_value_fails_deserialization() {
        assert!(serde_json::from_value::<ContractForm>(json!({"cliente_id": 2})).is_err());
    }
}
