use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::client::NewClient;
use crate::domain::types::{PersonKind, optional_rich_text, optional_text};
use crate::validation::optional_email;

fn active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "required_by_person_kind", skip_on_field_errors = false))]
/// Payload for creating or replacing a client.
pub struct ClientForm {
    pub tipo_pessoa: PersonKind,
    #[validate(length(max = 255))]
    pub nome_empresa: Option<String>,
    #[validate(length(max = 255))]
    pub nome_completo: Option<String>,
    pub representante_legal: Option<String>,
    pub razao_social: Option<String>,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub cep: Option<String>,
    pub numero: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    /// Two-letter state code.
    #[validate(length(max = 2))]
    pub uf: Option<String>,
    pub telefone: Option<String>,
    #[validate(custom(function = "optional_email"))]
    pub email: Option<String>,
    pub observacoes: Option<String>,
    #[serde(default = "active")]
    pub ativo: bool,
}

fn missing(field: &'static str) -> ValidationError {
    ValidationError::new("required").with_message(Cow::Owned(format!("{field}: campo obrigatório")))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// `PF` clients need a full name and CPF, `PJ` clients a company name and CNPJ.
fn required_by_person_kind(form: &ClientForm) -> Result<(), ValidationError> {
    let (name, document) = match form.tipo_pessoa {
        PersonKind::Individual => (("nome_completo", &form.nome_completo), ("cpf", &form.cpf)),
        PersonKind::Company => (("nome_empresa", &form.nome_empresa), ("cnpj", &form.cnpj)),
    };
    if is_blank(name.1) {
        return Err(missing(name.0));
    }
    if is_blank(document.1) {
        return Err(missing(document.0));
    }
    Ok(())
}

impl From<ClientForm> for NewClient {
    fn from(form: ClientForm) -> Self {
        Self {
            tipo_pessoa: form.tipo_pessoa,
            nome_empresa: optional_text(form.nome_empresa),
            nome_completo: optional_text(form.nome_completo),
            representante_legal: optional_text(form.representante_legal),
            razao_social: optional_text(form.razao_social),
            cpf: optional_text(form.cpf),
            cnpj: optional_text(form.cnpj),
            cep: optional_text(form.cep),
            numero: optional_text(form.numero),
            endereco: optional_text(form.endereco),
            cidade: optional_text(form.cidade),
            uf: optional_text(form.uf).map(|uf| uf.to_uppercase()),
            telefone: optional_text(form.telefone),
            email: optional_text(form.email).map(|email| email.to_lowercase()),
            observacoes: optional_rich_text(form.observacoes),
            ativo: form.ativo,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validation::validate;

    fn form(value: serde_json::Value) -> ClientForm {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn company_requires_name_and_cnpj() {
        let details = validate(form(json!({"tipo_pessoa": "PJ", "cnpj": "1"})))
            .err()
            .unwrap();
        assert_eq!(details, vec!["nome_empresa: campo obrigatório".to_string()]);

        let details = validate(form(json!({"tipo_pessoa": "PJ", "nome_empresa": "ACME"})))
            .err()
            .unwrap();
        assert_eq!(details, vec!["cnpj: campo obrigatório".to_string()]);
    }

    #[test]
    fn individual_requires_full_name() {
        let payload = json!({"tipo_pessoa": "PF", "nome_completo": "  ", "cpf": "1"});
        let details = validate(form(payload)).err().unwrap();
        assert_eq!(details, vec!["nome_completo: campo obrigatório".to_string()]);
    }

    #[test]
    fn invalid_email_and_state_are_reported() {
        let details = validate(form(json!({
            "tipo_pessoa": "PF",
            "nome_completo": "Ana",
            "cpf": "123",
            "email": "ana-at-example",
            "uf": "PER"
        })))
        .err()
        .unwrap();
        assert_eq!(
            details,
            vec!["email: email inválido".to_string(), "uf: tamanho inválido".to_string()]
        );
    }

    #[test]
    fn unknown_person_kind_fails_deserialization() {
        assert!(serde_json::from_value::<ClientForm>(json!({"tipo_pessoa": "XX"})).is_err());
    }

    #[test]
    fn conversion_normalizes_text() {
        let checked = validate(form(json!({
            "tipo_pessoa": "PJ",
            "nome_empresa": " ACME ",
            "cnpj": "12345678000199",
            "email": " Contato@ACME.com ",
            "uf": "pe",
            "telefone": "",
            "observacoes": "<b>vip</b><script>x</script>"
        })))
        .unwrap();
        let client = NewClient::from(checked);
        assert_eq!(client.nome_empresa.as_deref(), Some("ACME"));
        assert_eq!(client.email.as_deref(), Some("contato@acme.com"));
        assert_eq!(client.uf.as_deref(), Some("PE"));
        assert_eq!(client.telefone, None);
        assert_eq!(client.observacoes.as_deref(), Some("<b>vip</b>"));
        assert!(client.ativo);
    }
}
