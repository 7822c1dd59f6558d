//! Payload validation shared by every write endpoint.
//!
//! Forms derive [`validator::Validate`]; [`validate`] runs the rules and turns
//! the nested error map into the flat, human-readable list returned under
//! `details` in 400 responses.

use std::borrow::Cow;

use chrono::NaiveTime;
use validator::{Validate, ValidateEmail, ValidateUrl, ValidationError, ValidationErrors};

/// Key used by `validator` for struct-level (schema) errors.
const SCHEMA_KEY: &str = "__all__";

/// Runs the declared rules on `input`, handing it back untouched on success.
pub fn validate<T: Validate>(input: T) -> Result<T, Vec<String>> {
    match input.validate() {
        Ok(()) => Ok(input),
        Err(errors) => Err(messages(&errors)),
    }
}

/// Flattens `errors` into sorted `"field: message"` strings. Struct-level
/// errors carry their message alone.
pub fn messages(errors: &ValidationErrors) -> Vec<String> {
    let mut out: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            let field = field.to_string();
            list.iter().map(move |error| {
                let text = describe(error);
                if field == SCHEMA_KEY {
                    text
                } else {
                    format!("{field}: {text}")
                }
            })
        })
        .collect();
    out.sort();
    out
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    match error.code.as_ref() {
        "length" => "tamanho inválido".to_string(),
        "email" => "email inválido".to_string(),
        "url" => "URL inválida".to_string(),
        "range" => "valor fora do intervalo".to_string(),
        "required" => "campo obrigatório".to_string(),
        other => other.to_string(),
    }
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Accepts an empty string or a well-formed e-mail address.
pub fn optional_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(rule("email", "email inválido"))
    }
}

/// Accepts an empty string or an absolute URL.
pub fn optional_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_url() {
        Ok(())
    } else {
        Err(rule("url", "URL inválida"))
    }
}

/// Accepts a 24-hour `HH:MM` time; the leading hour digit is optional.
pub fn clock_time(value: &str) -> Result<(), ValidationError> {
    let well_formed = match value.trim().split_once(':') {
        Some((hour, minute)) => {
            (1..=2).contains(&hour.len())
                && minute.len() == 2
                && hour.chars().chain(minute.chars()).all(|c| c.is_ascii_digit())
                && NaiveTime::parse_from_str(&format!("{hour}:{minute}"), "%H:%M").is_ok()
        }
        None => false,
    };
    if well_formed {
        Ok(())
    } else {
        Err(rule("time", "horário deve estar no formato HH:MM"))
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    #[validate(schema(function = "start_before_end"))]
    struct Slot {
        #[validate(length(min = 1))]
        title: String,
        #[validate(custom(function = "clock_time"))]
        start: String,
        #[validate(custom(function = "clock_time"))]
        end: Option<String>,
        #[validate(custom(function = "optional_email"))]
        contact: Option<String>,
    }

    fn start_before_end(slot: &Slot) -> Result<(), ValidationError> {
        match &slot.end {
            Some(end) if end.as_str() < slot.start.as_str() => {
                Err(rule("order", "fim antes do início"))
            }
            _ => Ok(()),
        }
    }

    fn slot() -> Slot {
        Slot {
            title: "Kickoff".to_string(),
            start: "09:00".to_string(),
            end: Some("10:30".to_string()),
            contact: Some(String::new()),
        }
    }

    #[test]
    fn valid_input_is_returned() {
        let checked = validate(slot()).unwrap();
        assert_eq!(checked.title, "Kickoff");
    }

    #[test]
    fn field_errors_are_flattened_and_sorted() {
        let mut input = slot();
        input.title = String::new();
        input.start = "9h".to_string();
        input.contact = Some("nope".to_string());

        let details = validate(input).err().unwrap();
        assert_eq!(
            details,
            vec![
                "contact: email inválido".to_string(),
                "start: horário deve estar no formato HH:MM".to_string(),
                "title: tamanho inválido".to_string(),
            ]
        );
    }

    #[test]
    fn schema_errors_carry_only_their_message() {
        let mut input = slot();
        input.end = Some("08:00".to_string());
        let details = validate(input).err().unwrap();
        assert_eq!(details, vec!["fim antes do início".to_string()]);
    }

    #[test]
    fn clock_time_rejects_out_of_range_values() {
        assert!(clock_time("23:59").is_ok());
        assert!(clock_time("7:30").is_ok());
        assert!(clock_time("24:00").is_err());
        assert!(clock_time("07:5").is_err());
        assert!(clock_time("07:60").is_err());
        assert!(clock_time("").is_err());
    }

    #[test]
    fn optional_rules_accept_blank() {
        assert!(optional_email("  ").is_ok());
        assert!(optional_email("ana@example.com").is_ok());
        assert!(optional_url("").is_ok());
        assert!(optional_url("https://meet.example.com/abc").is_ok());
        assert!(optional_url("not a url").is_err());
    }
}
