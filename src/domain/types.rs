//! Strongly-typed value objects used by domain entities.
//!
//! Identifiers are positive integers and status-like columns are closed sets
//! of lowercase tokens. Wrapping them here means rows coming back from the
//! database and payloads coming in from clients go through the same checks.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Stored token is not part of the enumeration.
    #[error("invalid {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },
    /// Stored JSON list could not be decoded.
    #[error("malformed list: {0}")]
    MalformedList(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "i32", into = "i32")]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a client.");
id_newtype!(ProjectId, "Unique identifier for a project.");
id_newtype!(ContractId, "Unique identifier for a contract.");
id_newtype!(FinancialEntryId, "Unique identifier for a financial entry.");
id_newtype!(MeetingId, "Unique identifier for a meeting.");
id_newtype!(PhaseId, "Unique identifier for a schedule phase.");

/// Generates a closed enumeration stored as a lowercase token.
macro_rules! text_enum {
    (
        $name:ident, $kind:literal, $doc:expr, default = $default:ident,
        { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// Every token, in declaration order.
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            /// Token stored in the database and exchanged over the API.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($token => Ok($name::$variant),)+
                    other => Err(TypeConstraintError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

text_enum!(PersonKind, "tipo_pessoa", "Natural person or company.", default = Company, {
    Individual => "PF",
    Company => "PJ",
});

text_enum!(ProjectStatus, "status", "Commercial and delivery stage of a project.",
    default = NotStarted, {
    NotStarted => "nao_iniciado",
    Planning => "planejamento",
    Presented => "apresentado",
    QuoteDelivered => "orcamento_entregue",
    QuoteApproved => "orcamento_aprovado",
    ContractSigned => "contrato_assinado",
    InProgress => "em_andamento",
    Delivered => "entregue",
    WarrantySupport => "suporte_garantia",
    Finished => "concluido",
});

text_enum!(ContractStatus, "status", "Lifecycle of a contract.", default = Active, {
    Active => "ativo",
    Finished => "concluido",
    Cancelled => "cancelado",
});

text_enum!(EntryKind, "tipo_movimento", "Direction of a financial entry.", default = Income, {
    Income => "entrada",
    Expense => "saida",
});

text_enum!(PaymentMethod, "forma_pagamento", "How an entry was or will be paid.", default = Pix, {
    Pix => "pix",
    CreditCard => "cartao_credito",
    Boleto => "boleto",
    Cash => "dinheiro",
});

text_enum!(EntryStatus, "status", "Settlement state of a financial entry.", default = Open, {
    Open => "em_aberto",
    Paid => "pago",
    Overdue => "atrasado",
    Cancelled => "cancelado",
});

text_enum!(MeetingKind, "tipo", "Where a meeting takes place.", default = InPerson, {
    InPerson => "presencial",
    Online => "online",
    Hybrid => "hibrida",
});

text_enum!(MeetingStatus, "status", "Scheduling state of a meeting.", default = Scheduled, {
    Scheduled => "agendada",
    Held => "realizada",
    Cancelled => "cancelada",
    Postponed => "adiada",
});

text_enum!(PhaseStatus, "status", "Progress state of a schedule phase.", default = NotStarted, {
    NotStarted => "nao_iniciado",
    InProgress => "em_andamento",
    Finished => "concluido",
    Late => "atrasado",
    Cancelled => "cancelado",
});

impl PhaseStatus {
    /// Status implied by a completion percentage.
    pub fn for_progress(percent: i32) -> Self {
        match percent {
            100.. => PhaseStatus::Finished,
            1..=99 => PhaseStatus::InProgress,
            _ => PhaseStatus::NotStarted,
        }
    }

    /// Finished and cancelled phases can no longer run late.
    pub fn is_closed(self) -> bool {
        matches!(self, PhaseStatus::Finished | PhaseStatus::Cancelled)
    }
}

/// Trims a value and turns blank strings into `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Like [`optional_text`] but also strips HTML that is not on the sanitizer
/// allow-list, for free-form notes rendered by the front-end.
pub fn optional_rich_text(value: Option<String>) -> Option<String> {
    optional_text(value)
        .map(|s| ammonia::clean(&s).trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trims a required value, rejecting blank input.
pub fn required_text(value: impl Into<String>) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString)
    } else {
        Ok(trimmed)
    }
}
