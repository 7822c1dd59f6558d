//! JSON bodies shared by every endpoint.

use serde::Serialize;

use crate::pagination::{PageMeta, Paginated};

/// Successful read: `{ data, pagination? }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            pagination: None,
        }
    }
}

impl<T> From<Paginated<T>> for DataResponse<Vec<T>> {
    fn from(page: Paginated<T>) -> Self {
        Self {
            data: page.items,
            pagination: Some(page.meta),
        }
    }
}

/// Successful write: `{ message, data? }`.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T = ()> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> MessageResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl MessageResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Failure: `{ error, details? }`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}
