//! Domain entities exposed by the service layer.

pub mod client;
pub mod contract;
pub mod dashboard;
pub mod financial;
pub mod meeting;
pub mod project;
pub mod schedule;
pub mod types;
