//! Diesel models and the server configuration model.

pub mod client;
pub mod config;
pub mod contract;
pub mod financial;
pub mod meeting;
pub mod project;
pub mod schedule;
