//! JSON payloads accepted by the write endpoints.
//!
//! Each form carries its `validator` rules and converts into the matching
//! domain value once validated. Conversion trims text and turns blank
//! optional strings into `None`.

pub mod client;
pub mod contract;
pub mod financial;
pub mod meeting;
pub mod project;
pub mod schedule;
