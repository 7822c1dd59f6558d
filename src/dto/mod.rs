//! Response bodies shared by the HTTP handlers.

pub mod envelope;
