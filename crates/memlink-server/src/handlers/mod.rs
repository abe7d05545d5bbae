//! Request handlers, grouped by concern.

pub mod health;
pub mod manifest;
pub mod memory;
