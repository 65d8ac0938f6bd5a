//! vigil-core
//!
//! Pure domain types for the questionnaire engine: the authored schema,
//! the normalized response snapshot, and the result tree handed to the
//! presentation layer. No scoring logic lives here.

pub mod error;
pub mod models;
