//! vigil-export
//!
//! Plain-text reports from a finished evaluation, and the helper-text
//! lookup audit. Nothing here recomputes a score.

pub mod error;
pub mod lookup;
pub mod render;
