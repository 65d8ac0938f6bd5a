//! vigil-cli library root.
//!
//! Exposes the argument types, config handling and command bodies so that
//! integration tests can drive them without spawning the `vigil` binary.

pub mod cli;
pub mod commands;
pub mod config;
