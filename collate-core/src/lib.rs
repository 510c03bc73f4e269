//! Core types for collate
//!
//! This crate provides the foundational types, configuration and logging
//! used by the collate gateway.

pub mod bus;
pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
