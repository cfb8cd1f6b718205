//! Shared types, errors, and configuration for Estate Ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - The audit actor (user or system)
//! - Pagination types for list queries
//! - Application-wide error types
//! - Configuration management and tracing bootstrap

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
