//! MailQuery Common - Shared error type and configuration
//!
//! This crate provides the error type, configuration and logging settings
//! shared across all MailQuery components.

pub mod config;
pub mod error;

pub use config::{Config, FieldFallback, FilterConfig, LoggingConfig, NotationKind};
pub use error::{Error, Result};
