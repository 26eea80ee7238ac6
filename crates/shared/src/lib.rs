//! Shared types, errors, and configuration for Painel.
//!
//! This crate provides common types used across all other crates:
//! - Session token claims and account payloads
//! - JWT issuing and validation
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;

pub use auth::{Claims, CompanyCode};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
