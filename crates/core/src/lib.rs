//! Core business logic for Painel.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//! The ERP is reached only through the [`reports::ErpSource`] trait.
//!
//! # Modules
//!
//! - `auth` - Password hashing and account rules
//! - `tenancy` - Which company codes a request may query
//! - `period` - Year/month validation and date-range expansion
//! - `reports` - Metric catalog, query builder and aggregation

pub mod auth;
pub mod period;
pub mod reports;
pub mod tenancy;
