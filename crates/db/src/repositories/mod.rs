//! Repository abstractions for data access.

pub mod user;

pub use user::{CreateUserInput, UpdateUserInput, UserError, UserFilter, UserRepository};
