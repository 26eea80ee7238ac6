//! Authentication and account rules.
//!
//! - Password hashing and verification with Argon2id
//! - Constant-cost login verification
//! - Account invariants (company codes and cnpj for non-admin accounts)

mod account;
mod password;

pub use account::{
    AccountFields, AccountRuleError, normalize_email, validate_account, validate_password,
};
pub use password::{PasswordError, hash_password, verify_login, verify_password};
