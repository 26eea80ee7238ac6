//! Authentication types for session tokens and account payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ERP company code (`codi_emp`), the unit of tenant scoping.
pub type CompanyCode = i32;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: i32,
    /// Account email.
    pub email: String,
    /// Whether the account is an administrator.
    pub is_admin: bool,
    /// ERP company codes assigned to the account.
    pub codi_emp: Vec<CompanyCode>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(
        account_id: i32,
        email: &str,
        is_admin: bool,
        codi_emp: Vec<CompanyCode>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            email: email.to_string(),
            is_admin,
            codi_emp,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> i32 {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    #[serde(default)]
    pub email: String,
    /// Account password.
    #[serde(default, alias = "senha")]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated account info.
    pub user: AccountInfo,
    /// Session token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: &'static str,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// Account info returned to clients (never carries the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account ID.
    pub id: i32,
    /// Display name.
    pub nome: String,
    /// Company display name.
    pub nome_empresa: String,
    /// Personal tax id.
    pub cpf: String,
    /// Corporate tax id.
    pub cnpj: Option<String>,
    /// ERP company codes.
    pub codi_emp: Vec<CompanyCode>,
    /// Contact number.
    pub celular: String,
    /// Email.
    pub email: String,
    /// Administrator flag.
    pub is_admin: bool,
}

/// Account creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub nome: String,
    /// Company display name.
    pub nome_empresa: String,
    /// Personal tax id.
    pub cpf: String,
    /// Corporate tax id (required unless admin).
    pub cnpj: Option<String>,
    /// ERP company codes.
    #[serde(default)]
    pub codi_emp: Vec<CompanyCode>,
    /// Contact number.
    #[serde(default)]
    pub celular: String,
    /// Email.
    pub email: String,
    /// Plaintext password, hashed before storage.
    #[serde(alias = "senha")]
    pub password: String,
    /// Administrator flag.
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial account update request. The account ID cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// Display name.
    pub nome: Option<String>,
    /// Company display name.
    pub nome_empresa: Option<String>,
    /// Personal tax id.
    pub cpf: Option<String>,
    /// Corporate tax id (`null` clears it, allowed for admins only).
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub cnpj: Option<Option<String>>,
    /// ERP company codes.
    pub codi_emp: Option<Vec<CompanyCode>>,
    /// Contact number.
    pub celular: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// New plaintext password.
    #[serde(alias = "senha")]
    pub password: Option<String>,
    /// Administrator flag.
    pub is_admin: Option<bool>,
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod auth_tests;
