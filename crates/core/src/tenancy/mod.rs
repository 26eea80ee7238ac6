//! Tenant scope resolution.
//!
//! Every report and directory lookup goes through [`resolve_scope`]: it is the
//! one place that decides which ERP company codes a request may aggregate over.
//!
//! Policy: administrators always name the companies explicitly. Their own
//! `codi_emp` list is advisory and never used as a fallback.

use serde::Serialize;
use thiserror::Error;

use painel_shared::{Claims, CompanyCode};

/// Errors raised while resolving the tenant scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// An administrator did not name any company.
    #[error("administrators must send a non-empty empresas list")]
    MissingCompanyList,

    /// A regular account has no company assigned.
    #[error("account has no ERP company assigned")]
    NoCompanyAssigned,
}

/// The company codes a request is authorized to aggregate over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TenantScope(Vec<CompanyCode>);

impl TenantScope {
    /// Returns the company codes.
    #[must_use]
    pub fn codes(&self) -> &[CompanyCode] {
        &self.0
    }

    /// Consumes the scope.
    #[must_use]
    pub fn into_codes(self) -> Vec<CompanyCode> {
        self.0
    }
}

/// Resolves the tenant scope for a request.
///
/// * Administrators: `requested` must be present and non-empty; it is
///   returned verbatim.
/// * Everyone else: the token's `codi_emp`, whatever the request says.
///
/// # Errors
///
/// `ScopeError::MissingCompanyList` for an administrator without a list,
/// `ScopeError::NoCompanyAssigned` for an account without codes.
pub fn resolve_scope(
    claims: &Claims,
    requested: Option<&[CompanyCode]>,
) -> Result<TenantScope, ScopeError> {
    if claims.is_admin {
        return match requested {
            Some(codes) if !codes.is_empty() => Ok(TenantScope(codes.to_vec())),
            _ => Err(ScopeError::MissingCompanyList),
        };
    }

    if claims.codi_emp.is_empty() {
        return Err(ScopeError::NoCompanyAssigned);
    }
    Ok(TenantScope(claims.codi_emp.clone()))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    use super::*;

    fn claims(is_admin: bool, codes: Vec<CompanyCode>) -> Claims {
        Claims::new(1, "x@y.com", is_admin, codes, Utc::now() + Duration::hours(1))
    }

    #[test]
    fn test_regular_account_uses_token_codes() {
        let scope = resolve_scope(&claims(false, vec![101]), None).unwrap();
        assert_eq!(scope.codes(), &[101]);
    }

    #[test]
    fn test_regular_account_ignores_requested_codes() {
        let scope = resolve_scope(&claims(false, vec![101]), Some(&[55, 77])).unwrap();
        assert_eq!(scope.into_codes(), vec![101]);
    }

    #[test]
    fn test_regular_account_without_codes_fails() {
        assert_eq!(
            resolve_scope(&claims(false, vec![]), Some(&[1])),
            Err(ScopeError::NoCompanyAssigned)
        );
    }

    #[test]
    fn test_admin_requires_list() {
        let admin = claims(true, vec![9]);
        assert_eq!(resolve_scope(&admin, None), Err(ScopeError::MissingCompanyList));
        assert_eq!(
            resolve_scope(&admin, Some(&[])),
            Err(ScopeError::MissingCompanyList)
        );
    }

    #[test]
    fn test_admin_list_is_returned_verbatim() {
        let scope = resolve_scope(&claims(true, vec![9]), Some(&[77, 55, 77])).unwrap();
        assert_eq!(scope.codes(), &[77, 55, 77]);
    }

    proptest! {
        #[test]
        fn prop_regular_scope_equals_token_codes(
            codes in proptest::collection::vec(1i32..10_000, 1..10),
            requested in proptest::option::of(proptest::collection::vec(1i32..10_000, 0..10)),
        ) {
            let scope = resolve_scope(&claims(false, codes.clone()), requested.as_deref()).unwrap();
            prop_assert_eq!(scope.into_codes(), codes);
        }

        #[test]
        fn prop_admin_scope_is_verbatim(
            own in proptest::collection::vec(1i32..10_000, 0..5),
            requested in proptest::collection::vec(1i32..10_000, 1..10),
        ) {
            let scope = resolve_scope(&claims(true, own), Some(&requested)).unwrap();
            prop_assert_eq!(scope.into_codes(), requested);
        }
    }
}
