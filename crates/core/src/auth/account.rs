//! Account invariants enforced on create and update.

use thiserror::Error;

use painel_shared::CompanyCode;

/// Account rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountRuleError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email has no `@` or no domain.
    #[error("email is not a valid address")]
    InvalidEmail,

    /// A regular account has no company code.
    #[error("non-admin accounts must have at least one codi_emp")]
    MissingCompanyCodes,

    /// A regular account has no corporate tax id.
    #[error("non-admin accounts must have a cnpj")]
    MissingCnpj,
}

/// The fields an account rule check looks at, after any partial update has
/// been merged in.
#[derive(Debug, Clone, Copy)]
pub struct AccountFields<'a> {
    /// Display name.
    pub nome: &'a str,
    /// Login email.
    pub email: &'a str,
    /// Corporate tax id.
    pub cnpj: Option<&'a str>,
    /// ERP company codes.
    pub codi_emp: &'a [CompanyCode],
    /// Administrator flag.
    pub is_admin: bool,
}

/// Lower-cases and trims an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks a new password is present.
///
/// # Errors
///
/// `AccountRuleError::MissingField("password")` for a blank password.
pub fn validate_password(password: &str) -> Result<(), AccountRuleError> {
    if password.trim().is_empty() {
        return Err(AccountRuleError::MissingField("password"));
    }
    Ok(())
}

/// Validates an account record.
///
/// # Errors
///
/// Returns the first rule the record breaks.
pub fn validate_account(fields: &AccountFields<'_>) -> Result<(), AccountRuleError> {
    if fields.nome.trim().is_empty() {
        return Err(AccountRuleError::MissingField("nome"));
    }
    let email = fields.email.trim();
    if email.is_empty() {
        return Err(AccountRuleError::MissingField("email"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(AccountRuleError::InvalidEmail),
    }

    if !fields.is_admin {
        if fields.codi_emp.is_empty() {
            return Err(AccountRuleError::MissingCompanyCodes);
        }
        if fields.cnpj.is_none_or(|c| c.trim().is_empty()) {
            return Err(AccountRuleError::MissingCnpj);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn company<'a>(codes: &'a [CompanyCode], cnpj: Option<&'a str>) -> AccountFields<'a> {
        AccountFields {
            nome: "Maria",
            email: "maria@acme.com.br",
            cnpj,
            codi_emp: codes,
            is_admin: false,
        }
    }

    #[test]
    fn test_valid_company_account() {
        assert_eq!(validate_account(&company(&[101], Some("12345678000199"))), Ok(()));
    }

    #[test]
    fn test_admin_needs_neither_codes_nor_cnpj() {
        let fields = AccountFields {
            is_admin: true,
            ..company(&[], None)
        };
        assert_eq!(validate_account(&fields), Ok(()));
    }

    #[rstest]
    #[case(&[], Some("1"), AccountRuleError::MissingCompanyCodes)]
    #[case(&[1], None, AccountRuleError::MissingCnpj)]
    #[case(&[1], Some("  "), AccountRuleError::MissingCnpj)]
    fn test_company_account_rules(
        #[case] codes: &[CompanyCode],
        #[case] cnpj: Option<&str>,
        #[case] expected: AccountRuleError,
    ) {
        assert_eq!(validate_account(&company(codes, cnpj)), Err(expected));
    }

    #[rstest]
    #[case("", AccountRuleError::MissingField("email"))]
    #[case("no-at-sign", AccountRuleError::InvalidEmail)]
    #[case("@acme.com", AccountRuleError::InvalidEmail)]
    #[case("maria@", AccountRuleError::InvalidEmail)]
    fn test_email_rules(#[case] email: &str, #[case] expected: AccountRuleError) {
        let fields = AccountFields {
            email,
            ..company(&[1], Some("1"))
        };
        assert_eq!(validate_account(&fields), Err(expected));
    }

    #[test]
    fn test_blank_name_and_password() {
        let fields = AccountFields {
            nome: " ",
            ..company(&[1], Some("1"))
        };
        assert_eq!(validate_account(&fields), Err(AccountRuleError::MissingField("nome")));
        assert_eq!(validate_password(""), Err(AccountRuleError::MissingField("password")));
        assert_eq!(validate_password("x"), Ok(()));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Maria@ACME.com "), "maria@acme.com");
    }
}
