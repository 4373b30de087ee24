//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits match the column widths of the HR schema; the store itself
//! does not enforce text lengths.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person names (first/last), department
pub const MAX_NAME_LEN: usize = 50;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 15;

/// Office locations, bank names, account holder names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Notes, reasons, remarks, free-text personal info
pub const MAX_NOTE_LEN: usize = 500;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Company code is always two letters (it heads the employee ID)
pub const COMPANY_CODE_LEN: usize = 2;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate the two-letter company code.
pub fn validate_company_code(value: &str) -> Result<(), AppError> {
    if value.len() != COMPANY_CODE_LEN || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::validation(
            "company_code must be exactly 2 letters",
        ));
    }
    Ok(())
}

/// Minimal email shape check: `local@domain` with a dot in the domain.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    if value.len() > MAX_EMAIL_LEN {
        return Err(AppError::validation("email is too long"));
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("john.doe@example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("john@").is_err());
        assert!(validate_email("john@localhost").is_err());
        assert!(validate_email("john@.com").is_err());
    }

    #[test]
    fn company_code_must_be_two_letters() {
        assert!(validate_company_code("AB").is_ok());
        assert!(validate_company_code("A").is_err());
        assert!(validate_company_code("ABC").is_err());
        assert!(validate_company_code("A1").is_err());
    }
}
