//! Form validation
//!
//! Every check appends to a [`ValidationErrors`] so a single pass reports all
//! violations. Field paths follow the JSON draft (`items[1].amount`).

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use shared::money::{self, CURRENCIES, MAX_LINE_AMOUNT, MIN_LINE_AMOUNT};
use shared::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Names: vendor, employee, tool, department, user
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Invoice numbers, categories, payment methods
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Postal addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Invoice file types accepted for upload
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "png", "jpg", "jpeg"];

/// Largest invoice file accepted for upload (10 MB)
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Date format of invoice and payslip dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violations found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Human-readable messages in discovery order
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// First message reported for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    // ── Checks ──────────────────────────────────────────────────────

    /// Non-blank and within `max_len`
    pub fn require_text(&mut self, field: &str, label: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        } else if value.chars().count() > max_len {
            self.push(field, format!("{label} is too long (max {max_len} characters)"));
        }
    }

    /// Blank is fine; otherwise within `max_len`
    pub fn optional_text(&mut self, field: &str, label: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.push(field, format!("{label} is too long (max {max_len} characters)"));
        }
    }

    /// `YYYY-MM-DD` calendar date
    pub fn require_date(&mut self, field: &str, label: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, format!("{label} is required"));
        } else if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
            self.push(field, format!("{label} must be a valid date (YYYY-MM-DD)"));
        }
    }

    pub fn require_currency(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "Currency is required");
        } else if !CURRENCIES.contains(&value) {
            self.push(
                field,
                format!("Currency must be one of {}", CURRENCIES.join(", ")),
            );
        }
    }

    /// Numeric and within `MIN_LINE_AMOUNT..=MAX_LINE_AMOUNT`
    pub fn require_amount(&mut self, field: &str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
            return;
        }
        match money::parse_amount(value) {
            None => self.push(field, format!("{label} must be a number")),
            Some(amount) if amount < MIN_LINE_AMOUNT => {
                self.push(field, format!("{label} must be at least {MIN_LINE_AMOUNT}"))
            }
            Some(amount) if amount > MAX_LINE_AMOUNT => {
                self.push(field, format!("{label} must not exceed {MAX_LINE_AMOUNT}"))
            }
            Some(_) => {}
        }
    }

    /// No file is fine; otherwise one of [`ATTACHMENT_EXTENSIONS`]
    pub fn optional_attachment(&mut self, field: &str, path: Option<&Path>) {
        let Some(path) = path else {
            return;
        };
        let accepted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ATTACHMENT_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            });
        if !accepted {
            self.push(
                field,
                format!(
                    "Invoice file must be one of: {}",
                    ATTACHMENT_EXTENSIONS.join(", ")
                ),
            );
        }
    }

    /// Something shaped like `local@domain.tld`
    pub fn require_email(&mut self, field: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, "Email is required");
        } else if value.len() > MAX_EMAIL_LEN || !looks_like_email(value) {
            self.push(field, "Email must be a valid address");
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s): ", self.errors.len())?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = serde_json::to_value(&errors.errors).unwrap_or_default();
        AppError::with_message(ErrorCode::ValidationFailed, errors.to_string())
            .with_detail("errors", fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_violation() {
        let mut errors = ValidationErrors::new();
        errors.require_text("vendorName", "Vendor name", "  ", MAX_NAME_LEN);
        errors.require_date("invoiceDate", "Invoice date", "2024-13-01");
        errors.require_currency("currency", "JPY");
        errors.require_amount("items[0].amount", "Item 1 amount", "0.5");
        errors.require_amount("items[1].amount", "Item 2 amount", "bad");

        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("vendorName"), Some("Vendor name is required"));
        assert_eq!(
            errors.get("invoiceDate"),
            Some("Invoice date must be a valid date (YYYY-MM-DD)")
        );
        assert_eq!(errors.get("items[0].amount"), Some("Item 1 amount must be at least 1"));
        assert_eq!(errors.get("items[1].amount"), Some("Item 2 amount must be a number"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_valid_values_pass() {
        let mut errors = ValidationErrors::new();
        errors.require_text("vendorName", "Vendor name", "LinkCorp", MAX_NAME_LEN);
        errors.require_date("invoiceDate", "Invoice date", "2024-01-15");
        errors.require_currency("currency", "EUR");
        errors.require_amount("amount", "Amount", "1");
        errors.require_email("email", "jane@example.com");
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_amount_upper_bound() {
        let mut errors = ValidationErrors::new();
        errors.require_amount("items[0].amount", "Item 1 amount", "1000000000");
        errors.require_amount("items[1].amount", "Item 2 amount", "1000000000.01");
        errors.require_amount("items[2].amount", "Item 3 amount", "79228162514264337593543950335");
        assert!(!errors.has("items[0].amount"));
        assert_eq!(
            errors.get("items[1].amount"),
            Some("Item 2 amount must not exceed 1000000000")
        );
        assert!(errors.has("items[2].amount"));
    }

    #[test]
    fn test_attachment_types() {
        let mut errors = ValidationErrors::new();
        errors.optional_attachment("file", None);
        errors.optional_attachment("file", Some(Path::new("scans/INV-1.PDF")));
        errors.optional_attachment("file", Some(Path::new("receipt.jpeg")));
        assert!(errors.is_empty());

        errors.optional_attachment("file", Some(Path::new("invoice.exe")));
        errors.optional_attachment("file", Some(Path::new("invoice")));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("file"),
            Some("Invoice file must be one of: pdf, doc, docx, png, jpg, jpeg")
        );
    }

    #[test]
    fn test_length_limit() {
        let mut errors = ValidationErrors::new();
        errors.require_text("note", "Note", &"x".repeat(MAX_NOTE_LEN + 1), MAX_NOTE_LEN);
        assert_eq!(errors.get("note"), Some("Note is too long (max 500 characters)"));
    }

    #[test]
    fn test_email_shape() {
        for bad in ["", "jane", "jane@", "@example.com", "jane@example", "ja ne@example.com"] {
            let mut errors = ValidationErrors::new();
            errors.require_email("email", bad);
            assert!(errors.has("email"), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_into_app_error() {
        let mut errors = ValidationErrors::new();
        errors.push("currency", "Currency is required");
        let err: AppError = errors.into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("Currency is required"));
        assert_eq!(err.details.unwrap()["errors"][0]["field"], "currency");
    }
}
