//! Other Work template (single amount, no line items)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::models::{OtherWorkDetails, RequestDetails, TemplateType};
use shared::money::DEFAULT_CURRENCY;

use super::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, ValidationErrors};
use super::{FormTemplate, amount_text, line_amount, today};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OtherWorkForm {
    pub vendor_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub work_category: String,
    pub client_project_type: String,
    pub description: String,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
    pub currency: String,
    pub note: String,
    /// Invoice to upload on submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for OtherWorkForm {
    fn default() -> Self {
        Self {
            vendor_name: String::new(),
            invoice_number: String::new(),
            invoice_date: today(),
            work_category: String::new(),
            client_project_type: String::new(),
            description: String::new(),
            amount: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            note: String::new(),
            file: None,
        }
    }
}

impl FormTemplate for OtherWorkForm {
    fn template(&self) -> TemplateType {
        TemplateType::OtherWork
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn note(&self) -> &str {
        &self.note
    }

    fn amounts(&self) -> Vec<&str> {
        vec![self.amount.as_str()]
    }

    fn attachment(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    fn set_attachment(&mut self, path: Option<PathBuf>) {
        self.file = path;
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require_text("vendorName", "Vendor name", &self.vendor_name, MAX_NAME_LEN);
        errors.require_text(
            "invoiceNumber",
            "Invoice number",
            &self.invoice_number,
            MAX_SHORT_TEXT_LEN,
        );
        errors.require_date("invoiceDate", "Invoice date", &self.invoice_date);
        errors.require_text(
            "workCategory",
            "Work category",
            &self.work_category,
            MAX_SHORT_TEXT_LEN,
        );
        errors.optional_text(
            "clientProjectType",
            "Client/project",
            &self.client_project_type,
            MAX_NAME_LEN,
        );
        errors.require_text("description", "Description", &self.description, MAX_NOTE_LEN);
        errors.require_currency("currency", &self.currency);
        errors.require_amount("amount", "Amount", &self.amount);
        errors.optional_text("note", "Note", &self.note, MAX_NOTE_LEN);
        errors.optional_attachment("file", self.file.as_deref());
        errors.into_result()
    }

    fn item_count(&self) -> usize {
        1
    }

    fn add_item(&mut self) {}

    fn remove_item(&mut self, _index: usize) -> bool {
        false
    }

    fn to_details(&self) -> RequestDetails {
        RequestDetails::OtherWork(OtherWorkDetails {
            vendor_name: self.vendor_name.trim().to_string(),
            invoice_number: self.invoice_number.trim().to_string(),
            invoice_date: self.invoice_date.trim().to_string(),
            work_category: self.work_category.trim().to_string(),
            client_project_type: self.client_project_type.trim().to_string(),
            description: self.description.trim().to_string(),
            amount: line_amount(&self.amount),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_single_amount_total() {
        let mut form = OtherWorkForm::default();
        assert_eq!(form.total(), Decimal::ZERO);
        form.amount = "1200.50".into();
        assert_eq!(form.total(), Decimal::new(120050, 2));
        form.add_item();
        assert_eq!(form.item_count(), 1);
    }

    #[test]
    fn test_required_fields() {
        let form = OtherWorkForm {
            amount: "0".into(),
            ..OtherWorkForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                "Vendor name is required",
                "Invoice number is required",
                "Work category is required",
                "Description is required",
                "Amount must be at least 1",
            ]
        );
    }
}
