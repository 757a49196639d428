//! Link Building & Content template

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::models::{
    ClientProjectType, LinkBuildingDetails, LinkBuildingItem, RequestDetails, TemplateType,
};
use shared::money::DEFAULT_CURRENCY;

use super::catalog;
use super::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, ValidationErrors};
use super::{FormTemplate, amount_text, item_field, line_amount, remove_line, today};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkBuildingForm {
    pub vendor_name: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub currency: String,
    pub items: Vec<LinkBuildingLine>,
    pub note: String,
    /// Invoice to upload on submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LinkBuildingForm {
    fn default() -> Self {
        Self {
            vendor_name: String::new(),
            invoice_number: String::new(),
            invoice_date: today(),
            currency: DEFAULT_CURRENCY.to_string(),
            items: vec![LinkBuildingLine::default()],
            note: String::new(),
            file: None,
        }
    }
}

/// One billed line; the reference is a catalog client, a catalog project or free text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkBuildingLine {
    pub client_project_type: String,
    pub selected_client_project: String,
    pub custom_value: String,
    pub description: String,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
}

impl LinkBuildingLine {
    pub fn reference_type(&self) -> Option<ClientProjectType> {
        self.client_project_type.parse().ok()
    }

    /// Switching the reference type drops the previous selection
    pub fn set_reference_type(&mut self, kind: ClientProjectType) {
        self.client_project_type = kind.as_str().to_string();
        self.selected_client_project.clear();
        self.custom_value.clear();
    }

    /// Display name of the selected client/project, or the custom value
    pub fn reference(&self) -> Option<String> {
        let kind = self.reference_type()?;
        let resolved = match kind {
            ClientProjectType::Other => self.custom_value.trim().to_string(),
            _ => catalog::find_reference(kind, &self.selected_client_project)
                .map(|e| e.label.to_string())
                .unwrap_or_else(|| self.selected_client_project.trim().to_string()),
        };
        (!resolved.is_empty()).then_some(resolved)
    }

    fn validate(&self, index: usize, errors: &mut ValidationErrors) {
        let n = index + 1;
        let type_field = item_field(index, "clientProjectType");
        match self.reference_type() {
            None if self.client_project_type.trim().is_empty() => {
                errors.push(type_field, format!("Item {n} reference type is required"));
            }
            None => errors.push(type_field, format!("Item {n} reference type is invalid")),
            Some(ClientProjectType::Other) => errors.require_text(
                &item_field(index, "customValue"),
                &format!("Item {n} custom value"),
                &self.custom_value,
                MAX_NAME_LEN,
            ),
            Some(kind) => {
                let field = item_field(index, "selectedClientProject");
                let what = kind.as_str();
                if self.selected_client_project.trim().is_empty() {
                    errors.push(field, format!("Item {n} {what} is required"));
                } else if catalog::find_reference(kind, &self.selected_client_project).is_none() {
                    errors.push(field, format!("Item {n} {what} is unknown"));
                }
            }
        }
        errors.require_text(
            &item_field(index, "description"),
            &format!("Item {n} description"),
            &self.description,
            MAX_NOTE_LEN,
        );
        errors.require_amount(
            &item_field(index, "amount"),
            &format!("Item {n} amount"),
            &self.amount,
        );
    }
}

impl LinkBuildingForm {
    pub fn set_reference_type(&mut self, index: usize, kind: ClientProjectType) -> bool {
        match self.items.get_mut(index) {
            Some(line) => {
                line.set_reference_type(kind);
                true
            }
            None => false,
        }
    }
}

impl FormTemplate for LinkBuildingForm {
    fn template(&self) -> TemplateType {
        TemplateType::LinkBuilding
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn note(&self) -> &str {
        &self.note
    }

    fn amounts(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.amount.as_str()).collect()
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
        errors.require_currency("currency", &self.currency);
        if self.items.is_empty() {
            errors.push("items", "At least one line item is required");
        }
        for (index, line) in self.items.iter().enumerate() {
            line.validate(index, &mut errors);
        }
        errors.optional_text("note", "Note", &self.note, MAX_NOTE_LEN);
        errors.optional_attachment("file", self.file.as_deref());
        errors.into_result()
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn add_item(&mut self) {
        self.items.push(LinkBuildingLine::default());
    }

    fn remove_item(&mut self, index: usize) -> bool {
        remove_line(&mut self.items, index)
    }

    fn to_details(&self) -> RequestDetails {
        RequestDetails::LinkBuilding(LinkBuildingDetails {
            vendor_name: self.vendor_name.trim().to_string(),
            invoice_number: self.invoice_number.trim().to_string(),
            invoice_date: self.invoice_date.trim().to_string(),
            items: self
                .items
                .iter()
                .map(|line| LinkBuildingItem {
                    client_project_type: line.reference_type(),
                    client_project: line.reference(),
                    description: line.description.trim().to_string(),
                    amount: line_amount(&line.amount),
                })
                .collect(),
        })
    }
}
