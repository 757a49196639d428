//! Tools & Software template

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::models::{PaymentFrequency, RequestDetails, TemplateType, ToolItem, ToolsDetails};
use shared::money::DEFAULT_CURRENCY;

use super::catalog;
use super::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, ValidationErrors};
use super::{FormTemplate, amount_text, item_field, line_amount, remove_line};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolsForm {
    pub currency: String,
    pub items: Vec<ToolLine>,
    pub note: String,
    /// Invoice to upload on submit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for ToolsForm {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            items: vec![ToolLine::default()],
            note: String::new(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolLine {
    pub tool_name: String,
    pub tool_category: String,
    pub payment_frequency: String,
    pub description: String,
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
}

impl ToolLine {
    pub fn frequency(&self) -> Option<PaymentFrequency> {
        catalog::parse_frequency(self.payment_frequency.trim())
    }
}

impl FormTemplate for ToolsForm {
    fn template(&self) -> TemplateType {
        TemplateType::Tools
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
        errors.require_currency("currency", &self.currency);
        if self.items.is_empty() {
            errors.push("items", "At least one line item is required");
        }
        for (index, line) in self.items.iter().enumerate() {
            let n = index + 1;
            errors.require_text(
                &item_field(index, "toolName"),
                &format!("Item {n} tool name"),
                &line.tool_name,
                MAX_NAME_LEN,
            );
            errors.require_text(
                &item_field(index, "toolCategory"),
                &format!("Item {n} category"),
                &line.tool_category,
                MAX_SHORT_TEXT_LEN,
            );
            let field = item_field(index, "paymentFrequency");
            if line.payment_frequency.trim().is_empty() {
                errors.push(field, format!("Item {n} payment frequency is required"));
            } else if line.frequency().is_none() {
                errors.push(
                    field,
                    format!("Item {n} payment frequency must be monthly, annually or one-time"),
                );
            }
            errors.optional_text(
                &item_field(index, "description"),
                &format!("Item {n} description"),
                &line.description,
                MAX_NOTE_LEN,
            );
            errors.require_amount(
                &item_field(index, "amount"),
                &format!("Item {n} amount"),
                &line.amount,
            );
        }
        errors.optional_text("note", "Note", &self.note, MAX_NOTE_LEN);
        errors.optional_attachment("file", self.file.as_deref());
        errors.into_result()
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn add_item(&mut self) {
        self.items.push(ToolLine::default());
    }

    fn remove_item(&mut self, index: usize) -> bool {
        remove_line(&mut self.items, index)
    }

    fn to_details(&self) -> RequestDetails {
        RequestDetails::Tools(ToolsDetails {
            items: self
                .items
                .iter()
                .map(|line| ToolItem {
                    tool_name: line.tool_name.trim().to_string(),
                    tool_category: line.tool_category.trim().to_string(),
                    // validated forms always carry a frequency
                    payment_frequency: line.frequency().unwrap_or(PaymentFrequency::OneTime),
                    description: line.description.trim().to_string(),
                    amount: line_amount(&line.amount),
                })
                .collect(),
        })
    }
}
