//! Multi-template payment request form
//!
//! A [`RequestForm`] holds at most one active [`TemplateForm`]. Field values
//! are kept as typed (amounts included) so an invalid form can still be
//! totalled, rendered to PDF and reported on field by field.

pub mod catalog;
mod link_building;
mod other_work;
mod salary;
mod tools;
pub mod validation;

pub use link_building::{LinkBuildingForm, LinkBuildingLine};
pub use other_work::OtherWorkForm;
pub use salary::{SalaryForm, SalaryLine};
pub use tools::{ToolLine, ToolsForm};
pub use validation::{FieldError, ValidationErrors};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use paydesk_client::{ClientError, HttpClient, OfflineClient, Origin};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use shared::models::{
    PaymentRequest, PaymentRequestCreate, RequestDetails, TemplateSetting, TemplateType,
    UploadedFile,
};
use shared::money;
use shared::{AppError, AppResult, ErrorCode};

use crate::core::Route;

/// Behaviour shared by the four templates
pub trait FormTemplate {
    fn template(&self) -> TemplateType;

    fn currency(&self) -> &str;

    fn note(&self) -> &str;

    /// Amount fields exactly as entered
    fn amounts(&self) -> Vec<&str>;

    /// Sum of the entered amounts; blank or non-numeric entries count as zero
    fn total(&self) -> Decimal {
        money::sum_amounts(self.amounts())
    }

    /// Invoice file picked for upload
    fn attachment(&self) -> Option<&Path>;

    fn set_attachment(&mut self, path: Option<PathBuf>);

    /// Every violation of the template's rules
    fn validate(&self) -> Result<(), ValidationErrors>;

    fn item_count(&self) -> usize;

    fn add_item(&mut self);

    /// No-op (returns false) for the last remaining item or a bad index
    fn remove_item(&mut self, index: usize) -> bool;

    /// Template fields in wire shape
    fn to_details(&self) -> RequestDetails;
}

/// Active template with its field state, tagged by `type` in JSON drafts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateForm {
    LinkBuilding(LinkBuildingForm),
    Salary(SalaryForm),
    Tools(ToolsForm),
    OtherWork(OtherWorkForm),
}

impl TemplateForm {
    /// Blank form for `template`
    pub fn new(template: TemplateType) -> Self {
        match template {
            TemplateType::LinkBuilding => Self::LinkBuilding(LinkBuildingForm::default()),
            TemplateType::Salary => Self::Salary(SalaryForm::default()),
            TemplateType::Tools => Self::Tools(ToolsForm::default()),
            TemplateType::OtherWork => Self::OtherWork(OtherWorkForm::default()),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn as_form(&self) -> &dyn FormTemplate {
        match self {
            Self::LinkBuilding(f) => f,
            Self::Salary(f) => f,
            Self::Tools(f) => f,
            Self::OtherWork(f) => f,
        }
    }

    pub fn as_form_mut(&mut self) -> &mut dyn FormTemplate {
        match self {
            Self::LinkBuilding(f) => f,
            Self::Salary(f) => f,
            Self::Tools(f) => f,
            Self::OtherWork(f) => f,
        }
    }

    pub fn template(&self) -> TemplateType {
        self.as_form().template()
    }

    /// Create payload for the current state (not validated, nothing uploaded)
    pub fn payload(&self) -> PaymentRequestCreate {
        let form = self.as_form();
        PaymentRequestCreate {
            total_amount: money::to_f64(form.total()),
            currency: form.currency().trim().to_string(),
            note: form.note().trim().to_string(),
            attachment: None,
            details: form.to_details(),
        }
    }
}

/// Successful submission
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub request: PaymentRequest,
    pub origin: Origin,
    pub next_route: Route,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Select a template first")]
    NoTemplate,

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Invoice file {} could not be read", .path.display())]
    AttachmentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invoice file {} is larger than 10 MB", .0.display())]
    AttachmentTooLarge(PathBuf),

    #[error("Submission failed, please try again")]
    Failed(#[source] ClientError),
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        let message = err.to_string();
        match err {
            SubmitError::NoTemplate => AppError::with_message(ErrorCode::RequiredField, message),
            SubmitError::Invalid(errors) => errors.into(),
            SubmitError::InFlight => AppError::with_message(ErrorCode::InvalidRequest, message),
            SubmitError::AttachmentUnreadable { source, .. } => {
                AppError::with_message(ErrorCode::FileUnreadable, message)
                    .with_detail("cause", source.to_string())
            }
            SubmitError::AttachmentTooLarge(_) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, message)
            }
            SubmitError::Failed(source) => AppError::with_message(ErrorCode::InternalError, message)
                .with_detail("cause", source.to_string()),
        }
    }
}

/// Clears the submitting flag when the submission ends, however it ends
struct SubmittingGuard<'a>(&'a AtomicBool);

impl<'a> SubmittingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Create-request screen state
#[derive(Debug)]
pub struct RequestForm {
    enabled: Vec<TemplateType>,
    form: Option<TemplateForm>,
    touched: BTreeSet<String>,
    submitting: AtomicBool,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            enabled: TemplateType::ALL.to_vec(),
            form: None,
            touched: BTreeSet::new(),
            submitting: AtomicBool::new(false),
        }
    }
}

impl RequestForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only templates enabled in system settings can be picked
    pub fn with_templates(settings: &[TemplateSetting]) -> Self {
        Self {
            enabled: settings.iter().filter(|s| s.enabled).map(|s| s.id).collect(),
            ..Self::default()
        }
    }

    /// Resume from a JSON draft (`{"type": "tools", ...}`)
    pub fn from_draft(json: &str) -> serde_json::Result<Self> {
        let form = TemplateForm::from_json(json)?;
        Ok(Self {
            form: Some(form),
            ..Self::default()
        })
    }

    pub fn available_templates(&self) -> &[TemplateType] {
        &self.enabled
    }

    /// Start a blank form; any previous field state is dropped
    pub fn select_template(&mut self, template: TemplateType) -> AppResult<()> {
        if !self.enabled.contains(&template) {
            return Err(AppError::with_message(
                ErrorCode::TemplateDisabled,
                format!("{} is disabled", template.title()),
            ));
        }
        self.form = Some(TemplateForm::new(template));
        self.touched.clear();
        tracing::debug!(template = %template, "Template selected");
        Ok(())
    }

    /// Back to template selection
    pub fn clear_template(&mut self) {
        self.form = None;
        self.touched.clear();
    }

    pub fn template(&self) -> Option<TemplateType> {
        self.form.as_ref().map(TemplateForm::template)
    }

    pub fn form(&self) -> Option<&TemplateForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TemplateForm> {
        self.form.as_mut()
    }

    pub fn add_item(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.as_form_mut().add_item();
        }
    }

    /// Pick (or drop) the invoice file; false without a template
    pub fn attach(&mut self, path: Option<PathBuf>) -> bool {
        match self.form.as_mut() {
            Some(form) => {
                form.as_form_mut().set_attachment(path);
                true
            }
            None => false,
        }
    }

    pub fn attachment(&self) -> Option<&Path> {
        self.form.as_ref().and_then(|form| form.as_form().attachment())
    }

    pub fn remove_item(&mut self, index: usize) -> bool {
        self.form
            .as_mut()
            .is_some_and(|form| form.as_form_mut().remove_item(index))
    }

    pub fn total(&self) -> Decimal {
        self.form
            .as_ref()
            .map_or(Decimal::ZERO, |form| form.as_form().total())
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match &self.form {
            Some(form) => form.as_form().validate(),
            None => {
                let mut errors = ValidationErrors::new();
                errors.push("type", SubmitError::NoTemplate.to_string());
                Err(errors)
            }
        }
    }

    /// Mark a field as visited so its inline error shows
    pub fn touch(&mut self, field: impl Into<String>) {
        self.touched.insert(field.into());
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// Inline message for a touched field
    pub fn inline_error(&self, field: &str) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        self.validate()
            .err()
            .and_then(|errors| errors.get(field).map(str::to_string))
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Validate, upload the invoice file if one is attached, then create the
    /// request.
    ///
    /// A second call while one is in flight is rejected with
    /// [`SubmitError::InFlight`].
    pub async fn submit<C: HttpClient>(
        &self,
        client: &OfflineClient<C>,
    ) -> Result<SubmitOutcome, SubmitError> {
        let form = self.form.as_ref().ok_or(SubmitError::NoTemplate)?;
        form.as_form().validate()?;

        let _guard = SubmittingGuard::acquire(&self.submitting).ok_or(SubmitError::InFlight)?;
        let mut payload = form.payload();
        if let Some(path) = form.as_form().attachment() {
            payload.attachment = Some(upload_attachment(client, path).await?);
        }
        match client.create_request(&payload).await {
            Ok(served) => {
                tracing::info!(
                    id = served.value.id,
                    template = %form.template(),
                    origin = ?served.origin,
                    "Payment request submitted"
                );
                Ok(SubmitOutcome {
                    request: served.value,
                    origin: served.origin,
                    next_route: Route::Requests,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, template = %form.template(), "Payment request submission failed");
                Err(SubmitError::Failed(e))
            }
        }
    }
}

async fn upload_attachment<C: HttpClient>(
    client: &OfflineClient<C>,
    path: &Path,
) -> Result<UploadedFile, SubmitError> {
    let unreadable = |source: std::io::Error| SubmitError::AttachmentUnreadable {
        path: path.to_path_buf(),
        source,
    };
    let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
    if size > validation::MAX_ATTACHMENT_BYTES {
        return Err(SubmitError::AttachmentTooLarge(path.to_path_buf()));
    }
    let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "invoice".to_string());

    match client.upload_file(&filename, bytes).await {
        Ok(served) => {
            tracing::info!(
                filename = %served.value.filename,
                size,
                origin = ?served.origin,
                "Invoice uploaded"
            );
            Ok(served.value)
        }
        Err(e) => {
            tracing::error!(error = %e, filename = %filename, "Invoice upload failed");
            Err(SubmitError::Failed(e))
        }
    }
}

// ── Helpers shared by the templates ─────────────────────────────────

/// Field path of a line item (`items[0].amount`)
pub(crate) fn item_field(index: usize, name: &str) -> String {
    format!("items[{index}].{name}")
}

/// Stored amount of an entered value (zero when unparsable)
pub(crate) fn line_amount(value: &str) -> f64 {
    money::to_f64(money::amount_or_zero(value))
}

pub(crate) fn remove_line<T>(items: &mut Vec<T>, index: usize) -> bool {
    if items.len() <= 1 || index >= items.len() {
        return false;
    }
    items.remove(index);
    true
}

/// Today's date (UTC) as `YYYY-MM-DD`
pub(crate) fn today() -> String {
    chrono::Utc::now()
        .date_naive()
        .format(validation::DATE_FORMAT)
        .to_string()
}

/// Drafts may carry amounts as JSON numbers or strings
pub(crate) fn amount_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => text,
        Some(Raw::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::settings::default_templates;

    const TOOLS_DRAFT: &str = r#"{
        "type": "tools",
        "currency": "USD",
        "items": [{
            "toolName": "SEMrush Pro",
            "toolCategory": "SEO Analytics",
            "paymentFrequency": "monthly",
            "amount": 229
        }]
    }"#;

    #[test]
    fn test_tools_draft_total_and_payload() {
        let form = RequestForm::from_draft(TOOLS_DRAFT).unwrap();
        assert_eq!(form.template(), Some(TemplateType::Tools));
        assert_eq!(money::format_decimal(form.total()), "229.00");
        assert!(form.validate().is_ok());

        let payload = form.form().unwrap().payload();
        assert_eq!(payload.total_amount, 229.0);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "tools");
        assert_eq!(json["totalAmount"], 229.0);
        assert_eq!(json["items"][0]["paymentFrequency"], "monthly");
    }

    #[test]
    fn test_switching_template_discards_state() {
        let mut form = RequestForm::new();
        form.select_template(TemplateType::LinkBuilding).unwrap();
        form.add_item();
        form.touch("vendorName");
        assert_eq!(form.form().unwrap().as_form().item_count(), 2);

        form.select_template(TemplateType::LinkBuilding).unwrap();
        assert_eq!(form.form().unwrap().as_form().item_count(), 1);
        assert!(!form.is_touched("vendorName"));

        form.clear_template();
        assert!(form.template().is_none());
        assert_eq!(form.total(), Decimal::ZERO);
        assert!(!form.remove_item(0));
    }

    #[test]
    fn test_inline_error_only_for_touched_fields() {
        let mut form = RequestForm::new();
        form.select_template(TemplateType::OtherWork).unwrap();
        assert_eq!(form.inline_error("vendorName"), None);

        form.touch("vendorName");
        assert_eq!(
            form.inline_error("vendorName").as_deref(),
            Some("Vendor name is required")
        );

        if let Some(TemplateForm::OtherWork(f)) = form.form_mut() {
            f.vendor_name = "Freelance Co".into();
        }
        assert_eq!(form.inline_error("vendorName"), None);
    }

    #[test]
    fn test_disabled_template_cannot_be_selected() {
        let mut settings = default_templates();
        settings[1].enabled = false;
        let mut form = RequestForm::with_templates(&settings);
        assert!(!form.available_templates().contains(&TemplateType::Salary));

        let err = form.select_template(TemplateType::Salary).unwrap_err();
        assert_eq!(err.code, ErrorCode::TemplateDisabled);
        assert!(form.select_template(TemplateType::Tools).is_ok());
    }

    #[test]
    fn test_no_template_fails_validation() {
        let form = RequestForm::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("type"), Some("Select a template first"));
    }

    #[test]
    fn test_draft_accepts_string_amounts() {
        let json = r#"{"type":"other_work","vendorName":"Acme","amount":"75.5"}"#;
        let TemplateForm::OtherWork(form) = TemplateForm::from_json(json).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(form.amount, "75.5");
        assert_eq!(form.currency, "USD");
    }

    #[test]
    fn test_oversized_amounts_fail_validation_and_total_clamps() {
        let max = "79228162514264337593543950335";
        let json = format!(
            r#"{{"type":"tools","items":[
                {{"toolName":"A","toolCategory":"SEO","paymentFrequency":"monthly","amount":"{max}"}},
                {{"toolName":"B","toolCategory":"SEO","paymentFrequency":"monthly","amount":"{max}"}}
            ]}}"#
        );
        let form = RequestForm::from_draft(&json).unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get("items[0].amount"),
            Some("Item 1 amount must not exceed 1000000000")
        );
        assert!(errors.has("items[1].amount"));

        assert_eq!(form.total(), Decimal::MAX);
        let payload = form.form().unwrap().payload();
        assert!(payload.total_amount > 7.9e28);
    }

    #[test]
    fn test_submitting_guard_resets() {
        let flag = AtomicBool::new(false);
        {
            let _guard = SubmittingGuard::acquire(&flag).unwrap();
            assert!(SubmittingGuard::acquire(&flag).is_none());
        }
        assert!(!flag.load(Ordering::Acquire));
    }
}
