//! Certificate types and error definitions

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;
use crate::template::{FieldValue, TemplateField};

/// Certificate-specific error type
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Certificate not found: {0}")]
    NotFound(String),

    #[error("Invalid batch input: {0}")]
    Structural(String),
}

impl From<StoreError> for CertificateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CertificateNotFound(id) => CertificateError::NotFound(id),
            StoreError::TemplateNotFound(id) => CertificateError::TemplateNotFound(id),
        }
    }
}

/// Result type for certificate operations
pub type CertificateResult<T> = Result<T, CertificateError>;

/// An issued certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub email: String,
    pub name: String,
    pub course: String,
    pub completion_date: NaiveDate,
    pub template_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

impl Certificate {
    /// Create a certificate with a fresh identifier and creation timestamp
    pub fn new(
        email: String,
        name: String,
        course: String,
        template_id: String,
        completion_date: NaiveDate,
        data: &BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            course,
            completion_date,
            template_id,
            created_at: Utc::now(),
            data: data.clone(),
        }
    }

    /// Data mapping used for rendering: supplementary data overlaid with the
    /// standard fields, which win on key collision.
    ///
    /// A supplementary value takes the type of the descriptor with the same
    /// name; values without one, or that do not parse, stay strings.
    pub fn render_data(&self, fields: &[TemplateField]) -> HashMap<String, FieldValue> {
        let mut vars: HashMap<String, FieldValue> = self
            .data
            .iter()
            .map(|(key, raw)| {
                let value = fields
                    .iter()
                    .find(|field| &field.name == key)
                    .and_then(|field| FieldValue::parse_as(field.field_type, raw))
                    .unwrap_or_else(|| FieldValue::from(raw.as_str()));
                (key.clone(), value)
            })
            .collect();

        vars.insert("ID".to_string(), FieldValue::from(self.id.as_str()));
        vars.insert("Email".to_string(), FieldValue::from(self.email.as_str()));
        vars.insert("Name".to_string(), FieldValue::from(self.name.as_str()));
        vars.insert("Course".to_string(), FieldValue::from(self.course.as_str()));
        vars.insert(
            "CompletionDate".to_string(),
            FieldValue::Date(self.completion_date),
        );
        vars.insert(
            "CreatedAt".to_string(),
            FieldValue::String(self.created_at.format("%d/%m/%Y %H:%M:%S").to_string()),
        );
        vars.insert(
            "TemplateID".to_string(),
            FieldValue::from(self.template_id.as_str()),
        );

        vars
    }
}

/// Request to issue a single certificate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateRequest {
    pub email: String,
    pub name: String,
    pub course: String,
    /// ISO date, `YYYY-MM-DD`
    pub completion_date: String,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// A failed row in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRowError {
    /// Spreadsheet line number: the header is row 1, the first data row is 2
    pub row: usize,
    pub message: String,
}

impl fmt::Display for BatchRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

/// Outcome of a batch ingestion
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchRowError>,
    pub created_ids: Vec<String>,
}

impl BatchResult {
    pub(crate) fn record_success(&mut self, id: String) {
        self.success += 1;
        self.created_ids.push(id);
    }

    pub(crate) fn record_failure(&mut self, row: usize, message: String) {
        self.failed += 1;
        self.errors.push(BatchRowError { row, message });
    }
}
