//! Template types and error definitions

use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::{self, RenderError};

/// Identifier of the seed template that always exists
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// Format used for template creation / update timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template is protected and cannot be deleted: {0}")]
    Protected(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Declared type of a template field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        };
        f.write_str(name)
    }
}

/// A typed value substituted into a template.
///
/// The variant always comes from a declared [`FieldType`], never from the
/// shape of the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Number(f64),
    Date(NaiveDate),
    String(String),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Boolean(_) => FieldType::Boolean,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::String(_) => FieldType::String,
        }
    }

    /// Interpret raw text according to a declared field type
    pub fn parse_as(field_type: FieldType, raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match field_type {
            FieldType::String => Some(FieldValue::String(raw.to_string())),
            FieldType::Number => raw.parse::<f64>().ok().map(FieldValue::Number),
            FieldType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(FieldValue::Boolean(true)),
                "false" | "no" | "0" => Some(FieldValue::Boolean(false)),
                _ => None,
            },
            FieldType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(FieldValue::Date),
        }
    }

    /// Interpret a JSON scalar according to a declared field type
    pub fn from_json(field_type: FieldType, value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match (field_type, value) {
            (FieldType::Number, Value::Number(n)) => n.as_f64().map(FieldValue::Number),
            (FieldType::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
            (FieldType::String, Value::Number(n)) => Some(FieldValue::String(n.to_string())),
            (FieldType::String, Value::Bool(b)) => Some(FieldValue::String(b.to_string())),
            (_, Value::String(s)) => FieldValue::parse_as(field_type, s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format("%d/%m/%Y")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

/// Descriptor of a field a template expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTemplateField")]
pub struct TemplateField {
    pub name: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Wire form of [`TemplateField`]; the default stays untyped until the
/// declared type is known
#[derive(Deserialize)]
struct RawTemplateField {
    name: String,
    #[serde(rename = "type", default)]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawTemplateField> for TemplateField {
    type Error = String;

    fn try_from(raw: RawTemplateField) -> Result<Self, Self::Error> {
        let default = match raw.default {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(FieldValue::from_json(raw.field_type, &value).ok_or_else(|| {
                format!(
                    "default for field '{}' is not a valid {}: {}",
                    raw.name, raw.field_type, value
                )
            })?),
        };

        Ok(TemplateField {
            name: raw.name,
            field_type: raw.field_type,
            required: raw.required,
            default,
            description: raw.description,
        })
    }
}

impl TemplateField {
    pub fn new(name: &str, field_type: FieldType, required: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            required,
            default: None,
            description: Some(description.to_string()),
        }
    }
}

/// A renderable certificate template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Template text with {{placeholder}} substitution points
    #[serde(rename = "html_template")]
    pub body: String,

    /// Fields the template expects, in declaration order
    #[serde(default)]
    pub fields: Vec<TemplateField>,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Template {
    /// Validate identifier, name, field descriptors and body syntax
    pub fn validate(&self) -> TemplateResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidTemplate(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplateError::InvalidTemplate(
                "ID must contain only alphanumeric, dash, or underscore".to_string(),
            ));
        }

        if self.name.trim().is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(TemplateError::InvalidTemplate(
                    "Field name must not be empty".to_string(),
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(TemplateError::InvalidTemplate(format!(
                    "Duplicate field: {}",
                    field.name
                )));
            }
            if let Some(default) = &field.default {
                if default.field_type() != field.field_type {
                    return Err(TemplateError::InvalidTemplate(format!(
                        "Default for field '{}' must be of type {}, got {}",
                        field.name,
                        field.field_type,
                        default.field_type()
                    )));
                }
            }
        }

        engine::parse(&self.body)?;
        Ok(())
    }
}

/// Request to create or replace a template
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub id: String,
    pub name: String,
    #[serde(rename = "html_template")]
    pub body: String,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
}

impl From<CreateTemplateRequest> for Template {
    fn from(req: CreateTemplateRequest) -> Self {
        Template {
            id: req.id,
            name: req.name,
            body: req.body,
            fields: req.fields,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// Replacement content for an existing template; the ID comes from the path
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: String,
    #[serde(rename = "html_template")]
    pub body: String,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
}

impl UpdateTemplateRequest {
    pub fn into_template(self, id: String) -> Template {
        Template {
            id,
            name: self.name,
            body: self.body,
            fields: self.fields,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<Template>,
    pub total: usize,
}

/// Current UTC time in the template timestamp format
pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
