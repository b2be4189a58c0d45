//! Certificate template system.
//!
//! This module provides:
//! - Template definition with `{{placeholder}}` substitution points and typed
//!   field descriptors
//! - The substitution engine
//! - `TemplateService`: CRUD with a protected, always-present default
//!   template, and rendering of certificates
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(RecordStore::new());
//! let templates = TemplateService::new(store.clone());
//!
//! templates.create_template(Template {
//!     id: "workshop".to_string(),
//!     name: "Workshop".to_string(),
//!     body: "{{Name}} attended {{Course}} on {{CompletionDate}}".to_string(),
//!     fields: vec![],
//!     created_at: String::new(),
//!     updated_at: String::new(),
//! })?;
//!
//! let text = templates.render_certificate(&certificate)?;
//! ```

mod default;
pub mod engine;
mod service;
mod types;

pub use engine::{render, RenderError};
pub use service::TemplateService;
pub use types::{
    CreateTemplateRequest, FieldType, FieldValue, Template, TemplateError, TemplateField,
    TemplateListResponse, TemplateResult, UpdateTemplateRequest, DEFAULT_TEMPLATE_ID,
};
