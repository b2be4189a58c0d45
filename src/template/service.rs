//! Template lifecycle and certificate rendering

use std::collections::HashMap;
use std::sync::Arc;

use super::default::default_template;
use super::engine;
use super::types::{
    timestamp_now, FieldValue, Template, TemplateError, TemplateResult, DEFAULT_TEMPLATE_ID,
};
use crate::certificate::Certificate;
use crate::metrics::RenderMetrics;
use crate::store::{RecordStore, StoreError};

impl From<StoreError> for TemplateError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TemplateNotFound(id) | StoreError::CertificateNotFound(id) => {
                TemplateError::NotFound(id)
            }
        }
    }
}

/// CRUD over templates plus rendering of certificates against them
pub struct TemplateService {
    store: Arc<RecordStore>,
}

impl TemplateService {
    /// Create the service and seed the default template
    pub fn new(store: Arc<RecordStore>) -> Self {
        let service = Self { store };
        service.initialize_default();
        service
    }

    /// Seed the default template unless it is already present
    pub fn initialize_default(&self) {
        if self.store.template_exists(DEFAULT_TEMPLATE_ID) {
            return;
        }
        self.store.put_template(default_template(&timestamp_now()));
        tracing::info!(template_id = DEFAULT_TEMPLATE_ID, "Default template seeded");
    }

    /// Create a template, replacing any existing one with the same ID
    pub fn create_template(&self, mut template: Template) -> TemplateResult<Template> {
        template.validate()?;

        let now = timestamp_now();
        template.created_at = now.clone();
        template.updated_at = now;

        self.store.put_template(template.clone());
        tracing::info!(template_id = %template.id, "Template created");

        Ok(template)
    }

    pub fn get_template(&self, id: &str) -> TemplateResult<Template> {
        Ok(self.store.get_template(id)?)
    }

    pub fn list_templates(&self) -> Vec<Template> {
        self.store.list_templates()
    }

    /// Replace an existing template, keeping its creation timestamp
    pub fn update_template(&self, mut template: Template) -> TemplateResult<Template> {
        template.validate()?;
        template.updated_at = timestamp_now();

        let template = self.store.replace_template(template)?;
        tracing::info!(template_id = %template.id, "Template updated");

        Ok(template)
    }

    pub fn delete_template(&self, id: &str) -> TemplateResult<()> {
        if id == DEFAULT_TEMPLATE_ID {
            return Err(TemplateError::Protected(id.to_string()));
        }

        self.store.delete_template(id)?;
        tracing::info!(template_id = %id, "Template deleted");
        Ok(())
    }

    /// Render a certificate with its template.
    ///
    /// Data precedence, lowest first: field defaults declared by the
    /// template, the certificate's supplementary data (typed by the matching
    /// descriptor), its standard fields.
    pub fn render_certificate(&self, cert: &Certificate) -> TemplateResult<String> {
        let template = self.store.get_template(&cert.template_id)?;

        let mut data: HashMap<String, FieldValue> = template
            .fields
            .iter()
            .filter_map(|field| {
                field
                    .default
                    .as_ref()
                    .map(|value| (field.name.clone(), value.clone()))
            })
            .collect();
        data.extend(cert.render_data(&template.fields));

        match engine::render(&template.body, &data) {
            Ok(rendered) => {
                RenderMetrics::record_success();
                tracing::debug!(
                    certificate_id = %cert.id,
                    template_id = %template.id,
                    "Certificate rendered"
                );
                Ok(rendered)
            }
            Err(e) => {
                RenderMetrics::record_failure();
                tracing::warn!(
                    certificate_id = %cert.id,
                    template_id = %template.id,
                    error = %e,
                    "Certificate render failed"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::template::{FieldType, TemplateField};

    fn service() -> TemplateService {
        TemplateService::new(Arc::new(RecordStore::new()))
    }

    fn template(id: &str, body: &str) -> Template {
        Template {
            id: id.to_string(),
            name: format!("Template {}", id),
            body: body.to_string(),
            fields: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn cert(template_id: &str) -> Certificate {
        let mut data = BTreeMap::new();
        data.insert("Instructor".to_string(), "Grace".to_string());
        Certificate::new(
            "ana@example.com".to_string(),
            "Ana".to_string(),
            "Rust".to_string(),
            template_id.to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            &data,
        )
    }

    #[test]
    fn test_default_seeded_once() {
        let store = Arc::new(RecordStore::new());
        let svc = TemplateService::new(store.clone());
        let seeded = svc.get_template(DEFAULT_TEMPLATE_ID).unwrap();

        svc.initialize_default();
        assert_eq!(store.template_count(), 1);
        assert_eq!(svc.get_template(DEFAULT_TEMPLATE_ID).unwrap(), seeded);
    }

    #[test]
    fn test_create_stamps_timestamps() {
        let svc = service();
        let created = svc.create_template(template("t1", "{{Name}}")).unwrap();
        assert!(!created.created_at.is_empty());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn test_create_rejects_malformed_body() {
        let svc = service();
        let result = svc.create_template(template("bad", "{{Name"));
        assert!(matches!(result, Err(TemplateError::Render(_))));
        assert!(svc.get_template("bad").is_err());
    }

    #[test]
    fn test_update_requires_existing() {
        let svc = service();
        let result = svc.update_template(template("ghost", "x"));
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_update_after_delete_fails() {
        let svc = service();
        svc.create_template(template("t1", "v1")).unwrap();
        svc.delete_template("t1").unwrap();

        let result = svc.update_template(template("t1", "v2"));
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
        assert!(svc.get_template("t1").is_err());
    }

    #[test]
    fn test_update_keeps_created_at() {
        let svc = service();
        let created = svc.create_template(template("t1", "v1")).unwrap();

        let mut changed = template("t1", "v2");
        changed.created_at = "bogus".to_string();
        let updated = svc.update_template(changed).unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(svc.get_template("t1").unwrap().body, "v2");
    }

    #[test]
    fn test_delete_default_protected() {
        let svc = service();
        for i in 0..3 {
            svc.create_template(template(&format!("t{}", i), "x")).unwrap();
        }
        assert!(matches!(
            svc.delete_template(DEFAULT_TEMPLATE_ID),
            Err(TemplateError::Protected(_))
        ));
        assert!(svc.get_template(DEFAULT_TEMPLATE_ID).is_ok());
    }

    #[test]
    fn test_delete_missing() {
        let svc = service();
        assert!(matches!(
            svc.delete_template("nope"),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_render_default_template() {
        let svc = service();
        let c = cert(DEFAULT_TEMPLATE_ID);
        let html = svc.render_certificate(&c).unwrap();
        assert!(html.contains("Ana"));
        assert!(html.contains("Rust"));
        assert!(html.contains("09/03/2024"));
        assert!(html.contains(&c.id));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_missing_key_verbatim() {
        let svc = service();
        svc.create_template(template("t", "{{Name}} by {{Instructor}} [{{Grade}}]"))
            .unwrap();
        let rendered = svc.render_certificate(&cert("t")).unwrap();
        assert_eq!(rendered, "Ana by Grace [{{Grade}}]");
    }

    #[test]
    fn test_render_uses_field_defaults() {
        let svc = service();
        let mut t = template("t", "{{hours}}h {{Instructor}}");
        t.fields = vec![
            TemplateField {
                name: "hours".to_string(),
                field_type: FieldType::Number,
                required: false,
                default: Some(FieldValue::Number(20.0)),
                description: None,
            },
            TemplateField {
                name: "Instructor".to_string(),
                field_type: FieldType::String,
                required: false,
                default: Some(FieldValue::from("Staff")),
                description: None,
            },
        ];
        svc.create_template(t).unwrap();

        assert_eq!(svc.render_certificate(&cert("t")).unwrap(), "20h Grace");
    }

    #[test]
    fn test_render_supplementary_data_typed_by_field() {
        let svc = service();
        let mut t = template("dated", "Issued {{issued}} for {{hours}}h ({{note}})");
        t.fields = vec![
            TemplateField::new("issued", FieldType::Date, false, "Issue date"),
            TemplateField::new("hours", FieldType::Number, false, "Hours"),
            TemplateField::new("note", FieldType::Date, false, "Not really a date"),
        ];
        svc.create_template(t).unwrap();

        let mut data = BTreeMap::new();
        data.insert("issued".to_string(), "2024-01-15".to_string());
        data.insert("hours".to_string(), "40.0".to_string());
        data.insert("note".to_string(), "soon".to_string());
        let c = Certificate::new(
            "ana@example.com".to_string(),
            "Ana".to_string(),
            "Rust".to_string(),
            "dated".to_string(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            &data,
        );

        assert_eq!(
            svc.render_certificate(&c).unwrap(),
            "Issued 15/01/2024 for 40h (soon)"
        );
    }

    #[test]
    fn test_render_missing_template() {
        let svc = service();
        assert!(matches!(
            svc.render_certificate(&cert("gone")),
            Err(TemplateError::NotFound(_))
        ));
    }
}
