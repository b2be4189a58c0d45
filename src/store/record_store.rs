//! In-memory record store with an email index

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::certificate::Certificate;
use crate::template::Template;

/// Store lookup failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Certificate not found: {0}")]
    CertificateNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Default)]
struct Records {
    certificates: HashMap<String, Certificate>,
    templates: HashMap<String, Template>,
    /// email -> certificate ids, in insertion order
    email_index: HashMap<String, Vec<String>>,
}

/// Certificates, templates and the email index behind a single lock.
///
/// Writers take the lock exclusively, readers share it. Nothing blocks while
/// the lock is held.
#[derive(Default)]
pub struct RecordStore {
    records: RwLock<Records>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the guard cannot leave the maps half-updated,
    // so poisoned locks are recovered.
    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or overwrite a certificate and append it to its email's index
    pub fn put_certificate(&self, cert: Certificate) {
        let mut records = self.write();
        records
            .email_index
            .entry(cert.email.clone())
            .or_default()
            .push(cert.id.clone());
        records.certificates.insert(cert.id.clone(), cert);
    }

    pub fn get_certificate(&self, id: &str) -> StoreResult<Certificate> {
        self.read()
            .certificates
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::CertificateNotFound(id.to_string()))
    }

    /// Certificates issued to `email`, oldest first. Unknown emails yield an
    /// empty list.
    pub fn get_certificates_by_email(&self, email: &str) -> Vec<Certificate> {
        let records = self.read();
        let Some(ids) = records.email_index.get(email) else {
            return Vec::new();
        };

        ids.iter()
            .filter_map(|id| records.certificates.get(id).cloned())
            .collect()
    }

    pub fn certificate_count(&self) -> usize {
        self.read().certificates.len()
    }

    /// Total number of ids held across all email index lists. Every put adds
    /// one entry, so this equals the number of puts; exported as a gauge.
    pub fn index_entry_count(&self) -> usize {
        self.read().email_index.values().map(Vec::len).sum()
    }

    pub fn put_template(&self, template: Template) {
        self.write()
            .templates
            .insert(template.id.clone(), template);
    }

    pub fn get_template(&self, id: &str) -> StoreResult<Template> {
        self.read()
            .templates
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::TemplateNotFound(id.to_string()))
    }

    /// Overwrite an existing template, keeping its stored `created_at`.
    ///
    /// The existence check and the write happen under one guard, so a
    /// template deleted concurrently is never brought back.
    pub fn replace_template(&self, mut template: Template) -> StoreResult<Template> {
        let mut records = self.write();
        let existing = records
            .templates
            .get(&template.id)
            .ok_or_else(|| StoreError::TemplateNotFound(template.id.clone()))?;

        template.created_at = existing.created_at.clone();
        records
            .templates
            .insert(template.id.clone(), template.clone());
        Ok(template)
    }

    pub fn template_exists(&self, id: &str) -> bool {
        self.read().templates.contains_key(id)
    }

    /// Snapshot of all templates in no particular order
    pub fn list_templates(&self) -> Vec<Template> {
        self.read().templates.values().cloned().collect()
    }

    pub fn template_count(&self) -> usize {
        self.read().templates.len()
    }

    pub fn delete_template(&self, id: &str) -> StoreResult<()> {
        self.write()
            .templates
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::TemplateNotFound(id.to_string()))
    }
}
