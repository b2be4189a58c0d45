//! Certificate issuing and lookup

use std::sync::Arc;

use chrono::NaiveDate;

use super::types::{Certificate, CertificateError, CertificateRequest, CertificateResult};
use crate::metrics::CertificateMetrics;
use crate::store::RecordStore;
use crate::template::DEFAULT_TEMPLATE_ID;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates requests and issues certificates into the record store
pub struct CertificateService {
    store: Arc<RecordStore>,
}

impl CertificateService {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Validate a request and issue a certificate for it
    pub fn create_certificate(&self, request: &CertificateRequest) -> CertificateResult<Certificate> {
        let email = required("email", &request.email)?;
        let name = required("name", &request.name)?;
        let course = required("course", &request.course)?;

        if !email.contains('@') {
            return Err(CertificateError::Validation(format!(
                "invalid email address: {}",
                email
            )));
        }

        let completion_date = parse_completion_date(&request.completion_date)?;

        let template_id = request
            .template_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_TEMPLATE_ID);

        if !self.store.template_exists(template_id) {
            return Err(CertificateError::TemplateNotFound(template_id.to_string()));
        }

        let cert = Certificate::new(
            email.to_string(),
            name.to_string(),
            course.to_string(),
            template_id.to_string(),
            completion_date,
            &request.data,
        );

        self.store.put_certificate(cert.clone());
        CertificateMetrics::record_created();
        tracing::info!(
            certificate_id = %cert.id,
            email = %cert.email,
            template_id = %cert.template_id,
            "Certificate created"
        );

        Ok(cert)
    }

    pub fn get_certificate(&self, id: &str) -> CertificateResult<Certificate> {
        Ok(self.store.get_certificate(id)?)
    }

    pub fn get_certificates_by_email(&self, email: &str) -> Vec<Certificate> {
        let certificates = self.store.get_certificates_by_email(email);
        tracing::debug!(email = %email, count = certificates.len(), "Certificates looked up");
        certificates
    }
}

fn required<'a>(field: &str, value: &'a str) -> CertificateResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CertificateError::Validation(format!("{} is required", field)));
    }
    Ok(value)
}

/// Parse a completion date written exactly as `YYYY-MM-DD`
pub fn parse_completion_date(raw: &str) -> CertificateResult<NaiveDate> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-';

    shaped
        .then(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .flatten()
        .ok_or_else(|| {
            CertificateError::Validation(format!(
                "invalid completion_date '{}', expected YYYY-MM-DD",
                raw
            ))
        })
}
