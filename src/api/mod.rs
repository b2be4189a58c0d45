//! API layer - HTTP endpoint handlers organized by domain.

mod certificate;
mod health;
mod metrics;
mod routes;
mod template;

pub use certificate::{
    create_certificate, create_certificates_batch, get_certificate, get_certificates_by_email,
    CertificatesByEmailResponse,
};
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{create_template, delete_template, get_template, list_templates, update_template};
