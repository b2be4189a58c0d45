use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::certificate::{
    create_certificate, create_certificates_batch, get_certificate, get_certificates_by_email,
};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::template::{
    create_template, delete_template, get_template, list_templates, update_template,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                // Certificates
                .route("/certificates", post(create_certificate))
                .route("/certificates/batch", post(create_certificates_batch))
                .route("/certificates/by-email/{email}", get(get_certificates_by_email))
                .route("/certificates/{id}", get(get_certificate))
                // Templates
                .route("/templates", get(list_templates).post(create_template))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                ),
        )
}
