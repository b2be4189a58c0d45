//! Certificate endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::certificate::{BatchResult, Certificate, CertificateRequest};
use crate::error::Result;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct CertificatesByEmailResponse {
    pub email: String,
    pub count: usize,
    pub certificates: Vec<Certificate>,
}

/// POST /api/certificates - Issue a single certificate
#[tracing::instrument(name = "http.create_certificate", skip(state, request))]
pub async fn create_certificate(
    State(state): State<AppState>,
    Json(request): Json<CertificateRequest>,
) -> Result<(StatusCode, Json<Certificate>)> {
    let cert = state.certificates.create_certificate(&request)?;
    Ok((StatusCode::CREATED, Json(cert)))
}

/// POST /api/certificates/batch - Issue certificates from a CSV body
#[tracing::instrument(name = "http.create_certificates_batch", skip(state, body), fields(bytes = body.len()))]
pub async fn create_certificates_batch(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BatchResult>> {
    Ok(Json(state.certificates.create_certificates_from_csv(&body)?))
}

/// GET /api/certificates/{id} - Certificate as JSON, or rendered with `.html`
#[tracing::instrument(name = "http.get_certificate", skip(state))]
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    if let Some(id) = id.strip_suffix(".html") {
        let cert = state.certificates.get_certificate(id)?;
        let rendered = state.templates.render_certificate(&cert)?;
        return Ok(Html(rendered).into_response());
    }

    let cert = state.certificates.get_certificate(&id)?;
    Ok(Json(cert).into_response())
}

/// GET /api/certificates/by-email/{email}
#[tracing::instrument(name = "http.get_certificates_by_email", skip(state))]
pub async fn get_certificates_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Json<CertificatesByEmailResponse> {
    let certificates = state.certificates.get_certificates_by_email(&email);

    Json(CertificatesByEmailResponse {
        email,
        count: certificates.len(),
        certificates,
    })
}
