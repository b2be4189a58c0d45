//! Template CRUD endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    CreateTemplateRequest, Template, TemplateListResponse, UpdateTemplateRequest,
};

/// POST /api/templates - Create a template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(template_id = %request.id)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>)> {
    let created = state.templates.create_template(request.into())?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.templates.list_templates();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    Ok(Json(state.templates.get_template(&id)?))
}

/// PUT /api/templates/{id} - Replace an existing template
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<Template>> {
    let updated = state.templates.update_template(request.into_template(id))?;
    Ok(Json(updated))
}

/// DELETE /api/templates/{id} - Delete a template
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.templates.delete_template(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
