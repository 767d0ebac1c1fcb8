//! Content type route handlers.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router, extract::Path, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ContentType, FieldDeclaration, TypeDeclaration};
use crate::state::AppState;

/// Request body for creating a content type. Presence is checked by hand
/// so missing fields produce the envelope's 400 instead of a rejection
/// from the JSON extractor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTypeRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

/// Success envelope carrying a created content type.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEnvelope {
    pub ok: bool,
    pub msg: &'static str,
    pub content_type: ContentType,
}

/// Success envelope with no resource (deletes).
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
    pub msg: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content-types", get(list_types).post(create_type))
        .route("/content-types/{id}", get(get_type).delete(delete_type))
}

async fn list_types(State(state): State<AppState>) -> AppResult<Json<Vec<ContentType>>> {
    Ok(Json(state.content_types().list().await?))
}

async fn get_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContentType>> {
    Ok(Json(state.content_types().get(id).await?))
}

async fn create_type(
    State(state): State<AppState>,
    Json(request): Json<CreateTypeRequest>,
) -> AppResult<(StatusCode, Json<TypeEnvelope>)> {
    let (name, slug) = match (request.name, request.slug) {
        (Some(name), Some(slug)) if !name.trim().is_empty() && !slug.trim().is_empty() => {
            (name, slug)
        }
        _ => {
            return Err(AppError::Validation("Name and slug are required".to_string()));
        }
    };

    let content_type = state
        .content_types()
        .create(TypeDeclaration {
            name,
            slug,
            fields: request.fields,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TypeEnvelope {
            ok: true,
            msg: "Content type created successfully",
            content_type,
        }),
    ))
}

async fn delete_type(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Ack>> {
    state.content_types().delete(id).await?;

    Ok(Json(Ack {
        ok: true,
        msg: "Content type deleted successfully",
    }))
}
