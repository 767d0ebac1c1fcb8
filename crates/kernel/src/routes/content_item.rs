//! Content item route handlers.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, extract::Path, extract::Query, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{CreateItem, ItemFilter, UpdateItem};
use crate::error::{AppError, AppResult};
use crate::models::{ContentItem, ContentStatus, ItemWithType};
use crate::state::AppState;

use super::content_type::Ack;

/// Query parameters for listing items; filters are ANDed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    pub content_type_id: Option<Uuid>,
    pub status: Option<ContentStatus>,
}

/// Request body for creating an item. Presence of the mandatory fields is
/// checked by hand so the caller gets the envelope's 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub content_type_id: Option<Uuid>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub status: Option<ContentStatus>,
    pub fields: Option<serde_json::Value>,
}

/// Success envelope carrying a content item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEnvelope {
    pub ok: bool,
    pub msg: &'static str,
    pub content_item: ContentItem,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/content-items", get(list_items).post(create_item))
        .route(
            "/content-items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/content-items/{id}/publish", post(publish_item))
        .route("/content-items/{id}/unpublish", post(unpublish_item))
}

async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> AppResult<Json<Vec<ItemWithType>>> {
    let filter = ItemFilter {
        content_type_id: query.content_type_id,
        status: query.status,
    };
    Ok(Json(state.items().list(filter).await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ItemWithType>> {
    Ok(Json(state.items().get(id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ItemEnvelope>)> {
    let (content_type_id, title, slug) = match (request.content_type_id, request.title, request.slug)
    {
        (Some(type_id), Some(title), Some(slug))
            if !title.trim().is_empty() && !slug.trim().is_empty() =>
        {
            (type_id, title, slug)
        }
        _ => {
            return Err(AppError::Validation(
                "Content type ID, title, and slug are required".to_string(),
            ));
        }
    };

    let content_item = state
        .items()
        .create(CreateItem {
            content_type_id,
            title,
            slug,
            status: request.status,
            fields: request.fields,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope {
            ok: true,
            msg: "Content item created successfully",
            content_item,
        }),
    ))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdateItem>,
) -> AppResult<Json<ItemEnvelope>> {
    let content_item = state.items().update(id, patch).await?;

    Ok(Json(ItemEnvelope {
        ok: true,
        msg: "Content item updated successfully",
        content_item,
    }))
}

async fn delete_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Ack>> {
    state.items().delete(id).await?;

    Ok(Json(Ack {
        ok: true,
        msg: "Content item deleted successfully",
    }))
}

async fn publish_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ItemEnvelope>> {
    let content_item = state.items().publish(id).await?;

    Ok(Json(ItemEnvelope {
        ok: true,
        msg: "Content item published successfully",
        content_item,
    }))
}

async fn unpublish_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ItemEnvelope>> {
    let content_item = state.items().unpublish(id).await?;

    Ok(Json(ItemEnvelope {
        ok: true,
        msg: "Content item unpublished successfully",
        content_item,
    }))
}
