// src/handlers/items.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthContext,
        rbac::{PermItems, RequirePermission},
    },
    models::catalog::{BulkDeletePayload, BulkResult, CatalogItem, CatalogItemPayload},
};

// GET /api/items
#[utoipa::path(
    get,
    path = "/api/items",
    tag = "Items",
    responses(
        (status = 200, description = "Itens do catálogo em ordem alfabética", body = Vec<CatalogItem>)
    ),
    params(
        ("x-context-id" = Option<String>, Header, description = "Tenant para o qual agir")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_items(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermItems>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.catalog_service.list_items(&ctx).await?;
    Ok((StatusCode::OK, Json(items)))
}

// POST /api/items
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "Items",
    request_body = CatalogItemPayload,
    responses(
        (status = 201, description = "Item criado", body = CatalogItem),
        (status = 409, description = "Nome já cadastrado neste tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermItems>,
    Json(payload): Json<CatalogItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state.catalog_service.create_item(&ctx, &payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/items/{id}
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    tag = "Items",
    request_body = CatalogItemPayload,
    responses(
        (status = 200, description = "Item atualizado"),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do item")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermItems>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CatalogItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.catalog_service.update_item(&ctx, id, &payload).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Item atualizado." })),
    ))
}

// DELETE /api/items/{id}
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    tag = "Items",
    responses(
        (status = 204, description = "Item excluído"),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do item")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermItems>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_item(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/items/bulk
#[utoipa::path(
    post,
    path = "/api/items/bulk",
    tag = "Items",
    request_body = Vec<CatalogItemPayload>,
    responses(
        (status = 200, description = "Upsert por nome concluído; a última gravação vence", body = BulkResult)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_upsert_items(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermItems>,
    Json(payloads): Json<Vec<CatalogItemPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let processed = app_state
        .catalog_service
        .bulk_upsert_items(&ctx, &payloads)
        .await?;
    Ok((StatusCode::OK, Json(BulkResult { processed })))
}

// DELETE /api/items/bulk
#[utoipa::path(
    delete,
    path = "/api/items/bulk",
    tag = "Items",
    request_body = BulkDeletePayload,
    responses(
        (status = 200, description = "Exclusão em lote concluída", body = BulkResult)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_items(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermItems>,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<impl IntoResponse, AppError> {
    let processed = app_state
        .catalog_service
        .bulk_delete_items(&ctx, &payload.ids)
        .await?;
    Ok((StatusCode::OK, Json(BulkResult { processed })))
}
