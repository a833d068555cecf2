// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthContext,
        rbac::{PermClients, RequirePermission},
    },
    models::catalog::{BulkDeletePayload, BulkResult, Client, ClientPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses(
        (status = 200, description = "Clientes do tenant em ordem alfabética", body = Vec<Client>)
    ),
    params(
        ("x-context-id" = Option<String>, Header, description = "Tenant para o qual agir")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.catalog_service.list_clients(&ctx).await?;
    Ok((StatusCode::OK, Json(clients)))
}

// GET /api/clients/search?q=
#[utoipa::path(
    get,
    path = "/api/clients/search",
    tag = "Clients",
    params(SearchQuery),
    responses(
        (status = 200, description = "Até 10 clientes para o autocomplete", body = Vec<Client>)
    ),
    security(("api_jwt" = []))
)]
pub async fn search_clients(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let q = query.q.unwrap_or_default();
    let clients = app_state.catalog_service.search_clients(&ctx, &q).await?;
    Ok((StatusCode::OK, Json(clients)))
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 409, description = "Nome já cadastrado neste tenant")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state.catalog_service.create_client(&ctx, &payload).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Cliente atualizado"),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .catalog_service
        .update_client(&ctx, id, &payload)
        .await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Cliente atualizado." })),
    ))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    responses(
        (status = 204, description = "Cliente excluído"),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_client(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/clients/bulk
#[utoipa::path(
    post,
    path = "/api/clients/bulk",
    tag = "Clients",
    request_body = Vec<ClientPayload>,
    responses(
        (status = 200, description = "Upsert por nome concluído", body = BulkResult)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_upsert_clients(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
    Json(payloads): Json<Vec<ClientPayload>>,
) -> Result<impl IntoResponse, AppError> {
    let processed = app_state
        .catalog_service
        .bulk_upsert_clients(&ctx, &payloads)
        .await?;
    Ok((StatusCode::OK, Json(BulkResult { processed })))
}

// DELETE /api/clients/bulk
#[utoipa::path(
    delete,
    path = "/api/clients/bulk",
    tag = "Clients",
    request_body = BulkDeletePayload,
    responses(
        (status = 200, description = "Exclusão em lote concluída", body = BulkResult)
    ),
    security(("api_jwt" = []))
)]
pub async fn bulk_delete_clients(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermClients>,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<impl IntoResponse, AppError> {
    let processed = app_state
        .catalog_service
        .bulk_delete_clients(&ctx, &payload.ids)
        .await?;
    Ok((StatusCode::OK, Json(BulkResult { processed })))
}
