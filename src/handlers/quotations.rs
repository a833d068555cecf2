// src/handlers/quotations.rs

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
        rbac::{PermQuotations, RequirePermission},
    },
    models::quotation::{QuotationDetail, QuotationPayload, QuotationSummary},
};

// GET /api/quotations
#[utoipa::path(
    get,
    path = "/api/quotations",
    tag = "Quotations",
    responses(
        (status = 200, description = "Orçamentos do tenant, mais recentes primeiro", body = Vec<QuotationSummary>)
    ),
    params(
        ("x-context-id" = Option<String>, Header, description = "Tenant para o qual agir")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotations(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermQuotations>,
) -> Result<impl IntoResponse, AppError> {
    let quotations = app_state.quotation_service.list(&ctx).await?;
    Ok((StatusCode::OK, Json(quotations)))
}

// GET /api/quotations/{id}
#[utoipa::path(
    get,
    path = "/api/quotations/{id}",
    tag = "Quotations",
    responses(
        (status = 200, description = "Cabeçalho, linhas e totais recalculados", body = QuotationDetail),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do orçamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quotation(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermQuotations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.quotation_service.get(&ctx, id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/quotations
#[utoipa::path(
    post,
    path = "/api/quotations",
    tag = "Quotations",
    request_body = QuotationPayload,
    responses(
        (status = 201, description = "Orçamento criado", body = QuotationDetail),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quotation(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermQuotations>,
    Json(payload): Json<QuotationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.quotation_service.create(&ctx, &payload).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

// PUT /api/quotations/{id}
#[utoipa::path(
    put,
    path = "/api/quotations/{id}",
    tag = "Quotations",
    request_body = QuotationPayload,
    responses(
        (status = 200, description = "Orçamento regravado (cabeçalho + linhas)", body = QuotationDetail),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)"),
        (status = 409, description = "Já faturado; documento congelado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do orçamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quotation(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermQuotations>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuotationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state.quotation_service.update(&ctx, id, &payload).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/quotations/{id}
#[utoipa::path(
    delete,
    path = "/api/quotations/{id}",
    tag = "Quotations",
    responses(
        (status = 204, description = "Orçamento excluído"),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do orçamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quotation(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermQuotations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.quotation_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/quotations/{id}/duplicate
#[utoipa::path(
    post,
    path = "/api/quotations/{id}/duplicate",
    tag = "Quotations",
    responses(
        (status = 201, description = "Cópia criada como DRAFT datado de hoje", body = QuotationDetail),
        (status = 404, description = "Origem não encontrada (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do orçamento de origem")
    ),
    security(("api_jwt" = []))
)]
pub async fn duplicate_quotation(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermQuotations>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.quotation_service.duplicate(&ctx, id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}
