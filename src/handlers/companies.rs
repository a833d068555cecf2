// src/handlers/companies.rs

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
        rbac::{PermCompanies, RequirePermission},
    },
    models::company::{CompanyPayload, CompanyProfile},
};

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    responses(
        (status = 200, description = "Perfis de empresa do tenant", body = Vec<CompanyProfile>)
    ),
    params(
        ("x-context-id" = Option<String>, Header, description = "Tenant para o qual agir")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermCompanies>,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.company_service.list(&ctx).await?;
    Ok((StatusCode::OK, Json(companies)))
}

// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    responses(
        (status = 200, description = "Perfil de empresa", body = CompanyProfile),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do perfil")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermCompanies>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.get(&ctx, id).await?;
    Ok((StatusCode::OK, Json(company)))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    request_body = CompanyPayload,
    responses(
        (status = 201, description = "Perfil criado; se vier como padrão, o padrão anterior cai na mesma transação", body = CompanyProfile)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermCompanies>,
    Json(payload): Json<CompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let company = app_state.company_service.create(&ctx, &payload).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

// PUT /api/companies/{id}
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    request_body = CompanyPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = CompanyProfile),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do perfil")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermCompanies>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let company = app_state.company_service.update(&ctx, id, &payload).await?;
    Ok((StatusCode::OK, Json(company)))
}

// DELETE /api/companies/{id}
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    responses(
        (status = 204, description = "Perfil excluído"),
        (status = 404, description = "Não encontrado (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do perfil")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermCompanies>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.company_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
