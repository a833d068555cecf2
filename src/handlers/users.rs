// src/handlers/users.rs

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
    middleware::auth::AuthContext,
    models::auth::{CreateUserPayload, UpdateUserPayload, UpdateUserStatusPayload, User},
};

// A gestão de principals não passa pelo RequirePermission: a política é por
// papel (admin/owner) e nunca é delegável a sub-contas — o serviço decide.

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Admin: todos; Owner: as próprias sub-contas", body = Vec<User>),
        (status = 403, description = "Sub-contas não gerenciam principals")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list(&ctx).await?;
    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Principal criado", body = User),
        (status = 403, description = "Papel solicitado fora da sua alçada"),
        (status = 409, description = "Usuário já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.create(&ctx, &payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Papel/permissões atualizados", body = User),
        (status = 403, description = "Fora da sua alçada, ou rebaixamento da própria conta")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do principal")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.update(&ctx, id, &payload).await?;
    Ok((StatusCode::OK, Json(user)))
}

// PATCH /api/users/{id}/status
#[utoipa::path(
    patch,
    path = "/api/users/{id}/status",
    tag = "Users",
    request_body = UpdateUserStatusPayload,
    responses(
        (status = 200, description = "Status atualizado"),
        (status = 403, description = "Não se desativa a própria conta")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do principal")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user_status(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .update_status(&ctx, id, payload.status)
        .await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Status do usuário atualizado." })),
    ))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    responses(
        (status = 204, description = "Principal excluído"),
        (status = 403, description = "Não se exclui a própria conta")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do principal")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
