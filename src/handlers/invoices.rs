// src/handlers/invoices.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthContext,
        rbac::{PermInvoices, RequirePermission},
    },
    models::invoice::{ConvertResponse, Invoice, UpdateInvoiceStatusPayload},
};

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    responses(
        (status = 200, description = "Faturas do tenant, mais recentes primeiro", body = Vec<Invoice>)
    ),
    params(
        ("x-context-id" = Option<String>, Header, description = "Tenant para o qual agir")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermInvoices>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state.invoice_service.list(&ctx).await?;
    Ok((StatusCode::OK, Json(invoices)))
}

// POST /api/invoices/convert/{quotation_id}
#[utoipa::path(
    post,
    path = "/api/invoices/convert/{quotation_id}",
    tag = "Invoices",
    responses(
        (status = 201, description = "Fatura criada; orçamento passa a INVOICED", body = ConvertResponse),
        (status = 404, description = "Orçamento não encontrado (ou fora do seu tenant)"),
        (status = 409, description = "Orçamento já convertido; id da fatura existente no corpo")
    ),
    params(
        ("quotation_id" = Uuid, Path, description = "ID do orçamento a converter")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_quotation(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermInvoices>,
    Path(quotation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.convert(&ctx, quotation_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ConvertResponse {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
        }),
    ))
}

// PATCH /api/invoices/{id}/status
#[utoipa::path(
    patch,
    path = "/api/invoices/{id}/status",
    tag = "Invoices",
    request_body = UpdateInvoiceStatusPayload,
    responses(
        (status = 200, description = "Status de pagamento atualizado"),
        (status = 404, description = "Não encontrada (ou fora do seu tenant)")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da fatura")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice_status(
    State(app_state): State<AppState>,
    ctx: AuthContext,
    _perm: RequirePermission<PermInvoices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoiceStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .invoice_service
        .set_status(&ctx, id, payload.status)
        .await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "Status da fatura atualizado." })),
    ))
}
