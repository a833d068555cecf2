// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

// Fatura gerada pela conversão. Imutável, exceto o status de pagamento.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "INV-202608-3f2a91bc")]
    pub invoice_number: String,

    pub quotation_id: Uuid,
    pub client_name: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    // Total recalculado no servidor a partir das linhas persistidas
    #[schema(example = "2124.00")]
    pub total_amount: Decimal,

    pub status: InvoiceStatus,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoiceStatusPayload {
    pub status: InvoiceStatus,
}

// Resposta do convert
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub id: Uuid,
    pub invoice_number: String,
}
