// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Cliente do tenant. Nome é único por tenant (sem distinção de maiúsculas)
// e serve de chave natural para o upsert em lote.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "Constructora Horizonte Ltda")]
    pub name: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Constructora Horizonte Ltda")]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
}

// Item do catálogo de preços. Nome também é a chave de upsert do import.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "DS-2CE76D0T")]
    pub model_number: Option<String>,

    #[schema(example = "Câmera Dome 2MP")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = "1000.00")]
    pub unit_rate: Decimal,

    #[schema(example = "18.00")]
    pub tax_rate: Decimal,

    pub tax_code: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemPayload {
    pub model_number: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    pub unit_rate: Decimal,

    #[serde(default)]
    pub tax_rate: Decimal,

    pub tax_code: Option<String>,
}

// Corpo do DELETE em lote (clientes e itens)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeletePayload {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub processed: u64,
}
