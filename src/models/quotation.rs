// src/models/quotation.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quotation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotationStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    // Terminal. Só a conversão grava este status; o update recusa.
    Invoiced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "discount_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    Percent,
    Fixed,
}

// --- Structs ---

// Cabeçalho do orçamento. Os campos client_* são snapshots: o documento
// histórico não muda se o cadastro do cliente mudar ou sumir.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub client_address: Option<String>,
    pub client_tax_id: Option<String>,

    #[schema(value_type = String, format = Date, example = "2026-08-05")]
    pub date: NaiveDate,

    pub status: QuotationStatus,

    pub discount_type: DiscountType,
    #[schema(example = "10.00")]
    pub discount_value: Decimal,

    pub notes: Option<String>,
    pub terms: Option<String>,

    // Cópia profunda do perfil da empresa no momento da gravação
    pub company_snapshot: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha do orçamento. `amount` é o valor tributável congelado na gravação
// (quantity * unit_rate); mudanças futuras de preço no catálogo não o afetam.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItem {
    pub id: Uuid,

    #[schema(ignore)]
    pub quotation_id: Uuid,

    // NULL = linha manual (texto livre), sem vínculo com o catálogo
    pub item_id: Option<Uuid>,
    pub model_number: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub note: Option<String>,

    #[schema(example = 2)]
    pub quantity: i32,
    pub is_manual: bool,

    #[schema(example = "1000.00")]
    pub unit_rate: Decimal,
    pub tax_code: Option<String>,
    #[schema(example = "18.00")]
    pub tax_rate: Decimal,
    pub discount: Decimal,

    #[schema(example = "2000.00")]
    pub amount: Decimal,
}

// Listagem: cabeçalho + contagem de linhas
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub client_id: Option<Uuid>,
    pub client_name: String,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub status: QuotationStatus,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub item_count: i64,

    pub created_at: DateTime<Utc>,
}

// --- Totais calculados (algoritmo de precificação) ---

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdownEntry {
    #[schema(example = "18.00")]
    pub rate: Decimal,
    pub taxable: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationTotals {
    pub subtotal: Decimal,
    pub total_tax: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
    // Agrupamento por alíquota, apenas para exibição/fisco; não altera o total
    pub tax_breakdown: Vec<TaxBreakdownEntry>,
}

// GET /quotations/{id}: cabeçalho + linhas + totais recalculados
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub items: Vec<QuotationItem>,
    pub totals: QuotationTotals,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationItemPayload {
    pub item_id: Option<Uuid>,
    pub model_number: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    pub description: Option<String>,
    pub note: Option<String>,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "quantity_positive"))]
    pub quantity: i32,

    #[serde(default)]
    pub is_manual: bool,

    #[serde(default)]
    pub unit_rate: Decimal,

    pub tax_code: Option<String>,

    #[serde(default)]
    pub tax_rate: Decimal,

    #[serde(default)]
    pub discount: Decimal,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPayload {
    pub client_id: Option<Uuid>,

    #[validate(length(min = 1, message = "required"))]
    pub client_name: String,

    pub client_address: Option<String>,
    pub client_tax_id: Option<String>,

    #[schema(value_type = String, format = Date, example = "2026-08-05")]
    pub date: NaiveDate,

    pub status: Option<QuotationStatus>,

    pub discount_type: Option<DiscountType>,

    #[serde(default)]
    pub discount_value: Decimal,

    pub notes: Option<String>,
    pub terms: Option<String>,

    // Perfil emissor a congelar no documento; ausente = perfil padrão do tenant
    pub company_id: Option<Uuid>,

    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<QuotationItemPayload>,
}
