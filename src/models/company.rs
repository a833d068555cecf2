// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Perfil da empresa emissora. É este registro que vira o snapshot
// congelado dentro de cada orçamento salvo.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: Uuid,

    #[schema(ignore)]
    pub owner_id: Uuid,

    #[schema(example = "Eliza Infotech")]
    pub name: String,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub tax_id: Option<String>,
    pub registration_no: Option<String>,

    // Dados bancários exibidos no rodapé do documento
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub branch_code: Option<String>,
    pub account_holder: Option<String>,
    pub payment_handle: Option<String>,

    pub is_default: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    pub address: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    pub tax_id: Option<String>,
    pub registration_no: Option<String>,
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub branch_code: Option<String>,
    pub account_holder: Option<String>,
    pub payment_handle: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}
