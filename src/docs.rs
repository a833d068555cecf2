// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::update_user_status,
        handlers::users::delete_user,

        // --- Clients ---
        handlers::clients::list_clients,
        handlers::clients::search_clients,
        handlers::clients::create_client,
        handlers::clients::update_client,
        handlers::clients::delete_client,
        handlers::clients::bulk_upsert_clients,
        handlers::clients::bulk_delete_clients,

        // --- Items ---
        handlers::items::list_items,
        handlers::items::create_item,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::items::bulk_upsert_items,
        handlers::items::bulk_delete_items,

        // --- Quotations ---
        handlers::quotations::list_quotations,
        handlers::quotations::get_quotation,
        handlers::quotations::create_quotation,
        handlers::quotations::update_quotation,
        handlers::quotations::delete_quotation,
        handlers::quotations::duplicate_quotation,

        // --- Invoices ---
        handlers::invoices::list_invoices,
        handlers::invoices::convert_quotation,
        handlers::invoices::update_invoice_status,

        // --- Companies ---
        handlers::companies::list_companies,
        handlers::companies::get_company,
        handlers::companies::create_company,
        handlers::companies::update_company,
        handlers::companies::delete_company,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserStatus,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::UpdateUserStatusPayload,
            models::auth::MeResponse,

            // --- Catalog ---
            models::catalog::Client,
            models::catalog::ClientPayload,
            models::catalog::CatalogItem,
            models::catalog::CatalogItemPayload,
            models::catalog::BulkDeletePayload,
            models::catalog::BulkResult,

            // --- Quotations ---
            models::quotation::QuotationStatus,
            models::quotation::DiscountType,
            models::quotation::Quotation,
            models::quotation::QuotationItem,
            models::quotation::QuotationSummary,
            models::quotation::QuotationTotals,
            models::quotation::TaxBreakdownEntry,
            models::quotation::QuotationDetail,
            models::quotation::QuotationPayload,
            models::quotation::QuotationItemPayload,

            // --- Invoices ---
            models::invoice::InvoiceStatus,
            models::invoice::Invoice,
            models::invoice::UpdateInvoiceStatusPayload,
            models::invoice::ConvertResponse,

            // --- Companies ---
            models::company::CompanyProfile,
            models::company::CompanyPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Gestão de Principals (contas e sub-contas)"),
        (name = "Clients", description = "Cadastro de Clientes"),
        (name = "Items", description = "Catálogo de Itens Precificados"),
        (name = "Quotations", description = "Orçamentos: ciclo de vida e precificação"),
        (name = "Invoices", description = "Faturas: conversão e pagamento"),
        (name = "Companies", description = "Perfis da Empresa Emissora")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
