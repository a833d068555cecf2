// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, middleware::auth::AuthContext, services::policy};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
///
/// Checa a capacidade da IDENTIDADE logada (não do tenant efetivo):
/// é a sub-conta que carrega a whitelist de capacidades.
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .ok_or(AppError::InvalidToken)?;

        if !policy::has_capability(&ctx.identity, T::slug()) {
            return Err(AppError::Forbidden);
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermQuotations;
impl PermissionDef for PermQuotations {
    fn slug() -> &'static str {
        "quotations"
    }
}

pub struct PermInvoices;
impl PermissionDef for PermInvoices {
    fn slug() -> &'static str {
        "invoices"
    }
}

pub struct PermClients;
impl PermissionDef for PermClients {
    fn slug() -> &'static str {
        "clients"
    }
}

pub struct PermItems;
impl PermissionDef for PermItems {
    fn slug() -> &'static str {
        "items"
    }
}

pub struct PermCompanies;
impl PermissionDef for PermCompanies {
    fn slug() -> &'static str {
        "companies"
    }
}
