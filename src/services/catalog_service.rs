// src/services/catalog_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    middleware::auth::AuthContext,
    models::catalog::{CatalogItem, CatalogItemPayload, Client, ClientPayload},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_clients(&self, ctx: &AuthContext) -> Result<Vec<Client>, AppError> {
        self.repo.list_clients(&self.pool, ctx.scope()).await
    }

    pub async fn search_clients(
        &self,
        ctx: &AuthContext,
        query: &str,
    ) -> Result<Vec<Client>, AppError> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }
        self.repo.search_clients(&self.pool, ctx.scope(), query).await
    }

    pub async fn create_client(
        &self,
        ctx: &AuthContext,
        payload: &ClientPayload,
    ) -> Result<Client, AppError> {
        self.repo
            .create_client(&self.pool, ctx.tenant_id(), payload)
            .await
    }

    pub async fn update_client(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        payload: &ClientPayload,
    ) -> Result<(), AppError> {
        let affected = self
            .repo
            .update_client(&self.pool, ctx.scope(), id, payload)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }
        Ok(())
    }

    pub async fn delete_client(&self, ctx: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let affected = self.repo.delete_client(&self.pool, ctx.scope(), id).await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }
        Ok(())
    }

    /// Import em lote: upsert por nome, numa transação só.
    /// Linhas sem nome são ignoradas em vez de derrubar o lote inteiro.
    pub async fn bulk_upsert_clients(
        &self,
        ctx: &AuthContext,
        payloads: &[ClientPayload],
    ) -> Result<u64, AppError> {
        let owner_id = ctx.tenant_id();
        let mut processed = 0u64;

        let mut tx = self.pool.begin().await?;
        for payload in payloads {
            if payload.name.trim().is_empty() {
                continue;
            }
            self.repo
                .upsert_client_by_name(&mut *tx, owner_id, payload)
                .await?;
            processed += 1;
        }
        tx.commit().await?;

        Ok(processed)
    }

    pub async fn bulk_delete_clients(
        &self,
        ctx: &AuthContext,
        ids: &[Uuid],
    ) -> Result<u64, AppError> {
        self.repo
            .bulk_delete_clients(&self.pool, ctx.scope(), ids)
            .await
    }

    // =========================================================================
    //  ITENS DO CATÁLOGO
    // =========================================================================

    pub async fn list_items(&self, ctx: &AuthContext) -> Result<Vec<CatalogItem>, AppError> {
        self.repo.list_items(&self.pool, ctx.scope()).await
    }

    pub async fn create_item(
        &self,
        ctx: &AuthContext,
        payload: &CatalogItemPayload,
    ) -> Result<CatalogItem, AppError> {
        validate_item(payload)?;
        self.repo
            .create_item(&self.pool, ctx.tenant_id(), payload)
            .await
    }

    pub async fn update_item(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        payload: &CatalogItemPayload,
    ) -> Result<(), AppError> {
        validate_item(payload)?;
        let affected = self
            .repo
            .update_item(&self.pool, ctx.scope(), id, payload)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }
        Ok(())
    }

    pub async fn delete_item(&self, ctx: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let affected = self.repo.delete_item(&self.pool, ctx.scope(), id).await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }
        Ok(())
    }

    pub async fn bulk_upsert_items(
        &self,
        ctx: &AuthContext,
        payloads: &[CatalogItemPayload],
    ) -> Result<u64, AppError> {
        let owner_id = ctx.tenant_id();
        let mut processed = 0u64;

        let mut tx = self.pool.begin().await?;
        for payload in payloads {
            if payload.name.trim().is_empty() {
                continue;
            }
            validate_item(payload)?;
            self.repo
                .upsert_item_by_name(&mut *tx, owner_id, payload)
                .await?;
            processed += 1;
        }
        tx.commit().await?;

        Ok(processed)
    }

    pub async fn bulk_delete_items(
        &self,
        ctx: &AuthContext,
        ids: &[Uuid],
    ) -> Result<u64, AppError> {
        self.repo.bulk_delete_items(&self.pool, ctx.scope(), ids).await
    }
}

fn validate_item(payload: &CatalogItemPayload) -> Result<(), AppError> {
    if payload.unit_rate < Decimal::ZERO {
        return Err(AppError::InvalidPayload(
            "O campo 'unitRate' não pode ser negativo.".to_string(),
        ));
    }
    if payload.tax_rate < Decimal::ZERO {
        return Err(AppError::InvalidPayload(
            "O campo 'taxRate' não pode ser negativo.".to_string(),
        ));
    }
    Ok(())
}
