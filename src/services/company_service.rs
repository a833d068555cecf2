// src/services/company_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompanyRepository,
    middleware::auth::AuthContext,
    models::company::{CompanyPayload, CompanyProfile},
};

#[derive(Clone)]
pub struct CompanyService {
    repo: CompanyRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(repo: CompanyRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<CompanyProfile>, AppError> {
        self.repo.list(&self.pool, ctx.scope()).await
    }

    pub async fn get(&self, ctx: &AuthContext, id: Uuid) -> Result<CompanyProfile, AppError> {
        self.repo
            .find(&self.pool, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)
    }

    /// Criar como padrão derruba o padrão anterior na mesma transação:
    /// nunca existe mais de um is_default por tenant.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        payload: &CompanyPayload,
    ) -> Result<CompanyProfile, AppError> {
        let owner_id = ctx.tenant_id();

        let mut tx = self.pool.begin().await?;
        if payload.is_default {
            self.repo.clear_default(&mut *tx, owner_id).await?;
        }
        let company = self.repo.insert(&mut *tx, owner_id, payload).await?;
        tx.commit().await?;

        Ok(company)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        payload: &CompanyPayload,
    ) -> Result<CompanyProfile, AppError> {
        let mut tx = self.pool.begin().await?;

        // Carrega primeiro para saber de qual tenant é o perfil (admin pode
        // estar editando um perfil de outro tenant)
        let existing = self
            .repo
            .find(&mut *tx, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        if payload.is_default {
            self.repo.clear_default(&mut *tx, existing.owner_id).await?;
        }

        let company = self
            .repo
            .update(&mut *tx, ctx.scope(), id, payload)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        tx.commit().await?;

        Ok(company)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let affected = self.repo.delete(&self.pool, ctx.scope(), id).await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }
        Ok(())
    }
}
