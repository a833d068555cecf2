// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::company::{CompanyPayload, CompanyProfile},
};

const COMPANY_COLUMNS: &str = r#"
    id, owner_id, name, address, phone, email, tax_id, registration_no,
    bank_name, account_no, branch_code, account_holder, payment_handle,
    is_default, created_at, updated_at
"#;

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
    ) -> Result<Vec<CompanyProfile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let companies = sqlx::query_as::<_, CompanyProfile>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY name ASC
            "#
        ))
        .bind(scope)
        .fetch_all(executor)
        .await?;
        Ok(companies)
    }

    pub async fn find<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<CompanyProfile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, CompanyProfile>(&format!(
            r#"
            SELECT {COMPANY_COLUMNS}
            FROM companies
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#
        ))
        .bind(id)
        .bind(scope)
        .fetch_optional(executor)
        .await?;
        Ok(company)
    }

    /// Perfil padrão do tenant, usado quando o orçamento não indica um emissor.
    pub async fn find_default<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
    ) -> Result<Option<CompanyProfile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, CompanyProfile>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE owner_id = $1 AND is_default"
        ))
        .bind(owner_id)
        .fetch_optional(executor)
        .await?;
        Ok(company)
    }

    /// Derruba o padrão anterior. Roda na MESMA transação do insert/update
    /// que está promovendo o novo padrão.
    pub async fn clear_default<'e, E>(&self, executor: E, owner_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE companies SET is_default = FALSE, updated_at = NOW() WHERE owner_id = $1 AND is_default")
            .bind(owner_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CompanyPayload,
    ) -> Result<CompanyProfile, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, CompanyProfile>(&format!(
            r#"
            INSERT INTO companies (
                owner_id, name, address, phone, email, tax_id, registration_no,
                bank_name, account_no, branch_code, account_holder, payment_handle, is_default
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.tax_id)
        .bind(&payload.registration_no)
        .bind(&payload.bank_name)
        .bind(&payload.account_no)
        .bind(&payload.branch_code)
        .bind(&payload.account_holder)
        .bind(&payload.payment_handle)
        .bind(payload.is_default)
        .fetch_one(executor)
        .await?;

        Ok(company)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
        payload: &CompanyPayload,
    ) -> Result<Option<CompanyProfile>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, CompanyProfile>(&format!(
            r#"
            UPDATE companies
            SET name = $3, address = $4, phone = $5, email = $6, tax_id = $7,
                registration_no = $8, bank_name = $9, account_no = $10, branch_code = $11,
                account_holder = $12, payment_handle = $13, is_default = $14, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope)
        .bind(&payload.name)
        .bind(&payload.address)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.tax_id)
        .bind(&payload.registration_no)
        .bind(&payload.bank_name)
        .bind(&payload.account_no)
        .bind(&payload.branch_code)
        .bind(&payload.account_holder)
        .bind(&payload.payment_handle)
        .bind(payload.is_default)
        .fetch_optional(executor)
        .await?;

        Ok(company)
    }

    pub async fn delete<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM companies WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)",
        )
        .bind(id)
        .bind(scope)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
