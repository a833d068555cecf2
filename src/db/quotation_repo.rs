// src/db/quotation_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quotation::{
        DiscountType, Quotation, QuotationItem, QuotationItemPayload, QuotationStatus,
        QuotationSummary,
    },
};

const QUOTATION_COLUMNS: &str = r#"
    id, owner_id, client_id, client_name, client_address, client_tax_id,
    date, status, discount_type, discount_value, notes, terms,
    company_snapshot, created_at, updated_at
"#;

// Repositório do agregado orçamento (cabeçalho + linhas).
// Os métodos recebem um Executor para que o serviço controle a transação:
// cabeçalho e linhas nunca são gravados fora de um mesmo `begin`/`commit`.
#[derive(Clone)]
pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_header<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        client_id: Option<Uuid>,
        client_name: &str,
        client_address: Option<&str>,
        client_tax_id: Option<&str>,
        date: NaiveDate,
        status: QuotationStatus,
        discount_type: DiscountType,
        discount_value: Decimal,
        notes: Option<&str>,
        terms: Option<&str>,
        company_snapshot: Option<&Value>,
    ) -> Result<Quotation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, Quotation>(&format!(
            r#"
            INSERT INTO quotations (
                owner_id, client_id, client_name, client_address, client_tax_id,
                date, status, discount_type, discount_value, notes, terms, company_snapshot
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {QUOTATION_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(client_id)
        .bind(client_name)
        .bind(client_address)
        .bind(client_tax_id)
        .bind(date)
        .bind(status)
        .bind(discount_type)
        .bind(discount_value)
        .bind(notes)
        .bind(terms)
        .bind(company_snapshot)
        .fetch_one(executor)
        .await?;

        Ok(quotation)
    }

    /// Atualização do cabeçalho, com a verificação de tenant embutida no WHERE.
    /// Zero linhas afetadas = não existe ou não é seu (indistinguível de propósito).
    #[allow(clippy::too_many_arguments)]
    pub async fn update_header<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
        client_id: Option<Uuid>,
        client_name: &str,
        client_address: Option<&str>,
        client_tax_id: Option<&str>,
        date: NaiveDate,
        status: QuotationStatus,
        discount_type: DiscountType,
        discount_value: Decimal,
        notes: Option<&str>,
        terms: Option<&str>,
        company_snapshot: Option<&Value>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE quotations
            SET client_id = $3, client_name = $4, client_address = $5, client_tax_id = $6,
                date = $7, status = $8, discount_type = $9, discount_value = $10,
                notes = $11, terms = $12, company_snapshot = $13, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .bind(client_id)
        .bind(client_name)
        .bind(client_address)
        .bind(client_tax_id)
        .bind(date)
        .bind(status)
        .bind(discount_type)
        .bind(discount_value)
        .bind(notes)
        .bind(terms)
        .bind(company_snapshot)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insere uma linha. `amount` chega calculado pelo serviço (quantity * unit_rate)
    /// e fica congelado no banco.
    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        quotation_id: Uuid,
        item: &QuotationItemPayload,
        amount: Decimal,
    ) -> Result<QuotationItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, QuotationItem>(
            r#"
            INSERT INTO quotation_items (
                quotation_id, item_id, model_number, name, description, note,
                quantity, is_manual, unit_rate, tax_code, tax_rate, discount, amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, quotation_id, item_id, model_number, name, description, note,
                      quantity, is_manual, unit_rate, tax_code, tax_rate, discount, amount
            "#,
        )
        .bind(quotation_id)
        .bind(item.item_id)
        .bind(&item.model_number)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.note)
        .bind(item.quantity)
        .bind(item.is_manual)
        .bind(item.unit_rate)
        .bind(&item.tax_code)
        .bind(item.tax_rate)
        .bind(item.discount)
        .bind(amount)
        .fetch_one(executor)
        .await?;

        Ok(row)
    }

    pub async fn delete_items<'e, E>(
        &self,
        executor: E,
        quotation_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM quotation_items WHERE quotation_id = $1")
            .bind(quotation_id)
            .execute(executor)
            .await?;
        Ok(())
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
        // As linhas caem junto pelo ON DELETE CASCADE
        let result = sqlx::query(
            "DELETE FROM quotations WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)",
        )
        .bind(id)
        .bind(scope)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Quotation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotation = sqlx::query_as::<_, Quotation>(&format!(
            r#"
            SELECT {QUOTATION_COLUMNS}
            FROM quotations
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#
        ))
        .bind(id)
        .bind(scope)
        .fetch_optional(executor)
        .await?;
        Ok(quotation)
    }

    pub async fn items_for<'e, E>(
        &self,
        executor: E,
        quotation_id: Uuid,
    ) -> Result<Vec<QuotationItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, QuotationItem>(
            r#"
            SELECT id, quotation_id, item_id, model_number, name, description, note,
                   quantity, is_manual, unit_rate, tax_code, tax_rate, discount, amount
            FROM quotation_items
            WHERE quotation_id = $1
            ORDER BY id
            "#,
        )
        .bind(quotation_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
    ) -> Result<Vec<QuotationSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summaries = sqlx::query_as::<_, QuotationSummary>(
            r#"
            SELECT q.id, q.owner_id, q.client_id, q.client_name, q.date, q.status,
                   q.discount_type, q.discount_value,
                   count(qi.id) AS item_count,
                   q.created_at
            FROM quotations q
            LEFT JOIN quotation_items qi ON q.id = qi.quotation_id
            WHERE ($1::uuid IS NULL OR q.owner_id = $1)
            GROUP BY q.id
            ORDER BY q.date DESC, q.created_at DESC
            "#,
        )
        .bind(scope)
        .fetch_all(executor)
        .await?;
        Ok(summaries)
    }

    /// Usado apenas pela conversão para cravar o estado terminal INVOICED.
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: QuotationStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE quotations SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }
}
