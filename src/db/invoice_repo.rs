// src/db/invoice_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoice::{Invoice, InvoiceStatus},
};

const INVOICE_COLUMNS: &str = r#"
    id, owner_id, invoice_number, quotation_id, client_name,
    date, total_amount, status, created_at
"#;

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_quotation<'e, E>(
        &self,
        executor: E,
        quotation_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE quotation_id = $1"
        ))
        .bind(quotation_id)
        .fetch_optional(executor)
        .await?;
        Ok(invoice)
    }

    /// Insere a fatura. A corrida de duas conversões simultâneas morre aqui,
    /// na UNIQUE de quotation_id; o serviço traduz a violação em AlreadyConverted.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        invoice_number: &str,
        quotation_id: Uuid,
        client_name: &str,
        date: NaiveDate,
        total_amount: Decimal,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices (owner_id, invoice_number, quotation_id, client_name, date, total_amount, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'UNPAID')
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(invoice_number)
        .bind(quotation_id)
        .bind(client_name)
        .bind(date)
        .bind(total_amount)
        .fetch_one(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(scope)
        .fetch_all(executor)
        .await?;
        Ok(invoices)
    }

    /// A única mutação permitida numa fatura: o status de pagamento.
    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE invoices SET status = $3 WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)",
        )
        .bind(id)
        .bind(scope)
        .bind(status)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
