// src/services/invoice_service.rs

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, QuotationRepository},
    middleware::auth::AuthContext,
    models::invoice::{Invoice, InvoiceStatus},
    models::quotation::QuotationStatus,
    services::pricing,
};

#[derive(Clone)]
pub struct InvoiceService {
    invoice_repo: InvoiceRepository,
    quotation_repo: QuotationRepository,
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(
        invoice_repo: InvoiceRepository,
        quotation_repo: QuotationRepository,
        pool: PgPool,
    ) -> Self {
        Self { invoice_repo, quotation_repo, pool }
    }

    /// Conversão orçamento → fatura. Um caminho só, uma vez só:
    /// o total é recalculado das linhas persistidas (nunca vem do cliente),
    /// e fatura + status INVOICED são gravados na mesma transação.
    pub async fn convert(&self, ctx: &AuthContext, quotation_id: Uuid) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;

        let quotation = self
            .quotation_repo
            .find(&mut *tx, ctx.scope(), quotation_id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        if let Some(existing) = self
            .invoice_repo
            .find_by_quotation(&mut *tx, quotation_id)
            .await?
        {
            return Err(AppError::AlreadyConverted { invoice_id: existing.id });
        }

        let items = self.quotation_repo.items_for(&mut *tx, quotation_id).await?;
        let totals =
            pricing::compute_totals(&items, quotation.discount_type, quotation.discount_value);

        let today = Utc::now().date_naive();
        let number = invoice_number(today, quotation_id);

        let inserted = self
            .invoice_repo
            .insert(
                &mut *tx,
                quotation.owner_id,
                &number,
                quotation_id,
                &quotation.client_name,
                today,
                totals.grand_total,
            )
            .await;

        let invoice = match inserted {
            Ok(invoice) => invoice,
            // Duas conversões simultâneas: a segunda esbarra na UNIQUE de
            // quotation_id. Desfaz tudo e reporta a fatura vencedora.
            Err(AppError::DatabaseError(sqlx::Error::Database(db_err)))
                if db_err.is_unique_violation() =>
            {
                tx.rollback().await?;
                let existing = self
                    .invoice_repo
                    .find_by_quotation(&self.pool, quotation_id)
                    .await?
                    .ok_or(AppError::NotFoundOrForbidden)?;
                return Err(AppError::AlreadyConverted { invoice_id: existing.id });
            }
            Err(e) => return Err(e),
        };

        self.quotation_repo
            .set_status(&mut *tx, quotation_id, QuotationStatus::Invoiced)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🧾 Orçamento {} convertido na fatura {}",
            quotation_id,
            invoice.invoice_number
        );

        Ok(invoice)
    }

    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<Invoice>, AppError> {
        self.invoice_repo.list(&self.pool, ctx.scope()).await
    }

    pub async fn set_status(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        status: InvoiceStatus,
    ) -> Result<(), AppError> {
        let affected = self
            .invoice_repo
            .set_status(&self.pool, ctx.scope(), id, status)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }
        Ok(())
    }
}

/// Número determinístico: ano-mês da emissão + prefixo do uuid do orçamento.
/// Único porque cada orçamento gera no máximo uma fatura; rastreável porque
/// o sufixo aponta de volta para o orçamento.
fn invoice_number(date: NaiveDate, quotation_id: Uuid) -> String {
    let short = quotation_id.simple().to_string();
    format!("INV-{}{:02}-{}", date.year(), date.month(), &short[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_has_period_and_quotation_prefix() {
        let id = Uuid::parse_str("3f2a91bc-0000-4000-8000-000000000000").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(invoice_number(date, id), "INV-202608-3f2a91bc");
    }

    #[test]
    fn invoice_number_zero_pads_the_month() {
        let id = Uuid::parse_str("abcdef01-0000-4000-8000-000000000000").unwrap();
        let date = NaiveDate::from_ymd_opt(2027, 1, 31).unwrap();
        assert_eq!(invoice_number(date, id), "INV-202701-abcdef01");
    }

    #[test]
    fn distinct_quotations_yield_distinct_numbers() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let a = invoice_number(date, Uuid::new_v4());
        let b = invoice_number(date, Uuid::new_v4());
        assert_ne!(a, b);
    }
}
