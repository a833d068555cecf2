// src/services/quotation_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CompanyRepository, InvoiceRepository, QuotationRepository},
    middleware::auth::AuthContext,
    models::quotation::{
        DiscountType, Quotation, QuotationDetail, QuotationItem, QuotationItemPayload,
        QuotationPayload, QuotationStatus, QuotationSummary,
    },
    services::pricing,
};

#[derive(Clone)]
pub struct QuotationService {
    quotation_repo: QuotationRepository,
    catalog_repo: CatalogRepository,
    company_repo: CompanyRepository,
    invoice_repo: InvoiceRepository,
    pool: PgPool,
}

impl QuotationService {
    pub fn new(
        quotation_repo: QuotationRepository,
        catalog_repo: CatalogRepository,
        company_repo: CompanyRepository,
        invoice_repo: InvoiceRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            quotation_repo,
            catalog_repo,
            company_repo,
            invoice_repo,
            pool,
        }
    }

    pub async fn create(
        &self,
        ctx: &AuthContext,
        payload: &QuotationPayload,
    ) -> Result<QuotationDetail, AppError> {
        validate_payload(payload)?;

        let owner_id = ctx.tenant_id();
        let status = payload.status.unwrap_or(QuotationStatus::Draft);
        let discount_type = payload.discount_type.unwrap_or(DiscountType::Percent);

        // Cabeçalho + linhas são um agregado: tudo ou nada
        let mut tx = self.pool.begin().await?;

        let client_id = self
            .resolve_client(&mut tx, owner_id, payload.client_id, &payload.client_name)
            .await?;
        let snapshot = self
            .company_snapshot(&mut tx, owner_id, payload.company_id)
            .await?;

        let quotation = self
            .quotation_repo
            .insert_header(
                &mut *tx,
                owner_id,
                client_id,
                &payload.client_name,
                payload.client_address.as_deref(),
                payload.client_tax_id.as_deref(),
                payload.date,
                status,
                discount_type,
                payload.discount_value,
                payload.notes.as_deref(),
                payload.terms.as_deref(),
                snapshot.as_ref(),
            )
            .await?;

        let items = self
            .insert_items(&mut tx, quotation.id, &payload.items)
            .await?;

        tx.commit().await?;

        let totals = pricing::compute_totals(&items, discount_type, payload.discount_value);
        Ok(QuotationDetail { quotation, items, totals })
    }

    /// Substituição completa: regrava o cabeçalho e recria as linhas.
    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        payload: &QuotationPayload,
    ) -> Result<QuotationDetail, AppError> {
        validate_payload(payload)?;

        let status = payload.status.unwrap_or(QuotationStatus::Draft);
        let discount_type = payload.discount_type.unwrap_or(DiscountType::Percent);

        let mut tx = self.pool.begin().await?;

        let existing = self
            .quotation_repo
            .find(&mut *tx, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        // Documento faturado é imutável
        self.ensure_not_invoiced(&mut tx, &existing).await?;

        let owner_id = existing.owner_id;
        let client_id = self
            .resolve_client(&mut tx, owner_id, payload.client_id, &payload.client_name)
            .await?;
        let snapshot = self
            .company_snapshot(&mut tx, owner_id, payload.company_id)
            .await?;

        let affected = self
            .quotation_repo
            .update_header(
                &mut *tx,
                ctx.scope(),
                id,
                client_id,
                &payload.client_name,
                payload.client_address.as_deref(),
                payload.client_tax_id.as_deref(),
                payload.date,
                status,
                discount_type,
                payload.discount_value,
                payload.notes.as_deref(),
                payload.terms.as_deref(),
                snapshot.as_ref(),
            )
            .await?;

        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }

        self.quotation_repo.delete_items(&mut *tx, id).await?;
        let items = self.insert_items(&mut tx, id, &payload.items).await?;

        tx.commit().await?;

        let quotation = self
            .quotation_repo
            .find(&self.pool, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        let totals = pricing::compute_totals(&items, discount_type, payload.discount_value);
        Ok(QuotationDetail { quotation, items, totals })
    }

    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .quotation_repo
            .find(&mut *tx, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        self.ensure_not_invoiced(&mut tx, &existing).await?;

        let affected = self.quotation_repo.delete(&mut *tx, ctx.scope(), id).await?;
        if affected == 0 {
            return Err(AppError::NotFoundOrForbidden);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Recria o orçamento como um DRAFT de hoje: linhas novas, mesmo desconto,
    /// mesmas observações e o mesmo snapshot da empresa. Status e vínculo de
    /// fatura ficam para trás.
    pub async fn duplicate(
        &self,
        ctx: &AuthContext,
        id: Uuid,
    ) -> Result<QuotationDetail, AppError> {
        let mut tx = self.pool.begin().await?;

        let source = self
            .quotation_repo
            .find(&mut *tx, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;
        let source_items = self.quotation_repo.items_for(&mut *tx, id).await?;

        let today = Utc::now().date_naive();
        let copy = self
            .quotation_repo
            .insert_header(
                &mut *tx,
                source.owner_id,
                source.client_id,
                &source.client_name,
                source.client_address.as_deref(),
                source.client_tax_id.as_deref(),
                today,
                QuotationStatus::Draft,
                source.discount_type,
                source.discount_value,
                source.notes.as_deref(),
                source.terms.as_deref(),
                source.company_snapshot.as_ref(),
            )
            .await?;

        let mut items = Vec::with_capacity(source_items.len());
        for item in &source_items {
            let payload = QuotationItemPayload {
                item_id: item.item_id,
                model_number: item.model_number.clone(),
                name: item.name.clone(),
                description: item.description.clone(),
                note: item.note.clone(),
                quantity: item.quantity,
                is_manual: item.is_manual,
                unit_rate: item.unit_rate,
                tax_code: item.tax_code.clone(),
                tax_rate: item.tax_rate,
                discount: item.discount,
            };
            // Mantém o valor tributável congelado da origem
            let inserted = self
                .quotation_repo
                .insert_item(&mut *tx, copy.id, &payload, item.amount)
                .await?;
            items.push(inserted);
        }

        tx.commit().await?;

        let totals =
            pricing::compute_totals(&items, copy.discount_type, copy.discount_value);
        Ok(QuotationDetail { quotation: copy, items, totals })
    }

    pub async fn get(&self, ctx: &AuthContext, id: Uuid) -> Result<QuotationDetail, AppError> {
        let quotation = self
            .quotation_repo
            .find(&self.pool, ctx.scope(), id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        let items = self.quotation_repo.items_for(&self.pool, id).await?;
        let totals =
            pricing::compute_totals(&items, quotation.discount_type, quotation.discount_value);

        Ok(QuotationDetail { quotation, items, totals })
    }

    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<QuotationSummary>, AppError> {
        self.quotation_repo.list(&self.pool, ctx.scope()).await
    }

    // --- Helpers ---

    async fn insert_items(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        quotation_id: Uuid,
        payloads: &[QuotationItemPayload],
    ) -> Result<Vec<QuotationItem>, AppError> {
        let mut items = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let amount = pricing::line_taxable(payload.quantity, payload.unit_rate);
            let item = self
                .quotation_repo
                .insert_item(&mut **tx, quotation_id, payload, amount)
                .await?;
            items.push(item);
        }
        Ok(items)
    }

    /// Cliente explícito é verificado dentro do tenant; sem id, o nome vira
    /// um cadastro implícito (upsert) no catálogo do tenant.
    async fn resolve_client(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner_id: Uuid,
        client_id: Option<Uuid>,
        client_name: &str,
    ) -> Result<Option<Uuid>, AppError> {
        match client_id {
            Some(id) => {
                let found = self
                    .catalog_repo
                    .find_client(&mut **tx, Some(owner_id), id)
                    .await?
                    .ok_or(AppError::NotFoundOrForbidden)?;
                Ok(Some(found.id))
            }
            None => {
                let client = self
                    .catalog_repo
                    .upsert_client_minimal(&mut **tx, owner_id, client_name)
                    .await?;
                Ok(Some(client.id))
            }
        }
    }

    /// Congela o perfil da empresa no documento. Edições futuras do perfil
    /// nunca alteram orçamentos já salvos.
    async fn company_snapshot(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        owner_id: Uuid,
        company_id: Option<Uuid>,
    ) -> Result<Option<Value>, AppError> {
        let profile = match company_id {
            Some(id) => Some(
                self.company_repo
                    .find(&mut **tx, Some(owner_id), id)
                    .await?
                    .ok_or(AppError::NotFoundOrForbidden)?,
            ),
            None => self.company_repo.find_default(&mut **tx, owner_id).await?,
        };

        match profile {
            Some(company) => Ok(Some(
                serde_json::to_value(&company).map_err(|e| anyhow::anyhow!(e))?,
            )),
            None => Ok(None),
        }
    }

    async fn ensure_not_invoiced(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        quotation: &Quotation,
    ) -> Result<(), AppError> {
        if quotation.status != QuotationStatus::Invoiced {
            return Ok(());
        }
        match self
            .invoice_repo
            .find_by_quotation(&mut **tx, quotation.id)
            .await?
        {
            Some(invoice) => Err(AppError::AlreadyConverted { invoice_id: invoice.id }),
            None => Err(AppError::InvalidPayload(
                "Orçamento já faturado não pode ser alterado.".to_string(),
            )),
        }
    }
}

/// Regras que o `validator` derive não cobre: coerência de status e
/// não-negatividade dos campos numéricos.
fn validate_payload(payload: &QuotationPayload) -> Result<(), AppError> {
    if payload.status == Some(QuotationStatus::Invoiced) {
        return Err(AppError::InvalidPayload(
            "O status INVOICED só é atribuído pela conversão em fatura.".to_string(),
        ));
    }

    let status = payload.status.unwrap_or(QuotationStatus::Draft);
    if status != QuotationStatus::Draft && payload.items.is_empty() {
        return Err(AppError::InvalidPayload(
            "Orçamento fora de rascunho precisa de ao menos um item.".to_string(),
        ));
    }

    ensure_non_negative("discountValue", payload.discount_value)?;
    for item in &payload.items {
        ensure_non_negative("unitRate", item.unit_rate)?;
        ensure_non_negative("taxRate", item.tax_rate)?;
        ensure_non_negative("discount", item.discount)?;
    }

    Ok(())
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::InvalidPayload(format!(
            "O campo '{}' não pode ser negativo.",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn base_payload() -> QuotationPayload {
        QuotationPayload {
            client_id: None,
            client_name: "Cliente Teste".to_string(),
            client_address: None,
            client_tax_id: None,
            date: NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            status: None,
            discount_type: None,
            discount_value: Decimal::ZERO,
            notes: None,
            terms: None,
            company_id: None,
            items: vec![],
        }
    }

    #[test]
    fn direct_invoiced_status_is_refused() {
        let mut payload = base_payload();
        payload.status = Some(QuotationStatus::Invoiced);
        assert!(matches!(
            validate_payload(&payload),
            Err(AppError::InvalidPayload(_))
        ));
    }

    #[test]
    fn non_draft_needs_at_least_one_line() {
        let mut payload = base_payload();
        payload.status = Some(QuotationStatus::Sent);
        assert!(matches!(
            validate_payload(&payload),
            Err(AppError::InvalidPayload(_))
        ));

        // Rascunho vazio é transitório e permitido
        payload.status = Some(QuotationStatus::Draft);
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn negative_numerics_are_refused() {
        let mut payload = base_payload();
        payload.discount_value = dec!(-1);
        assert!(validate_payload(&payload).is_err());

        let mut payload = base_payload();
        payload.items.push(QuotationItemPayload {
            item_id: None,
            model_number: None,
            name: "Linha".to_string(),
            description: None,
            note: None,
            quantity: 1,
            is_manual: true,
            unit_rate: dec!(-10),
            tax_code: None,
            tax_rate: Decimal::ZERO,
            discount: Decimal::ZERO,
        });
        assert!(validate_payload(&payload).is_err());
    }
}
