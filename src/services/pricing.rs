// src/services/pricing.rs

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::quotation::{DiscountType, QuotationItem, QuotationTotals, TaxBreakdownEntry};

/// Valor tributável de uma linha. Calculado UMA vez, na gravação;
/// depois disso vale o que está persistido em `amount`.
pub fn line_taxable(quantity: i32, unit_rate: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_rate
}

/// Recalcula os totais a partir das linhas persistidas.
///
/// Nunca confiamos em total vindo do cliente: a conversão em fatura e a
/// exibição do orçamento passam ambas por aqui, com a mesma semântica.
///
/// Desconto PERCENT incide sobre o agregado pós-imposto (subtotal + imposto);
/// FIXED é abatido do total em valor absoluto. O desconto não é distribuído
/// por linha.
pub fn compute_totals(
    items: &[QuotationItem],
    discount_type: DiscountType,
    discount_value: Decimal,
) -> QuotationTotals {
    let hundred = Decimal::from(100);

    let mut subtotal = Decimal::ZERO;
    let mut total_tax = Decimal::ZERO;
    let mut by_rate: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();

    for item in items {
        let taxable = item.amount;
        let tax = taxable * item.tax_rate / hundred;

        subtotal += taxable;
        total_tax += tax;

        let entry = by_rate.entry(item.tax_rate).or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += taxable;
        entry.1 += tax;
    }

    let discount_amount = match discount_type {
        DiscountType::Percent => (subtotal + total_tax) * discount_value / hundred,
        DiscountType::Fixed => discount_value,
    };

    let grand_total = subtotal + total_tax - discount_amount;

    // O agrupamento por alíquota é informativo; não participa do grand_total
    let tax_breakdown = by_rate
        .into_iter()
        .map(|(rate, (taxable, tax))| TaxBreakdownEntry { rate, taxable, tax })
        .collect();

    QuotationTotals {
        subtotal,
        total_tax,
        discount_amount,
        grand_total,
        tax_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn line(quantity: i32, unit_rate: Decimal, tax_rate: Decimal) -> QuotationItem {
        QuotationItem {
            id: Uuid::new_v4(),
            quotation_id: Uuid::new_v4(),
            item_id: None,
            model_number: None,
            name: "Linha de teste".to_string(),
            description: None,
            note: None,
            quantity,
            is_manual: true,
            unit_rate,
            tax_code: None,
            tax_rate,
            discount: Decimal::ZERO,
            amount: line_taxable(quantity, unit_rate),
        }
    }

    #[test]
    fn line_taxable_is_quantity_times_rate() {
        assert_eq!(line_taxable(2, dec!(1000)), dec!(2000));
        assert_eq!(line_taxable(3, dec!(10.50)), dec!(31.50));
        assert_eq!(line_taxable(1, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn percent_discount_applies_on_post_tax_aggregate() {
        // 2 x 1000 @ 18% de imposto, 10% de desconto:
        // subtotal 2000, imposto 360, desconto 236 (sobre 2360), total 2124
        let items = vec![line(2, dec!(1000), dec!(18))];
        let totals = compute_totals(&items, DiscountType::Percent, dec!(10));

        assert_eq!(totals.subtotal, dec!(2000));
        assert_eq!(totals.total_tax, dec!(360.00));
        assert_eq!(totals.discount_amount, dec!(236.000));
        assert_eq!(totals.grand_total, dec!(2124.000));
    }

    #[test]
    fn fixed_discount_is_taken_verbatim() {
        let items = vec![line(2, dec!(1000), dec!(18))];
        let totals = compute_totals(&items, DiscountType::Fixed, dec!(300));

        assert_eq!(totals.discount_amount, dec!(300));
        assert_eq!(totals.grand_total, dec!(2060.00));
    }

    #[test]
    fn subtotal_sums_every_line() {
        let items = vec![
            line(2, dec!(1000), dec!(18)),
            line(5, dec!(40), dec!(5)),
            line(1, dec!(99.90), dec!(0)),
        ];
        let totals = compute_totals(&items, DiscountType::Fixed, Decimal::ZERO);

        assert_eq!(totals.subtotal, dec!(2299.90));
        // 360 + 10 + 0
        assert_eq!(totals.total_tax, dec!(370.00));
        assert_eq!(totals.grand_total, dec!(2669.90));
    }

    #[test]
    fn breakdown_groups_lines_by_rate_without_touching_the_total() {
        let items = vec![
            line(2, dec!(1000), dec!(18)),
            line(1, dec!(500), dec!(18)),
            line(5, dec!(40), dec!(5)),
        ];
        let totals = compute_totals(&items, DiscountType::Percent, dec!(10));

        assert_eq!(totals.tax_breakdown.len(), 2);

        // Ordenado por alíquota crescente
        assert_eq!(totals.tax_breakdown[0].rate, dec!(5));
        assert_eq!(totals.tax_breakdown[0].taxable, dec!(200));
        assert_eq!(totals.tax_breakdown[0].tax, dec!(10.00));

        assert_eq!(totals.tax_breakdown[1].rate, dec!(18));
        assert_eq!(totals.tax_breakdown[1].taxable, dec!(2500));
        assert_eq!(totals.tax_breakdown[1].tax, dec!(450.00));

        // Soma do agrupamento bate com os agregados
        let taxable_sum: Decimal = totals.tax_breakdown.iter().map(|e| e.taxable).sum();
        let tax_sum: Decimal = totals.tax_breakdown.iter().map(|e| e.tax).sum();
        assert_eq!(taxable_sum, totals.subtotal);
        assert_eq!(tax_sum, totals.total_tax);
    }

    #[test]
    fn discount_roundtrips_from_persisted_parts() {
        // Rederivar o desconto de (tipo, valor, subtotal, imposto) devolve o
        // mesmo grand_total persistido
        let items = vec![line(3, dec!(750), dec!(12))];
        let totals = compute_totals(&items, DiscountType::Percent, dec!(7.5));

        let rederived =
            (totals.subtotal + totals.total_tax) * dec!(7.5) / Decimal::from(100);
        assert_eq!(rederived, totals.discount_amount);
        assert_eq!(
            totals.subtotal + totals.total_tax - rederived,
            totals.grand_total
        );
    }

    #[test]
    fn empty_lines_total_zero() {
        let totals = compute_totals(&[], DiscountType::Percent, dec!(10));
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.grand_total, Decimal::ZERO);
        assert!(totals.tax_breakdown.is_empty());
    }
}
