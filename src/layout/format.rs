//! Text formatting for amounts, quantities, dates and status colors.

use chrono::NaiveDate;

use crate::model::InvoiceStatus;
use crate::style::{palette, Color};

/// `$` and exactly two decimals: 5500 → `$5500.00`.
///
/// Half cents round away from zero (0.125 → `$0.13`), matching the amounts
/// the invoicing service displays.
pub fn currency(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    format!("${:.2}", cents / 100.0)
}

/// A reduction: 25 → `-$25.00`.
pub fn negative_currency(amount: f64) -> String {
    format!("-{}", currency(amount))
}

/// Whole quantities print without a decimal point; fractional ones print
/// their shortest form.
pub fn quantity(qty: f64) -> String {
    qty.to_string()
}

/// US month/day/year without padding: 2026-03-01 → `3/1/2026`.
pub fn date(d: NaiveDate) -> String {
    d.format("%-m/%-d/%Y").to_string()
}

/// Pill color for a status.
pub fn status_color(status: &InvoiceStatus) -> Color {
    match status {
        InvoiceStatus::Paid => palette::status_paid(),
        InvoiceStatus::Pending => palette::status_pending(),
        InvoiceStatus::Overdue => palette::status_overdue(),
        InvoiceStatus::Other(_) => palette::status_neutral(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_currency() {
        assert_eq!(currency(5500.0), "$5500.00");
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(19.5), "$19.50");
        assert_eq!(negative_currency(25.0), "-$25.00");
    }

    #[test]
    fn test_currency_rounds_half_cents_up() {
        assert_eq!(currency(0.125), "$0.13");
        assert_eq!(currency(0.375), "$0.38");
        assert_eq!(currency(0.5 * 0.25), "$0.13");
        assert_eq!(currency(2.675), "$2.67");
    }

    #[test]
    fn test_quantity() {
        assert_eq!(quantity(40.0), "40");
        assert_eq!(quantity(1.5), "1.5");
    }

    #[test]
    fn test_date() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(date(d), "3/1/2026");
        let d = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert_eq!(date(d), "12/25/2026");
    }

    #[test]
    fn test_status_color_mapping() {
        assert_eq!(status_color(&InvoiceStatus::Paid), Color::hex("#22bb33"));
        assert_eq!(status_color(&InvoiceStatus::Pending), Color::hex("#f0ad4e"));
        assert_eq!(status_color(&InvoiceStatus::Overdue), Color::hex("#d9534f"));
        assert_eq!(
            status_color(&InvoiceStatus::Other("Void".into())),
            Color::hex("#666666")
        );
    }

    proptest! {
        #[test]
        fn prop_currency_has_two_decimals(cents in 0u64..1_000_000_000) {
            let amount = cents as f64 / 100.0;
            let s = currency(amount);
            prop_assert!(s.starts_with('$'));
            let (_, decimals) = s.split_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 2);
        }
    }
}
