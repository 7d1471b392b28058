//! Fiscal receipt attached to payment creation requests.
//!
//! The gateway expects the receipt as compact JSON, percent-encoded as one opaque
//! value. The same encoded string is placed in the `Receipt` form field and in the
//! creation signature.
//!
//! Quantities and sums are written as JSON numbers with the exact digits of the
//! [`Decimal`], never through a float.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    codec::form::{decode_value, encode_value},
    error::{GatewayError, Result},
};

/// Structured receipt: optional tax system plus ordered line items.
///
/// # Examples
///
/// ```
/// use robokassa::codec::{Receipt, ReceiptItem, TaxRate};
/// use rust_decimal::Decimal;
///
/// let receipt = Receipt::new().with_item(ReceiptItem::new(
///     "Coffee",
///     Decimal::ONE,
///     Decimal::new(250, 0),
///     TaxRate::Vat20,
/// ));
///
/// let encoded = receipt.encode().unwrap();
/// assert_eq!(Receipt::decode(&encoded).unwrap(), receipt);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Merchant tax system; the gateway falls back to the shop default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sno: Option<TaxSystem>,
    /// Line items in the order they appear on the receipt.
    pub items: Vec<ReceiptItem>,
}

impl Receipt {
    /// Creates an empty receipt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tax system.
    #[must_use]
    pub fn with_tax_system(mut self, sno: TaxSystem) -> Self {
        self.sno = Some(sno);
        self
    }

    /// Appends a line item.
    #[must_use]
    pub fn with_item(mut self, item: ReceiptItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sum of all line sums.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.sum).sum()
    }

    /// Serializes to compact JSON and percent-encodes the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Encode`] if JSON serialization fails.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self).map_err(|e| GatewayError::Encode(e.to_string()))?;
        Ok(encode_value(&json))
    }

    /// Reverses [`Receipt::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if the decoded text is not a receipt.
    pub fn decode(encoded: &str) -> Result<Self> {
        let json = decode_value(encoded);
        serde_json::from_str(&json)
            .map_err(|e| GatewayError::InvalidInput(format!("malformed receipt: {e}")))
    }
}

/// One receipt line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Product or service name as printed on the receipt.
    pub name: String,
    /// Quantity, may be fractional for weighed goods.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
    /// Line total in major currency units.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub sum: Decimal,
    /// VAT category.
    pub tax: TaxRate,
}

impl ReceiptItem {
    /// Creates a line item.
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: Decimal, sum: Decimal, tax: TaxRate) -> Self {
        Self { name: name.into(), quantity, sum, tax }
    }
}

/// Merchant tax system (`sno`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSystem {
    /// General system.
    Osn,
    /// Simplified, income.
    UsnIncome,
    /// Simplified, income minus expenses.
    UsnIncomeOutcome,
    /// Unified agricultural tax.
    Esn,
    /// Patent system.
    Patent,
}

/// VAT category of a receipt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxRate {
    /// Not subject to VAT.
    None,
    /// 0%.
    Vat0,
    /// 10%.
    Vat10,
    /// 10/110 calculated rate.
    Vat110,
    /// 20%.
    Vat20,
    /// 20/120 calculated rate.
    Vat120,
    /// 5%.
    Vat5,
    /// 7%.
    Vat7,
    /// 5/105 calculated rate.
    Vat105,
    /// 7/107 calculated rate.
    Vat107,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample() -> Receipt {
        Receipt::new()
            .with_tax_system(TaxSystem::UsnIncome)
            .with_item(ReceiptItem::new("Кофе & булочка", dec!(2), dec!(350.5), TaxRate::Vat20))
            .with_item(ReceiptItem::new("Delivery", dec!(1), dec!(99), TaxRate::None))
    }

    #[test]
    fn test_receipt_roundtrip() {
        let receipt = sample();
        let encoded = receipt.encode().unwrap();
        assert_eq!(Receipt::decode(&encoded).unwrap(), receipt);
    }

    #[test]
    fn test_encode_is_single_opaque_value() {
        let encoded = sample().encode().unwrap();
        assert!(encoded.starts_with("%7B"));
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('='));
        assert!(!encoded.contains(' '));
    }

    #[test]
    fn test_json_shape() {
        let receipt = Receipt::new().with_item(ReceiptItem::new(
            "Tea",
            dec!(1),
            dec!(100.5),
            TaxRate::Vat10,
        ));
        let json = serde_json::to_string(&receipt).unwrap();

        assert_eq!(json, r#"{"items":[{"name":"Tea","quantity":1,"sum":100.5,"tax":"vat10"}]}"#);
    }

    #[test]
    fn test_roundtrip_keeps_digits_beyond_float_precision() {
        let receipt = Receipt::new().with_item(ReceiptItem::new(
            "Saffron",
            dec!(0.123456789012345678),
            dec!(12345678901234.56789),
            TaxRate::Vat20,
        ));

        let decoded = Receipt::decode(&receipt.encode().unwrap()).unwrap();

        assert_eq!(decoded, receipt);
        assert_eq!(decoded.items[0].quantity.to_string(), "0.123456789012345678");
    }

    #[test]
    fn test_tax_system_names() {
        let json = serde_json::to_string(&TaxSystem::UsnIncomeOutcome).unwrap();
        assert_eq!(json, "\"usn_income_outcome\"");
    }

    #[test]
    fn test_empty_receipt_roundtrip() {
        let receipt = Receipt::new();
        let encoded = receipt.encode().unwrap();
        assert_eq!(encoded, "%7B%22items%22%3A%5B%5D%7D");
        assert_eq!(Receipt::decode(&encoded).unwrap(), receipt);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = Receipt::decode("not-json").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }

    #[test]
    fn test_total() {
        assert_eq!(sample().total(), dec!(449.5));
    }

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..=i64::MAX, 0u32..=18).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
    }

    proptest! {
        #[test]
        fn test_receipt_roundtrip_exact(
            items in prop::collection::vec(("[a-zA-Zа-я0-9 &=%+]{1,24}", amount(), amount()), 0..5)
        ) {
            let receipt = items.into_iter().fold(Receipt::new(), |acc, (name, quantity, sum)| {
                acc.with_item(ReceiptItem::new(name, quantity, sum, TaxRate::Vat20))
            });

            let decoded = Receipt::decode(&receipt.encode().unwrap()).unwrap();

            prop_assert_eq!(&decoded, &receipt);
            for (back, sent) in decoded.items.iter().zip(&receipt.items) {
                prop_assert_eq!(back.quantity.to_string(), sent.quantity.to_string());
                prop_assert_eq!(back.sum.to_string(), sent.sum.to_string());
            }
        }
    }
}
