use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single transaction reconstructed from a QIF record.
///
/// Amounts are exact decimals; QIF entries without an amount are rejected at
/// parse time, so `amount` is never a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub payee: String,
    pub memo: Option<String>,
}
