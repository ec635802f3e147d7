use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ConvertError, ConvertResult};
use crate::types::Transaction;

/// A parsed QIF statement: the transactions in file order plus the header
/// metadata. Constructed once per input file and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QifFile {
    /// Account kind from the `!Type:` header, e.g. `Bank` or `CCard`.
    pub account_kind: Option<String>,
    pub transactions: Vec<Transaction>,
}

impl QifFile {
    /// Exact decimal sum of all transaction amounts.
    ///
    /// The caller adds the opening balance to obtain the closing ledger
    /// balance. Always computed over the parsed amounts; account-type sign
    /// inversion happens downstream in the mapper and does not feed back
    /// into this sum.
    pub fn balance(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// Earliest transaction date, used as the statement range start.
    pub fn first_transaction_date(&self) -> ConvertResult<NaiveDate> {
        self.transactions
            .iter()
            .map(|t| t.date)
            .min()
            .ok_or(ConvertError::EmptyStatement)
    }

    /// Latest transaction date: statement range end and ledger as-of date.
    pub fn last_transaction_date(&self) -> ConvertResult<NaiveDate> {
        self.transactions
            .iter()
            .map(|t| t.date)
            .max()
            .ok_or(ConvertError::EmptyStatement)
    }
}
