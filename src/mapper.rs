use std::fmt;

use rust_decimal::Decimal;

use crate::config::AccountType;
use crate::fitid::derive_fitid;
use crate::ofx::model::{StmtTrn, ofx_date};
use crate::statement::QifFile;
use crate::types::Transaction;

/// Spurious token some institution exports inject into payee text.
const PAYEE_ARTIFACT: &str = "036";

/// OFX transaction type, classified from the final signed amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrnType {
    Debit,
    Credit,
}

impl TrnType {
    /// Negative amounts are debits; zero counts as a credit.
    pub fn classify(amount: Decimal) -> Self {
        if amount < Decimal::ZERO {
            TrnType::Debit
        } else {
            TrnType::Credit
        }
    }
}

impl fmt::Display for TrnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrnType::Debit => f.write_str("DEBIT"),
            TrnType::Credit => f.write_str("CREDIT"),
        }
    }
}

/// Strip the institution artifact from payee text and trim what it leaves
/// behind at the end.
pub fn normalize_payee(raw: &str) -> String {
    raw.replace(PAYEE_ARTIFACT, "").trim_end().to_string()
}

/// Map one parsed transaction into an OFX statement record.
///
/// Savings accounts carry the inverted QIF sign convention, so the amount is
/// negated first; classification and FITID derivation both see the final
/// signed amount and the normalized payee.
pub fn map_transaction(txn: &Transaction, accttype: AccountType) -> StmtTrn {
    let amount = if accttype.inverts_sign() {
        -txn.amount
    } else {
        txn.amount
    };
    let name = normalize_payee(&txn.payee);
    let dtposted = ofx_date(txn.date);
    let fitid = derive_fitid(&dtposted, &amount.to_string(), &name);

    StmtTrn {
        trntype: TrnType::classify(amount).to_string(),
        dtposted,
        trnamt: amount,
        fitid,
        name,
        memo: txn.memo.clone(),
    }
}

/// Map a whole statement, preserving file order.
pub fn map_transactions(file: &QifFile, accttype: AccountType) -> Vec<StmtTrn> {
    file.transactions
        .iter()
        .map(|txn| map_transaction(txn, accttype))
        .collect()
}
