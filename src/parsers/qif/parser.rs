use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::DateFormat;
use crate::errors::{ConvertError, ConvertResult};
use crate::parsers::traits::Parser;
use crate::statement::QifFile;
use crate::types::Transaction;

/// Line-record QIF parser.
///
/// A QIF file is a `!Type:` header followed by groups of tagged lines, one
/// field per line, each group terminated by `^`. Tags outside the recognized
/// set are ignored so institution-specific extensions do not break parsing.
pub struct QifParser {
    date_format: DateFormat,
}

impl QifParser {
    pub fn new(date_format: DateFormat) -> Self {
        Self { date_format }
    }

    /// Parse full file content into the statement aggregate.
    ///
    /// An empty or header-only file yields an empty transaction list; a
    /// record with an unparseable or missing date/amount fails with the
    /// offending line number.
    pub fn parse_file(&self, content: &str) -> ConvertResult<QifFile> {
        let mut account_kind = None;
        let mut transactions = Vec::new();
        let mut record = PendingRecord::default();
        let mut line_no = 0;

        for (idx, raw_line) in content.lines().enumerate() {
            line_no = idx + 1;
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('!') {
                if let Some(kind) = header.strip_prefix("Type:") {
                    account_kind = Some(kind.to_string());
                }
                continue;
            }

            if trimmed == "^" {
                if let Some(txn) = record.finish(line_no)? {
                    transactions.push(txn);
                }
                continue;
            }

            // Split on the first character's byte width so a stray BOM or
            // other multi-byte junk is ignored instead of panicking
            let first_len = trimmed.chars().next().map_or(1, char::len_utf8);
            let (tag, value) = trimmed.split_at(first_len);
            let value = value.trim();
            match tag {
                "D" => record.date = Some(self.parse_date(value, line_no)?),
                // Some exports write the amount under U instead of T
                "T" | "U" => record.amount = Some(parse_amount(value, line_no)?),
                "P" => record.payee = Some(value.to_string()),
                "M" => record.memo = Some(value.to_string()),
                "N" => record.reference = Some(value.to_string()),
                _ => {}
            }
        }

        // Trailing record without a closing separator still counts
        if let Some(txn) = record.finish(line_no)? {
            transactions.push(txn);
        }

        Ok(QifFile {
            account_kind,
            transactions,
        })
    }

    fn parse_date(&self, value: &str, line: usize) -> ConvertResult<NaiveDate> {
        self.date_format
            .parse(value)
            .map_err(|_| ConvertError::QifRecord {
                line,
                reason: format!("unparseable date {value:?}"),
            })
    }
}

impl Parser for QifParser {
    type Output = Transaction;

    fn parse(&self, content: &str) -> ConvertResult<Vec<Self::Output>> {
        self.parse_file(content).map(|file| file.transactions)
    }

    fn is_supported(filename: Option<&str>, content: &str) -> bool {
        if let Some(name) = filename {
            if name.to_lowercase().ends_with(".qif") {
                return true;
            }
        }

        let trimmed = content.trim_start();
        trimmed.starts_with("!Type:") || trimmed.starts_with("!Account")
    }
}

fn parse_amount(value: &str, line: usize) -> ConvertResult<Decimal> {
    // Thousands separators show up in some institution exports
    let clean: String = value.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&clean).map_err(|e| ConvertError::QifRecord {
        line,
        reason: format!("invalid amount {value:?}: {e}"),
    })
}

/// Fields of the record currently being accumulated.
#[derive(Default)]
struct PendingRecord {
    date: Option<NaiveDate>,
    amount: Option<Decimal>,
    payee: Option<String>,
    memo: Option<String>,
    reference: Option<String>,
}

impl PendingRecord {
    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.payee.is_none()
            && self.memo.is_none()
            && self.reference.is_none()
    }

    /// Close the record at the given line, resetting the accumulator.
    ///
    /// A separator with no preceding fields is skipped; a partial record
    /// missing its date or amount is a hard error.
    fn finish(&mut self, line: usize) -> ConvertResult<Option<Transaction>> {
        if self.is_empty() {
            return Ok(None);
        }
        let record = std::mem::take(self);

        let date = record.date.ok_or_else(|| ConvertError::QifRecord {
            line,
            reason: "record missing date field".to_string(),
        })?;
        let amount = record.amount.ok_or_else(|| ConvertError::QifRecord {
            line,
            reason: "record missing amount field".to_string(),
        })?;

        Ok(Some(Transaction {
            date,
            amount,
            payee: record.payee.unwrap_or_default(),
            memo: record.memo.or(record.reference),
        }))
    }
}
