//! OFX 2 output object model.
//!
//! Field order inside each struct matches the element order the OFX schema
//! expects; quick-xml serializes fields in declaration order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::ConvertOptions;

/// Quicken rejects sign-on blocks without a numeric FID.
pub const INSTITUTION_FID: &str = "666";

#[derive(Debug, Clone, Serialize)]
#[serde(rename = "OFX")]
pub struct OfxDocument {
    #[serde(rename = "SIGNONMSGSRSV1")]
    pub signon: SignonMsgs,
    #[serde(rename = "BANKMSGSRSV1", skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankMsgs>,
    #[serde(rename = "CREDITCARDMSGSRSV1", skip_serializing_if = "Option::is_none")]
    pub creditcard: Option<CreditCardMsgs>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignonMsgs {
    #[serde(rename = "SONRS")]
    pub sonrs: SignonResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignonResponse {
    #[serde(rename = "STATUS")]
    pub status: Status,
    #[serde(rename = "DTSERVER")]
    pub dtserver: String,
    #[serde(rename = "LANGUAGE")]
    pub language: String,
    #[serde(rename = "FI")]
    pub fi: FinancialInstitution,
}

#[derive(Debug, Clone, Serialize)]
pub struct Status {
    #[serde(rename = "CODE")]
    pub code: i32,
    #[serde(rename = "SEVERITY")]
    pub severity: String,
}

impl Status {
    pub fn ok() -> Self {
        Self {
            code: 0,
            severity: "INFO".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialInstitution {
    #[serde(rename = "ORG")]
    pub org: String,
    #[serde(rename = "FID")]
    pub fid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankMsgs {
    #[serde(rename = "STMTTRNRS")]
    pub stmttrnrs: StmtTrnRs,
}

#[derive(Debug, Clone, Serialize)]
pub struct StmtTrnRs {
    #[serde(rename = "TRNUID")]
    pub trnuid: String,
    #[serde(rename = "STATUS")]
    pub status: Status,
    #[serde(rename = "STMTRS")]
    pub stmtrs: StmtRs,
}

#[derive(Debug, Clone, Serialize)]
pub struct StmtRs {
    #[serde(rename = "CURDEF")]
    pub curdef: String,
    #[serde(rename = "BANKACCTFROM")]
    pub bankacctfrom: BankAcctFrom,
    #[serde(rename = "BANKTRANLIST")]
    pub banktranlist: BankTranList,
    #[serde(rename = "LEDGERBAL")]
    pub ledgerbal: LedgerBal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankAcctFrom {
    #[serde(rename = "BANKID")]
    pub bankid: String,
    #[serde(rename = "ACCTID")]
    pub acctid: String,
    #[serde(rename = "ACCTTYPE")]
    pub accttype: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditCardMsgs {
    #[serde(rename = "CCSTMTTRNRS")]
    pub ccstmttrnrs: CcStmtTrnRs,
}

#[derive(Debug, Clone, Serialize)]
pub struct CcStmtTrnRs {
    #[serde(rename = "TRNUID")]
    pub trnuid: String,
    #[serde(rename = "STATUS")]
    pub status: Status,
    #[serde(rename = "CCSTMTRS")]
    pub ccstmtrs: CcStmtRs,
}

#[derive(Debug, Clone, Serialize)]
pub struct CcStmtRs {
    #[serde(rename = "CURDEF")]
    pub curdef: String,
    #[serde(rename = "CCACCTFROM")]
    pub ccacctfrom: CcAcctFrom,
    #[serde(rename = "BANKTRANLIST")]
    pub banktranlist: BankTranList,
    #[serde(rename = "LEDGERBAL")]
    pub ledgerbal: LedgerBal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CcAcctFrom {
    #[serde(rename = "ACCTID")]
    pub acctid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankTranList {
    #[serde(rename = "DTSTART")]
    pub dtstart: String,
    #[serde(rename = "DTEND")]
    pub dtend: String,
    #[serde(rename = "STMTTRN")]
    pub transactions: Vec<StmtTrn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StmtTrn {
    #[serde(rename = "TRNTYPE")]
    pub trntype: String,
    #[serde(rename = "DTPOSTED")]
    pub dtposted: String,
    #[serde(rename = "TRNAMT", with = "rust_decimal::serde::str")]
    pub trnamt: Decimal,
    #[serde(rename = "FITID")]
    pub fitid: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "MEMO", skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerBal {
    #[serde(rename = "BALAMT", with = "rust_decimal::serde::str")]
    pub balamt: Decimal,
    #[serde(rename = "DTASOF")]
    pub dtasof: String,
}

/// OFX date-time form of a day-granularity date.
pub fn ofx_date(date: NaiveDate) -> String {
    format!("{}000000", date.format("%Y%m%d"))
}

/// Current UTC time in OFX date-time form, for DTSERVER.
pub fn ofx_now() -> String {
    chrono::Utc::now().format("%Y%m%d%H%M%S").to_string()
}

/// Statement fields that vary between the two wrapper variants.
pub struct StatementBody {
    pub transactions: Vec<StmtTrn>,
    pub dtstart: NaiveDate,
    pub dtend: NaiveDate,
    pub balamt: Decimal,
}

impl OfxDocument {
    /// Assemble a complete response document for one statement.
    ///
    /// Savings accounts get the bank wrapper (routing id required), all other
    /// account types the credit-card wrapper. The transaction list itself is
    /// identical in both.
    pub fn statement(opts: &ConvertOptions, body: StatementBody, dtserver: String) -> Self {
        let banktranlist = BankTranList {
            dtstart: ofx_date(body.dtstart),
            dtend: ofx_date(body.dtend),
            transactions: body.transactions,
        };
        let ledgerbal = LedgerBal {
            balamt: body.balamt,
            dtasof: ofx_date(body.dtend),
        };

        let signon = SignonMsgs {
            sonrs: SignonResponse {
                status: Status::ok(),
                dtserver,
                language: "ENG".to_string(),
                fi: FinancialInstitution {
                    org: opts.org.clone(),
                    fid: INSTITUTION_FID.to_string(),
                },
            },
        };

        let (bank, creditcard) = if opts.accttype.uses_bank_wrapper() {
            let bank = BankMsgs {
                stmttrnrs: StmtTrnRs {
                    trnuid: opts.trnuid.clone(),
                    status: Status::ok(),
                    stmtrs: StmtRs {
                        curdef: opts.currency.clone(),
                        bankacctfrom: BankAcctFrom {
                            bankid: opts.bankid.clone(),
                            acctid: opts.acctid.clone(),
                            accttype: "SAVINGS".to_string(),
                        },
                        banktranlist,
                        ledgerbal,
                    },
                },
            };
            (Some(bank), None)
        } else {
            let creditcard = CreditCardMsgs {
                ccstmttrnrs: CcStmtTrnRs {
                    trnuid: opts.trnuid.clone(),
                    status: Status::ok(),
                    ccstmtrs: CcStmtRs {
                        curdef: opts.currency.clone(),
                        ccacctfrom: CcAcctFrom {
                            acctid: opts.acctid.clone(),
                        },
                        banktranlist,
                        ledgerbal,
                    },
                },
            };
            (None, Some(creditcard))
        };

        OfxDocument {
            signon,
            bank,
            creditcard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountType;
    use rust_decimal_macros::dec;

    fn body() -> StatementBody {
        StatementBody {
            transactions: vec![],
            dtstart: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            dtend: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            balamt: dec!(70.00),
        }
    }

    #[test]
    fn test_ofx_date_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(ofx_date(date), "20240301000000");
    }

    #[test]
    fn test_savings_selects_bank_wrapper() {
        let opts = ConvertOptions {
            accttype: AccountType::Savings,
            ..ConvertOptions::default()
        };
        let doc = OfxDocument::statement(&opts, body(), ofx_date(body().dtend));
        assert!(doc.bank.is_some());
        assert!(doc.creditcard.is_none());

        let stmtrs = &doc.bank.unwrap().stmttrnrs.stmtrs;
        assert_eq!(stmtrs.bankacctfrom.bankid, "123456789");
        assert_eq!(stmtrs.bankacctfrom.accttype, "SAVINGS");
    }

    #[test]
    fn test_credit_card_selects_cc_wrapper() {
        let opts = ConvertOptions::default();
        let doc = OfxDocument::statement(&opts, body(), ofx_date(body().dtend));
        assert!(doc.bank.is_none());

        let ccstmtrs = doc.creditcard.unwrap().ccstmttrnrs.ccstmtrs;
        assert_eq!(ccstmtrs.ccacctfrom.acctid, "Main");
        assert_eq!(ccstmtrs.ledgerbal.balamt, dec!(70.00));
        assert_eq!(ccstmtrs.ledgerbal.dtasof, "20240302000000");
    }
}
