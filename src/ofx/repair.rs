//! Regenerate FITIDs inside an existing OFX document.
//!
//! Degenerate entry point into the same identifier rule the conversion path
//! uses: each STMTTRN's identifier is recomputed from its already-serialized
//! DTPOSTED/TRNAMT/NAME text and the document is re-emitted through the
//! shared writer. Every other transaction field passes through verbatim.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use super::model::{self, OfxDocument, StatementBody, ofx_now};
use super::writer;
use crate::config::{AccountType, ConvertOptions};
use crate::errors::{ConvertError, ConvertResult};
use crate::fitid::derive_fitid;

#[derive(Debug, Deserialize)]
struct OfxXml {
    #[serde(rename = "SIGNONMSGSRSV1", default)]
    signon: Option<SignonMsgsXml>,
    #[serde(rename = "BANKMSGSRSV1", default)]
    bank_msgs: Option<BankMsgsXml>,
    #[serde(rename = "CREDITCARDMSGSRSV1", default)]
    cc_msgs: Option<CcMsgsXml>,
}

#[derive(Debug, Deserialize)]
struct SignonMsgsXml {
    #[serde(rename = "SONRS")]
    sonrs: SonrsXml,
}

#[derive(Debug, Deserialize)]
struct SonrsXml {
    #[serde(rename = "DTSERVER", default)]
    dtserver: Option<String>,
    #[serde(rename = "FI", default)]
    fi: Option<FiXml>,
}

#[derive(Debug, Deserialize)]
struct FiXml {
    #[serde(rename = "ORG", default)]
    org: Option<String>,
    #[serde(rename = "FID", default)]
    fid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BankMsgsXml {
    #[serde(rename = "STMTTRNRS")]
    stmt_trn_rs: StmtTrnRsXml,
}

#[derive(Debug, Deserialize)]
struct CcMsgsXml {
    #[serde(rename = "CCSTMTTRNRS")]
    cc_stmt_trn_rs: CcStmtTrnRsXml,
}

#[derive(Debug, Deserialize)]
struct StmtTrnRsXml {
    #[serde(rename = "TRNUID", default)]
    trnuid: Option<String>,
    #[serde(rename = "STMTRS")]
    stmt_rs: StmtRsXml,
}

#[derive(Debug, Deserialize)]
struct CcStmtTrnRsXml {
    #[serde(rename = "TRNUID", default)]
    trnuid: Option<String>,
    #[serde(rename = "CCSTMTRS")]
    cc_stmt_rs: StmtRsXml,
}

#[derive(Debug, Deserialize)]
struct StmtRsXml {
    #[serde(rename = "CURDEF", default)]
    curdef: Option<String>,
    #[serde(rename = "BANKACCTFROM", default)]
    bankacctfrom: Option<AcctFromXml>,
    #[serde(rename = "CCACCTFROM", default)]
    ccacctfrom: Option<AcctFromXml>,
    #[serde(rename = "BANKTRANLIST")]
    banktranlist: TranListXml,
    #[serde(rename = "LEDGERBAL", default)]
    ledgerbal: Option<LedgerBalXml>,
}

#[derive(Debug, Deserialize)]
struct AcctFromXml {
    #[serde(rename = "BANKID", default)]
    bankid: Option<String>,
    #[serde(rename = "ACCTID", default)]
    acctid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranListXml {
    #[serde(rename = "DTSTART", default)]
    dtstart: Option<String>,
    #[serde(rename = "DTEND", default)]
    dtend: Option<String>,
    #[serde(rename = "STMTTRN", default)]
    transactions: Vec<StmtTrnXml>,
}

#[derive(Debug, Deserialize)]
struct StmtTrnXml {
    #[serde(rename = "TRNTYPE")]
    trn_type: String,
    #[serde(rename = "DTPOSTED")]
    dt_posted: String,
    #[serde(rename = "TRNAMT")]
    amount: String,
    #[serde(rename = "NAME", default)]
    name: Option<String>,
    #[serde(rename = "MEMO", default)]
    memo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LedgerBalXml {
    #[serde(rename = "BALAMT")]
    balamt: String,
    #[serde(rename = "DTASOF", default)]
    dtasof: Option<String>,
}

fn parse_document(content: &str) -> ConvertResult<OfxXml> {
    let start = content
        .find("<OFX>")
        .ok_or_else(|| ConvertError::OfxParseFailed("missing <OFX> tag".to_string()))?;
    // The closing tag must follow the opening one; searching the whole
    // content could match a stray </OFX> earlier in the stream
    let end = content[start..]
        .find("</OFX>")
        .map(|i| start + i)
        .ok_or_else(|| ConvertError::OfxParseFailed("missing </OFX> tag".to_string()))?;
    let slice = &content[start..end + "</OFX>".len()];

    serde_xml_rs::from_str(slice).map_err(|e| ConvertError::OfxParseFailed(e.to_string()))
}

fn parse_decimal(raw: &str) -> ConvertResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| ConvertError::OfxParseFailed(format!("invalid amount {raw:?}: {e}")))
}

/// Re-derive every FITID in an existing OFX document and re-emit it.
///
/// Fields the document already carries (org, fid, server timestamp, currency,
/// account ids, trnuid, date range, ledger balance) win over the supplied
/// options; the options only fill gaps. A document without a statement
/// section is rejected.
pub fn repair_fitids(content: &str, opts: &ConvertOptions) -> ConvertResult<String> {
    let ofx = parse_document(content)?;

    let parsed_org = ofx
        .signon
        .as_ref()
        .and_then(|s| s.sonrs.fi.as_ref())
        .and_then(|fi| fi.org.clone());
    let parsed_fid = ofx
        .signon
        .as_ref()
        .and_then(|s| s.sonrs.fi.as_ref())
        .and_then(|fi| fi.fid.clone());
    let dtserver = ofx
        .signon
        .as_ref()
        .and_then(|s| s.sonrs.dtserver.clone())
        .unwrap_or_else(ofx_now);

    let (accttype, trnuid, stmt) = if let Some(bank) = ofx.bank_msgs {
        (
            AccountType::Savings,
            bank.stmt_trn_rs.trnuid,
            bank.stmt_trn_rs.stmt_rs,
        )
    } else if let Some(cc) = ofx.cc_msgs {
        (
            AccountType::CreditCard,
            cc.cc_stmt_trn_rs.trnuid,
            cc.cc_stmt_trn_rs.cc_stmt_rs,
        )
    } else {
        return Err(ConvertError::MissingStatement);
    };

    if stmt.banktranlist.transactions.is_empty() {
        return Err(ConvertError::EmptyStatement);
    }

    let mut transactions = Vec::with_capacity(stmt.banktranlist.transactions.len());
    for raw in &stmt.banktranlist.transactions {
        let name = raw.name.clone().unwrap_or_default();
        let fitid = derive_fitid(&raw.dt_posted, &raw.amount, &name);
        transactions.push(model::StmtTrn {
            trntype: raw.trn_type.clone(),
            dtposted: raw.dt_posted.clone(),
            trnamt: parse_decimal(&raw.amount)?,
            fitid,
            name,
            memo: raw.memo.clone(),
        });
    }

    let acctfrom = stmt.bankacctfrom.as_ref().or(stmt.ccacctfrom.as_ref());
    let resolved = ConvertOptions {
        org: parsed_org.unwrap_or_else(|| opts.org.clone()),
        currency: stmt.curdef.clone().unwrap_or_else(|| opts.currency.clone()),
        acctid: acctfrom
            .and_then(|a| a.acctid.clone())
            .unwrap_or_else(|| opts.acctid.clone()),
        bankid: acctfrom
            .and_then(|a| a.bankid.clone())
            .unwrap_or_else(|| opts.bankid.clone()),
        trnuid: trnuid.unwrap_or_else(|| opts.trnuid.clone()),
        accttype,
        ..opts.clone()
    };

    let dtstart = stmt
        .banktranlist
        .dtstart
        .clone()
        .unwrap_or_else(|| transactions[0].dtposted.clone());
    let dtend = stmt
        .banktranlist
        .dtend
        .clone()
        .unwrap_or_else(|| transactions[transactions.len() - 1].dtposted.clone());

    let balamt = match &stmt.ledgerbal {
        Some(bal) => parse_decimal(&bal.balamt)?,
        None => transactions.iter().map(|t| t.trnamt).sum(),
    };
    let dtasof = stmt
        .ledgerbal
        .as_ref()
        .and_then(|bal| bal.dtasof.clone())
        .unwrap_or_else(|| dtend.clone());

    let passthrough = Passthrough {
        dtstart,
        dtend,
        dtasof,
        dtserver,
        fid: parsed_fid,
    };
    let document = rebuild(&resolved, transactions, balamt, passthrough);
    writer::render(&document)
}

/// Source-document fields carried into the rebuilt output verbatim.
struct Passthrough {
    dtstart: String,
    dtend: String,
    dtasof: String,
    dtserver: String,
    fid: Option<String>,
}

/// Reassemble the document with the original serialized date strings kept
/// intact (the model's date-typed constructor would reformat them).
fn rebuild(
    opts: &ConvertOptions,
    transactions: Vec<model::StmtTrn>,
    balamt: Decimal,
    passthrough: Passthrough,
) -> OfxDocument {
    // Placeholder dates; overwritten below with the passthrough strings.
    let placeholder = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let mut document = OfxDocument::statement(
        opts,
        StatementBody {
            transactions,
            dtstart: placeholder,
            dtend: placeholder,
            balamt,
        },
        passthrough.dtserver,
    );
    if let Some(fid) = passthrough.fid {
        document.signon.sonrs.fi.fid = fid;
    }

    if let Some(bank) = document.bank.as_mut() {
        let stmtrs = &mut bank.stmttrnrs.stmtrs;
        stmtrs.banktranlist.dtstart = passthrough.dtstart;
        stmtrs.banktranlist.dtend = passthrough.dtend;
        stmtrs.ledgerbal.dtasof = passthrough.dtasof;
    } else if let Some(cc) = document.creditcard.as_mut() {
        let ccstmtrs = &mut cc.ccstmttrnrs.ccstmtrs;
        ccstmtrs.banktranlist.dtstart = passthrough.dtstart;
        ccstmtrs.banktranlist.dtend = passthrough.dtend;
        ccstmtrs.ledgerbal.dtasof = passthrough.dtasof;
    }

    document
}
