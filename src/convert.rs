use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ConvertOptions;
use crate::errors::ConvertResult;
use crate::mapper::map_transactions;
use crate::ofx::model::{OfxDocument, StatementBody, ofx_now};
use crate::ofx::writer;
use crate::parsers::qif::QifParser;

/// Convert one QIF export into a rendered OFX statement.
pub fn convert_statement(content: &str, opts: &ConvertOptions) -> ConvertResult<String> {
    let parser = QifParser::new(opts.date_format);
    let qif = parser.parse_file(content)?;
    debug!(transactions = qif.transactions.len(), "parsed QIF statement");

    // Empty statements have no as-of date; refuse them before building a
    // document around an undefined range.
    let dtstart = qif.first_transaction_date()?;
    let dtend = qif.last_transaction_date()?;
    let balamt = opts.opening_balance + qif.balance();
    let transactions = map_transactions(&qif, opts.accttype);

    let document = OfxDocument::statement(
        opts,
        StatementBody {
            transactions,
            dtstart,
            dtend,
            balamt,
        },
        ofx_now(),
    );
    writer::render(&document)
}

/// Output file for a given input: base name with an `.ofx` extension,
/// prefixed with `fixed_` when produced by the repair pass.
pub fn output_path(input: &Path, repaired: bool) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");
    let name = if repaired {
        format!("fixed_{stem}.ofx")
    } else {
        format!("{stem}.ofx")
    };
    input.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountType;
    use crate::errors::ConvertError;
    use rust_decimal_macros::dec;

    const TWO_TXN_QIF: &str = "!Type:CCard\n\
D01/03/2024\n\
T-50.00\n\
PShop A\n\
^\n\
D02/03/2024\n\
T20.00\n\
PShop B\n\
^\n";

    #[test]
    fn test_end_to_end_credit_card_statement() {
        let opts = ConvertOptions {
            opening_balance: dec!(100),
            ..ConvertOptions::default()
        };
        let output = convert_statement(TWO_TXN_QIF, &opts).unwrap();

        assert!(output.contains("<BALAMT>70.00</BALAMT>"));
        assert!(output.contains("<TRNTYPE>DEBIT</TRNTYPE>"));
        assert!(output.contains("<TRNTYPE>CREDIT</TRNTYPE>"));
        assert!(output.contains("<FITID>20240301-50.00ShopA</FITID>"));
        assert!(output.contains("<FITID>2024030220.00ShopB</FITID>"));
        assert!(output.contains("<DTSTART>20240301000000</DTSTART>"));
        assert!(output.contains("<DTEND>20240302000000</DTEND>"));
        assert!(output.contains("<DTASOF>20240302000000</DTASOF>"));
        assert!(output.contains("<CREDITCARDMSGSRSV1>"));
    }

    #[test]
    fn test_end_to_end_savings_statement_inverts_signs() {
        let opts = ConvertOptions {
            accttype: AccountType::Savings,
            ..ConvertOptions::default()
        };
        let output = convert_statement(TWO_TXN_QIF, &opts).unwrap();

        assert!(output.contains("<BANKMSGSRSV1>"));
        // -50.00 inverts to a 50.00 credit, 20.00 to a -20.00 debit
        assert!(output.contains("<TRNAMT>50.00</TRNAMT>"));
        assert!(output.contains("<TRNAMT>-20.00</TRNAMT>"));
        // Ledger balance still reflects the parsed sum
        assert!(output.contains("<BALAMT>-30.00</BALAMT>"));
    }

    #[test]
    fn test_conversion_is_deterministic_apart_from_dtserver() {
        let opts = ConvertOptions::default();
        let a = convert_statement(TWO_TXN_QIF, &opts).unwrap();
        let b = convert_statement(TWO_TXN_QIF, &opts).unwrap();

        let strip = |s: &str| {
            s.lines()
                .filter(|l| !l.contains("DTSERVER"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        assert_eq!(strip(&a), strip(&b));
    }

    #[test]
    fn test_empty_statement_is_rejected() {
        let result = convert_statement("!Type:Bank\n", &ConvertOptions::default());
        assert!(matches!(result, Err(ConvertError::EmptyStatement)));
    }

    #[test]
    fn test_output_path_replaces_extension() {
        let path = output_path(Path::new("/data/march.qif"), false);
        assert_eq!(path, Path::new("/data/march.ofx"));
    }

    #[test]
    fn test_output_path_repair_prefix() {
        let path = output_path(Path::new("/data/march.ofx"), true);
        assert_eq!(path, Path::new("/data/fixed_march.ofx"));
    }
}
