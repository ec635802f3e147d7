//! Convert QIF transaction exports into OFX 2.2.0 statements.
//!
//! ```rust,ignore
//! use qif2ofx::{ConvertOptions, convert_statement};
//!
//! let ofx = convert_statement(&qif_content, &ConvertOptions::default())?;
//! ```

mod convert;
mod fitid;
mod mapper;
mod statement;
mod types;

pub mod config;
pub mod errors;
pub mod ofx;
pub mod parsers;

pub use config::{AccountType, ConvertOptions, InstitutionRule, builtin_rules};
pub use convert::{convert_statement, output_path};
pub use errors::{ConvertError, ConvertResult};
pub use fitid::derive_fitid;
pub use mapper::{TrnType, map_transaction, map_transactions, normalize_payee};
pub use ofx::repair_fitids;
pub use parsers::prelude::*;
pub use statement::QifFile;
pub use types::Transaction;
