mod parser;
mod types;

pub use parser::QifParser;
pub use types::DateFormat;

pub mod prelude {
    pub use super::{DateFormat, QifParser};
}
