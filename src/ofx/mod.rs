pub mod model;
pub mod repair;
pub mod writer;

pub use model::{OfxDocument, StatementBody, StmtTrn};
pub use repair::repair_fitids;
pub use writer::render;
