pub mod qif;
pub mod traits;

pub mod prelude {
    pub use super::qif::prelude::*;
    pub use super::traits::Parser;
}
