use crate::errors::ConvertResult;

pub trait Parser {
    type Output;

    fn parse(&self, content: &str) -> ConvertResult<Vec<Self::Output>>;

    fn is_supported(filename: Option<&str>, content: &str) -> bool;
}
