use crate::{
    http::client::RequestError,
    model::{OptionChain, OptionSide, StrikeWindow},
};

/// Parameters of a single option chain request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainQuery<'a> {
    pub symbol: &'a str,
    pub expiration: &'a str,
    pub side: OptionSide,
    pub strikes: Option<StrikeWindow>, // None requests every strike.
}

/// Source of option expirations and chains.
///
/// A status other than "ok" must be reported as [`RequestError::Status`] so
/// callers can tell an empty answer apart from a failed request.
#[allow(async_fn_in_trait)]
pub trait OptionsProvider {
    /// All listed expiration dates (YYYY-MM-DD) for `symbol`, in provider order.
    async fn option_expirations(&self, symbol: &str) -> Result<Vec<String>, RequestError>;

    async fn option_chain(&self, query: &ChainQuery<'_>) -> Result<OptionChain, RequestError>;
}
