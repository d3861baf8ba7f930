// In-memory provider used by the unit tests.
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

use crate::{
    http::client::RequestError,
    model::{ChainRow, OptionChain, OptionQuote, OptionSide, StrikeWindow},
    provider::{ChainQuery, OptionsProvider},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub symbol: String,
    pub expiration: String,
    pub side: OptionSide,
    pub strikes: Option<StrikeWindow>,
}

#[derive(Default)]
pub struct FakeProvider {
    expirations: HashMap<String, Result<Vec<String>, RequestError>>,
    chains: HashMap<(String, String, OptionSide), Result<OptionChain, RequestError>>,
    queries: RefCell<Vec<RecordedQuery>>,
    calls: Cell<u32>,
}

fn no_data() -> RequestError {
    RequestError::Status {
        status: "no_data".into(),
        message: "No data".into(),
    }
}

impl FakeProvider {
    pub fn with_expirations(mut self, symbol: &str, dates: &[&str]) -> Self {
        self.expirations.insert(
            symbol.into(),
            Ok(dates.iter().map(|d| d.to_string()).collect()),
        );
        self
    }

    pub fn with_expirations_error(mut self, symbol: &str, err: RequestError) -> Self {
        self.expirations.insert(symbol.into(), Err(err));
        self
    }

    pub fn with_chain(
        mut self,
        symbol: &str,
        expiration: &str,
        side: OptionSide,
        chain: OptionChain,
    ) -> Self {
        self.chains
            .insert((symbol.into(), expiration.into(), side), Ok(chain));
        self
    }

    pub fn with_chain_error(
        mut self,
        symbol: &str,
        expiration: &str,
        side: OptionSide,
        err: RequestError,
    ) -> Self {
        self.chains
            .insert((symbol.into(), expiration.into(), side), Err(err));
        self
    }

    /// Number of provider calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.borrow().clone()
    }
}

impl OptionsProvider for FakeProvider {
    async fn option_expirations(&self, symbol: &str) -> Result<Vec<String>, RequestError> {
        self.calls.set(self.calls.get() + 1);
        self.expirations
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(no_data()))
    }

    async fn option_chain(&self, query: &ChainQuery<'_>) -> Result<OptionChain, RequestError> {
        self.calls.set(self.calls.get() + 1);
        self.queries.borrow_mut().push(RecordedQuery {
            symbol: query.symbol.into(),
            expiration: query.expiration.into(),
            side: query.side,
            strikes: query.strikes,
        });
        self.chains
            .get(&(query.symbol.to_string(), query.expiration.to_string(), query.side))
            .cloned()
            .unwrap_or_else(|| Err(no_data()))
    }
}

/// Builds a chain from `(strike, bid, ask, mid)` tuples sharing one dte and expiration.
pub fn chain(price: f64, quotes: &[(f64, f64, f64, f64)], dte: i64, expiration: i64) -> OptionChain {
    OptionChain {
        underlying_price: Some(price),
        rows: quotes
            .iter()
            .map(|&(strike, bid, ask, mid)| ChainRow {
                quote: OptionQuote {
                    strike,
                    bid,
                    ask,
                    mid,
                },
                dte: Some(dte),
                expiration: Some(expiration),
            })
            .collect(),
    }
}
