use crate::{
    collar::{self, CallMap},
    http::client::RequestError,
    model::{ChainRow, OptionSide, StrikeWindow, UnderlyingQuote},
    provider::{ChainQuery, OptionsProvider},
};

/// Reads the underlying price from the unfiltered call chain of `expiration`.
///
/// Returns `Ok(None)` when the provider reports a non-"ok" status, the body
/// cannot be decoded or the price is missing.
pub async fn underlying_quote<P: OptionsProvider>(
    provider: &P,
    symbol: &str,
    expiration: &str,
) -> Result<Option<UnderlyingQuote>, RequestError> {
    let query = ChainQuery {
        symbol,
        expiration,
        side: OptionSide::Call,
        strikes: None,
    };
    let chain = match provider.option_chain(&query).await {
        Ok(chain) => chain,
        Err(err) if err.is_status() || err.is_malformed() => {
            log::warn!("{}: no chain for {} to read the price from: {}", symbol, expiration, err);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    Ok(chain
        .underlying_price
        .filter(|price| price.is_finite())
        .map(|price| UnderlyingQuote { price }))
}

/// Call and put chains of one expiration, restricted to the strike window.
#[derive(Debug, Clone, Default)]
pub struct ExpirationChains {
    pub calls: CallMap,
    pub puts: Vec<ChainRow>,
}

fn within_window(symbol: &str, side: OptionSide, rows: Vec<ChainRow>, window: StrikeWindow) -> Vec<ChainRow> {
    let total = rows.len();
    let rows: Vec<ChainRow> = rows
        .into_iter()
        .filter(|row| window.contains(row.quote.strike))
        .collect();
    if rows.len() < total {
        log::debug!(
            "{}: discarded {} {} rows outside strikes {}",
            symbol,
            total - rows.len(),
            side,
            window
        );
    }
    rows
}

/// Fetches both sides of `expiration` concurrently.
///
/// `Ok(None)` means one side came back with a non-"ok" status or an
/// undecodable body and the expiration should be skipped. Any other failure
/// is returned as is.
pub async fn fetch_chains<P: OptionsProvider>(
    provider: &P,
    symbol: &str,
    expiration: &str,
    window: StrikeWindow,
) -> Result<Option<ExpirationChains>, RequestError> {
    let call_query = ChainQuery {
        symbol,
        expiration,
        side: OptionSide::Call,
        strikes: Some(window),
    };
    let put_query = ChainQuery {
        side: OptionSide::Put,
        ..call_query
    };

    let (calls, puts) = tokio::join!(
        provider.option_chain(&call_query),
        provider.option_chain(&put_query)
    );

    match (calls, puts) {
        (Ok(calls), Ok(puts)) => Ok(Some(ExpirationChains {
            calls: collar::index_calls(&within_window(symbol, OptionSide::Call, calls.rows, window)),
            puts: within_window(symbol, OptionSide::Put, puts.rows, window),
        })),
        (Err(err), _) | (_, Err(err)) if !err.is_status() && !err.is_malformed() => Err(err),
        (Err(err), _) | (_, Err(err)) => {
            log::warn!("{}: skipping expiration {}: {}", symbol, expiration, err);
            Ok(None)
        }
    }
}
