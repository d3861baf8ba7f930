use chrono::{NaiveDate, Utc};

use crate::{
    chain, collar, expiration,
    http::client::RequestError,
    model::{CollarCandidate, Filter},
    provider::OptionsProvider,
};

/// What one symbol contributed to a scan.
#[derive(Debug, Clone)]
pub enum SymbolOutcome {
    /// Chains were fetched; `skipped_expirations` came back without data.
    Collars {
        count: usize,
        expirations: usize,
        skipped_expirations: usize,
    },
    /// No listed expiration falls inside the DTE range.
    NoExpirations,
    /// The provider did not report a price for the underlying.
    NoUnderlyingPrice,
    /// A request failed; the symbol contributes nothing.
    Failed(RequestError),
}

#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

/// Result of one scan over a list of symbols.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub records: Vec<CollarCandidate>,
    /// Requests issued during this scan, failed ones included.
    pub api_calls: u32,
    pub symbols: Vec<SymbolReport>,
}

/// Scans `symbols` for profitable collars, with DTE measured from today (UTC).
pub async fn fetch_collars<P, S>(provider: &P, symbols: &[S], filter: &Filter) -> FetchReport
where
    P: OptionsProvider,
    S: AsRef<str>,
{
    fetch_collars_on(provider, symbols, filter, Utc::now().date_naive()).await
}

/// Same as [`fetch_collars`] with an explicit reference date.
///
/// Symbols are processed one after the other. A failing symbol is logged and
/// reported in its [`SymbolReport`]; it never stops the others.
pub async fn fetch_collars_on<P, S>(
    provider: &P,
    symbols: &[S],
    filter: &Filter,
    today: NaiveDate,
) -> FetchReport
where
    P: OptionsProvider,
    S: AsRef<str>,
{
    let mut report = FetchReport::default();

    for symbol in symbols {
        let symbol = symbol.as_ref();
        let outcome = match scan_symbol(provider, symbol, filter, today, &mut report.api_calls).await {
            Ok((outcome, records)) => {
                report.records.extend(records);
                outcome
            }
            Err(err) => {
                log::error!("Error fetching data for {}: {}", symbol, err);
                SymbolOutcome::Failed(err)
            }
        };
        report.symbols.push(SymbolReport {
            symbol: symbol.to_string(),
            outcome,
        });
    }

    report
}

async fn scan_symbol<P: OptionsProvider>(
    provider: &P,
    symbol: &str,
    filter: &Filter,
    today: NaiveDate,
    api_calls: &mut u32,
) -> Result<(SymbolOutcome, Vec<CollarCandidate>), RequestError> {
    *api_calls += 1;
    let expirations =
        expiration::resolve_expirations(provider, symbol, filter.min_dte, filter.max_dte, today)
            .await?;
    let Some(first) = expirations.first() else {
        log::info!("{}: no expirations between {} and {} dte", symbol, filter.min_dte, filter.max_dte);
        return Ok((SymbolOutcome::NoExpirations, Vec::new()));
    };

    *api_calls += 1;
    let Some(quote) = chain::underlying_quote(provider, symbol, first).await? else {
        log::warn!("{}: no underlying price, skipping symbol", symbol);
        return Ok((SymbolOutcome::NoUnderlyingPrice, Vec::new()));
    };
    let window = filter.strike_window(quote.price);
    log::debug!("{}: price {} strikes {}", symbol, quote.price, window);

    let mut records = Vec::new();
    let mut skipped = 0;
    for expiration in &expirations {
        *api_calls += 2;
        match chain::fetch_chains(provider, symbol, expiration, window).await? {
            Some(chains) => records.extend(collar::join_collars(
                symbol,
                quote.price,
                &chains.calls,
                &chains.puts,
            )),
            None => skipped += 1,
        }
    }

    log::info!(
        "{}: {} profitable collars across {} expirations",
        symbol,
        records.len(),
        expirations.len()
    );
    Ok((
        SymbolOutcome::Collars {
            count: records.len(),
            expirations: expirations.len(),
            skipped_expirations: skipped,
        },
        records,
    ))
}
