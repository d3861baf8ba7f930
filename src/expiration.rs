use chrono::NaiveDate;

use crate::{http::client::RequestError, provider::OptionsProvider};

/// Days from `today` to `expiration`, both taken at UTC midnight.
pub fn days_to_expiration(expiration: NaiveDate, today: NaiveDate) -> i64 {
    // Whole calendar days apart, so the ceiling of the day difference is exact.
    (expiration - today).num_days()
}

/// Parses an expiration string (YYYY-MM-DD) and returns its DTE relative to `today`.
pub fn parse_dte(expiration: &str, today: NaiveDate) -> Option<i64> {
    NaiveDate::parse_from_str(expiration.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| days_to_expiration(date, today))
}

/// Keeps the expirations whose DTE lies in `[min_dte, max_dte]`, in provider order.
pub fn filter_expirations(
    expirations: Vec<String>,
    min_dte: i64,
    max_dte: i64,
    today: NaiveDate,
) -> Vec<String> {
    expirations
        .into_iter()
        .filter(|expiration| match parse_dte(expiration, today) {
            Some(dte) => dte >= min_dte && dte <= max_dte,
            None => {
                log::warn!("ignoring unparseable expiration date '{}'", expiration);
                false
            }
        })
        .collect()
}

/// Lists the expirations of `symbol` that fall inside the DTE range.
///
/// One provider call. A non-"ok" status means the symbol has no listed
/// expirations and yields an empty list; transport failures are returned.
pub async fn resolve_expirations<P: OptionsProvider>(
    provider: &P,
    symbol: &str,
    min_dte: i64,
    max_dte: i64,
    today: NaiveDate,
) -> Result<Vec<String>, RequestError> {
    let expirations = match provider.option_expirations(symbol).await {
        Ok(expirations) => expirations,
        Err(err) if err.is_status() => {
            log::warn!("no expirations for {}: {}", symbol, err);
            Vec::new()
        }
        Err(err) => return Err(err),
    };
    let total = expirations.len();
    let expirations = filter_expirations(expirations, min_dte, max_dte, today);
    log::debug!(
        "{}: {} of {} expirations within {}..={} dte",
        symbol,
        expirations.len(),
        total,
        min_dte,
        max_dte
    );
    Ok(expirations)
}
