use std::collections::HashMap;

use chrono::DateTime;
use chrono_tz::America::New_York;

use crate::{
    constants,
    model::{ChainRow, CollarCandidate, OptionQuote},
};

/// Derived figures for one collar position (100 shares, one call, one put).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollarMetrics {
    pub net_cost: f64,
    pub collar: f64,
    pub ann_return: f64,
    pub strike_price_pct: f64,
}

pub fn collar_metrics(price: f64, strike: f64, call_mid: f64, put_mid: f64, dte: i64) -> CollarMetrics {
    let net_cost = (price - call_mid + put_mid) * constants::CONTRACT_SIZE;
    let collar = (strike - price + call_mid - put_mid) * constants::CONTRACT_SIZE;
    // net_cost <= 0 or dte == 0 give a non-finite or inverted return; left as is.
    let ann_return = (collar / net_cost) * (constants::DAYS_PER_YEAR / dte as f64) * 100.0;
    let strike_price_pct = (strike / price) * 100.0;
    CollarMetrics {
        net_cost,
        collar,
        ann_return,
        strike_price_pct,
    }
}

/// Hashable exact strike. 0.0 and -0.0 map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrikeKey(u64);

impl From<f64> for StrikeKey {
    fn from(strike: f64) -> Self {
        let strike = if strike == 0.0 { 0.0 } else { strike };
        StrikeKey(strike.to_bits())
    }
}

pub type CallMap = HashMap<StrikeKey, OptionQuote>;

/// Indexes call quotes by strike. A repeated strike keeps the last row.
pub fn index_calls(rows: &[ChainRow]) -> CallMap {
    rows.iter()
        .map(|row| (StrikeKey::from(row.quote.strike), row.quote))
        .collect()
}

// en-GB date of the expiration in exchange time.
fn display_date(expiration: i64) -> String {
    DateTime::from_timestamp(expiration, 0)
        .map(|utc| {
            utc.with_timezone(&New_York)
                .format(constants::DISPLAY_DATE_FORMAT)
                .to_string()
        })
        .unwrap_or_default()
}

/// Pairs every put with the call at the same strike and keeps profitable collars.
///
/// Output follows the order of `puts`. Puts without a call at the exact same
/// strike, or without a dte/expiration, are skipped.
pub fn join_collars(symbol: &str, price: f64, calls: &CallMap, puts: &[ChainRow]) -> Vec<CollarCandidate> {
    let mut collars = Vec::new();
    for put in puts {
        let Some(call) = calls.get(&StrikeKey::from(put.quote.strike)) else {
            continue;
        };
        let (Some(dte), Some(expiration)) = (put.dte, put.expiration) else {
            log::debug!(
                "{}: put at strike {} has no dte/expiration, skipping",
                symbol,
                put.quote.strike
            );
            continue;
        };

        let strike = put.quote.strike;
        let metrics = collar_metrics(price, strike, call.mid, put.quote.mid, dte);
        if metrics.collar.is_nan() || metrics.collar <= 0.0 {
            continue;
        }

        collars.push(CollarCandidate {
            symbol: symbol.to_string(),
            price,
            expiration,
            expiration_date: display_date(expiration),
            dte,
            strike,
            call_bid: call.bid,
            call_ask: call.ask,
            call_mid: call.mid,
            put_bid: put.quote.bid,
            put_ask: put.quote.ask,
            put_mid: put.quote.mid,
            net_cost: metrics.net_cost,
            collar: metrics.collar,
            ann_return: metrics.ann_return,
            strike_price_pct: metrics.strike_price_pct,
        });
    }
    collars
}
