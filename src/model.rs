use std::{
    error::Error,
    fmt::Display,
    io::{self, BufWriter},
};

use csv::Writer;
use serde::Serialize;

use crate::{constants, http::client};

/// Represents the side of an option (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionSide {
    Call,
    Put,
}

impl From<&OptionSide> for &'static str {
    fn from(value: &OptionSide) -> Self {
        match value {
            OptionSide::Call => "call",
            OptionSide::Put => "put",
        }
    }
}

impl Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side: &'static str = self.into();
        f.write_str(side)
    }
}

/// Strike-percentage and days-to-expiration bounds for one scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    pub min_strike_pct: f64,
    pub max_strike_pct: f64,
    pub min_dte: i64,
    pub max_dte: i64,
}

impl Filter {
    pub fn new(min_strike_pct: f64, max_strike_pct: f64, min_dte: i64, max_dte: i64) -> Result<Self> {
        if !min_strike_pct.is_finite() || !max_strike_pct.is_finite() || min_strike_pct < 0.0 {
            return Err(CollarError::InvalidFilter(format!(
                "strike percentages must be finite and non-negative, got {}..{}",
                min_strike_pct, max_strike_pct
            )));
        }
        if min_strike_pct > max_strike_pct {
            return Err(CollarError::InvalidFilter(format!(
                "min strike {}% is above max strike {}%",
                min_strike_pct, max_strike_pct
            )));
        }
        if min_dte > max_dte {
            return Err(CollarError::InvalidFilter(format!(
                "min dte {} is above max dte {}",
                min_dte, max_dte
            )));
        }
        Ok(Filter {
            min_strike_pct,
            max_strike_pct,
            min_dte,
            max_dte,
        })
    }

    /// Strike window for an underlying trading at `price`.
    pub fn strike_window(&self, price: f64) -> StrikeWindow {
        StrikeWindow {
            min: (price * (self.min_strike_pct / 100.0)).floor() as i64,
            max: (price * (self.max_strike_pct / 100.0)).floor() as i64,
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            min_strike_pct: constants::DEFAULT_MIN_STRIKE_PCT,
            max_strike_pct: constants::DEFAULT_MAX_STRIKE_PCT,
            min_dte: constants::DEFAULT_MIN_DTE,
            max_dte: constants::DEFAULT_MAX_DTE,
        }
    }
}

/// Inclusive strike range requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrikeWindow {
    pub min: i64,
    pub max: i64,
}

impl StrikeWindow {
    pub fn contains(&self, strike: f64) -> bool {
        strike >= self.min as f64 && strike <= self.max as f64
    }
}

impl Display for StrikeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Reference price of the underlying for one symbol's scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderlyingQuote {
    pub price: f64,
}

/// Quote for a single option contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionQuote {
    pub strike: f64, // Strike price.
    pub bid: f64,    // Bid price.
    pub ask: f64,    // Ask price.
    pub mid: f64,    // Mid price.
}

/// One row of an option chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRow {
    pub quote: OptionQuote,
    pub dte: Option<i64>,        // Days to expiration as reported by the provider.
    pub expiration: Option<i64>, // Expiration, epoch seconds.
}

/// Option chain for one (symbol, expiration, side).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionChain {
    pub underlying_price: Option<f64>,
    pub rows: Vec<ChainRow>,
}

/// A stock + short call + long put position at a single strike and expiration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollarCandidate {
    pub symbol: String,
    pub price: f64,
    #[serde(rename = "exp")]
    pub expiration: i64, // Expiration, epoch seconds.
    #[serde(rename = "expDate")]
    pub expiration_date: String, // Expiration formatted dd/mm/yyyy.
    pub dte: i64,
    pub strike: f64,
    pub call_bid: f64,
    pub call_ask: f64,
    pub call_mid: f64,
    pub put_bid: f64,
    pub put_ask: f64,
    pub put_mid: f64,
    pub net_cost: f64,
    pub collar: f64,
    pub ann_return: f64,
    pub strike_price_pct: f64,
}

pub fn collars_to_csv_vec(collars: &[CollarCandidate]) -> Result<Vec<u8>> {
    let buf = BufWriter::new(Vec::new());
    let mut writer = Writer::from_writer(buf);

    // Write header row
    writer.write_record([
        "symbol",
        "price",
        "exp",
        "expDate",
        "dte",
        "strike",
        "strikePricePct",
        "callBid",
        "callAsk",
        "callMid",
        "putBid",
        "putAsk",
        "putMid",
        "netCost",
        "collar",
        "annReturn",
    ])?;

    for c in collars {
        writer.write_record([
            &c.symbol,
            &c.price.to_string(),
            &c.expiration.to_string(),
            &c.expiration_date,
            &c.dte.to_string(),
            &c.strike.to_string(),
            &format!("{:.2}", c.strike_price_pct),
            &c.call_bid.to_string(),
            &c.call_ask.to_string(),
            &c.call_mid.to_string(),
            &c.put_bid.to_string(),
            &c.put_ask.to_string(),
            &c.put_mid.to_string(),
            &c.net_cost.to_string(),
            &c.collar.to_string(),
            &c.ann_return.to_string(),
        ])?;
    }

    let buf = writer
        .into_inner()
        .map_err(|e| CollarError::CouldNotWrite(io::Error::other(e.to_string())))?;
    buf.into_inner()
        .map_err(|e| CollarError::CouldNotWrite(e.into_error()))
}

pub type Result<T> = std::result::Result<T, CollarError>;

#[derive(Debug)]
pub enum CollarError {
    FileNotFound(String),
    CouldNotOpenFile(io::Error),
    CouldNotReadLine,
    CouldNotWrite(io::Error),
    NoSymbols,
    InvalidFilter(String),
    HttpError(client::RequestError),
    CsvError(csv::Error),
    JsonError(serde_json::Error),
}

impl Display for CollarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for CollarError {}

impl From<io::Error> for CollarError {
    fn from(value: io::Error) -> Self {
        Self::CouldNotOpenFile(value)
    }
}

impl From<client::RequestError> for CollarError {
    fn from(value: client::RequestError) -> Self {
        Self::HttpError(value)
    }
}

impl From<csv::Error> for CollarError {
    fn from(value: csv::Error) -> Self {
        Self::CsvError(value)
    }
}

impl From<serde_json::Error> for CollarError {
    fn from(value: serde_json::Error) -> Self {
        Self::JsonError(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_rejects_inverted_ranges() {
        assert!(matches!(
            Filter::new(80.0, 30.0, 1, 45),
            Err(CollarError::InvalidFilter(_))
        ));
        assert!(matches!(
            Filter::new(30.0, 80.0, 45, 1),
            Err(CollarError::InvalidFilter(_))
        ));
        assert!(matches!(
            Filter::new(f64::NAN, 80.0, 1, 45),
            Err(CollarError::InvalidFilter(_))
        ));
        assert!(Filter::new(50.0, 50.0, 7, 7).is_ok());
    }

    #[test]
    fn strike_window_floors_both_bounds() {
        let filter = Filter::new(30.0, 80.0, 1, 45).unwrap();
        let window = filter.strike_window(153.7);
        // 46.11 and 122.96
        assert_eq!(window, StrikeWindow { min: 46, max: 122 });
        assert_eq!(window.to_string(), "46-122");
        assert!(window.contains(46.0));
        assert!(window.contains(122.0));
        assert!(!window.contains(122.5));
        assert!(!window.contains(45.5));
    }

    #[test]
    fn csv_has_header_and_one_line_per_collar() {
        let collar = CollarCandidate {
            symbol: "AAPL".into(),
            price: 100.0,
            expiration: 1_700_000_000,
            expiration_date: "14/11/2023".into(),
            dte: 30,
            strike: 110.0,
            call_bid: 2.9,
            call_ask: 3.1,
            call_mid: 3.0,
            put_bid: 0.9,
            put_ask: 1.1,
            put_mid: 1.0,
            net_cost: 9800.0,
            collar: 1200.0,
            ann_return: 149.0,
            strike_price_pct: 110.0,
        };
        let bytes = collars_to_csv_vec(&[collar]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("symbol,price,exp,expDate,dte,strike"));
        assert!(lines[1].starts_with("AAPL,100,1700000000,14/11/2023,30,110,110.00"));
    }

    #[test]
    fn side_renders_as_wire_value() {
        assert_eq!(OptionSide::Call.to_string(), "call");
        assert_eq!(OptionSide::Put.to_string(), "put");
    }
}
