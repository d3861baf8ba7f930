use std::{cmp::Ordering, str::FromStr};

use crate::model::CollarCandidate;

/// Sortable columns of a collar record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Symbol,
    Price,
    ExpirationDate,
    Dte,
    Strike,
    StrikePricePct,
    CallBid,
    CallAsk,
    CallMid,
    PutBid,
    PutAsk,
    PutMid,
    NetCost,
    Collar,
    AnnReturn,
}

impl FromStr for SortColumn {
    type Err = String;

    // Accepts the record keys (annReturn) as well as snake_case (ann_return).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s.replace('_', "").to_ascii_lowercase().as_str() {
            "symbol" => SortColumn::Symbol,
            "price" => SortColumn::Price,
            "expdate" | "expirationdate" => SortColumn::ExpirationDate,
            "dte" => SortColumn::Dte,
            "strike" => SortColumn::Strike,
            "strikepricepct" => SortColumn::StrikePricePct,
            "callbid" => SortColumn::CallBid,
            "callask" => SortColumn::CallAsk,
            "callmid" => SortColumn::CallMid,
            "putbid" => SortColumn::PutBid,
            "putask" => SortColumn::PutAsk,
            "putmid" => SortColumn::PutMid,
            "netcost" => SortColumn::NetCost,
            "collar" => SortColumn::Collar,
            "annreturn" => SortColumn::AnnReturn,
            _ => return Err(format!("unknown sort column '{}'", s)),
        };
        Ok(column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("unknown sort direction '{}', expected asc or desc", s)),
        }
    }
}

enum Key<'a> {
    Text(&'a str),
    Number(f64),
}

fn key(record: &CollarCandidate, column: SortColumn) -> Key<'_> {
    match column {
        SortColumn::Symbol => Key::Text(&record.symbol),
        SortColumn::ExpirationDate => Key::Text(&record.expiration_date),
        SortColumn::Price => Key::Number(record.price),
        SortColumn::Dte => Key::Number(record.dte as f64),
        SortColumn::Strike => Key::Number(record.strike),
        SortColumn::StrikePricePct => Key::Number(record.strike_price_pct),
        SortColumn::CallBid => Key::Number(record.call_bid),
        SortColumn::CallAsk => Key::Number(record.call_ask),
        SortColumn::CallMid => Key::Number(record.call_mid),
        SortColumn::PutBid => Key::Number(record.put_bid),
        SortColumn::PutAsk => Key::Number(record.put_ask),
        SortColumn::PutMid => Key::Number(record.put_mid),
        SortColumn::NetCost => Key::Number(record.net_cost),
        SortColumn::Collar => Key::Number(record.collar),
        SortColumn::AnnReturn => Key::Number(record.ann_return),
    }
}

// IEEE total order with every NaN folded into the positive one, so NaN sorts
// above +inf whatever its sign bit.
fn total(a: f64, b: f64) -> Ordering {
    let canonical = |v: f64| if v.is_nan() { f64::NAN } else { v };
    canonical(a).total_cmp(&canonical(b))
}

fn compare(a: &Key, b: &Key) -> Ordering {
    match (a, b) {
        (Key::Text(a), Key::Text(b)) => a.cmp(b),
        (Key::Number(a), Key::Number(b)) => total(*a, *b),
        // Both keys always come from the same column.
        (Key::Text(_), Key::Number(_)) => Ordering::Less,
        (Key::Number(_), Key::Text(_)) => Ordering::Greater,
    }
}

fn by_return_desc(a: &CollarCandidate, b: &CollarCandidate) -> Ordering {
    total(b.ann_return, a.ann_return)
}

/// Returns a sorted copy of `records`.
///
/// Ties on `column` are broken by annualized return, highest first, unless
/// `column` is the annualized return itself. The sort is stable.
pub fn rank(records: &[CollarCandidate], column: SortColumn, direction: SortDirection) -> Vec<CollarCandidate> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let mut primary = compare(&key(a, column), &key(b, column));
        if direction == SortDirection::Desc {
            primary = primary.reverse();
        }
        if primary == Ordering::Equal && column != SortColumn::AnnReturn {
            return by_return_desc(a, b);
        }
        primary
    });
    sorted
}

/// Highest annualized return first; the order used when no column is chosen.
pub fn default_order(records: &[CollarCandidate]) -> Vec<CollarCandidate> {
    let mut sorted = records.to_vec();
    sorted.sort_by(by_return_desc);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, exp_date: &str, dte: i64, strike: f64, ann_return: f64) -> CollarCandidate {
        CollarCandidate {
            symbol: symbol.into(),
            price: 100.0,
            expiration: 0,
            expiration_date: exp_date.into(),
            dte,
            strike,
            call_bid: 0.0,
            call_ask: 0.0,
            call_mid: 0.0,
            put_bid: 0.0,
            put_ask: 0.0,
            put_mid: 0.0,
            net_cost: 0.0,
            collar: 1.0,
            ann_return,
            strike_price_pct: strike,
        }
    }

    fn records() -> Vec<CollarCandidate> {
        vec![
            record("MSFT", "20/11/2026", 34, 110.0, 12.0),
            record("AAPL", "23/10/2026", 6, 105.0, 40.0),
            record("AAPL", "20/11/2026", 34, 120.0, 55.0),
            record("TSLA", "01/12/2026", 45, 115.0, 12.0),
        ]
    }

    #[test]
    fn dte_ties_break_on_highest_return() {
        let sorted = rank(&records(), SortColumn::Dte, SortDirection::Asc);
        let keys: Vec<(i64, f64)> = sorted.iter().map(|r| (r.dte, r.ann_return)).collect();
        assert_eq!(keys, vec![(6, 40.0), (34, 55.0), (34, 12.0), (45, 12.0)]);
    }

    #[test]
    fn tie_break_stays_descending_when_sorting_descending() {
        let sorted = rank(&records(), SortColumn::Dte, SortDirection::Desc);
        let keys: Vec<(i64, f64)> = sorted.iter().map(|r| (r.dte, r.ann_return)).collect();
        assert_eq!(keys, vec![(45, 12.0), (34, 55.0), (34, 12.0), (6, 40.0)]);
    }

    #[test]
    fn symbols_sort_as_text() {
        let sorted = rank(&records(), SortColumn::Symbol, SortDirection::Asc);
        let keys: Vec<(&str, f64)> = sorted.iter().map(|r| (r.symbol.as_str(), r.ann_return)).collect();
        assert_eq!(keys, vec![("AAPL", 55.0), ("AAPL", 40.0), ("MSFT", 12.0), ("TSLA", 12.0)]);
    }

    #[test]
    fn display_dates_sort_as_text() {
        let sorted = rank(&records(), SortColumn::ExpirationDate, SortDirection::Asc);
        let dates: Vec<&str> = sorted.iter().map(|r| r.expiration_date.as_str()).collect();
        assert_eq!(dates, vec!["01/12/2026", "20/11/2026", "20/11/2026", "23/10/2026"]);
        assert_eq!(sorted[1].ann_return, 55.0);
    }

    #[test]
    fn ann_return_column_keeps_input_order_on_ties() {
        let sorted = rank(&records(), SortColumn::AnnReturn, SortDirection::Asc);
        let symbols: Vec<&str> = sorted.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["MSFT", "TSLA", "AAPL", "AAPL"]);
    }

    #[test]
    fn ranking_does_not_touch_the_input() {
        let input = records();
        let before = input.clone();
        let first = rank(&input, SortColumn::Strike, SortDirection::Desc);
        let second = rank(&input, SortColumn::Strike, SortDirection::Desc);
        assert_eq!(input, before);
        assert_eq!(first, second);
        let strikes: Vec<f64> = first.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![120.0, 115.0, 110.0, 105.0]);
    }

    #[test]
    fn default_order_is_highest_return_first() {
        let sorted = default_order(&records());
        let returns: Vec<f64> = sorted.iter().map(|r| r.ann_return).collect();
        assert_eq!(returns, vec![55.0, 40.0, 12.0, 12.0]);
        assert_eq!(sorted[2].symbol, "MSFT");
    }

    #[test]
    fn infinite_returns_sort_without_panicking() {
        let mut input = records();
        input[0].ann_return = f64::INFINITY;
        input[1].ann_return = f64::NEG_INFINITY;
        let sorted = rank(&input, SortColumn::AnnReturn, SortDirection::Desc);
        assert_eq!(sorted[0].ann_return, f64::INFINITY);
        assert_eq!(sorted[3].ann_return, f64::NEG_INFINITY);
    }

    #[test]
    fn nan_values_sort_above_infinity() {
        let mut input = records();
        // strike 0 at price 0
        input[2].strike_price_pct = crate::collar::collar_metrics(0.0, 0.0, 0.0, 0.0, 30).strike_price_pct;
        input[3].strike_price_pct = -f64::NAN;
        input[0].strike_price_pct = f64::INFINITY;

        let sorted = rank(&input, SortColumn::StrikePricePct, SortDirection::Asc);
        let symbols: Vec<&str> = sorted.iter().map(|r| r.symbol.as_str()).collect();
        // AAPL 105, MSFT inf, then the two NaNs tie and break on return.
        assert_eq!(symbols, vec!["AAPL", "MSFT", "AAPL", "TSLA"]);
        assert!(sorted[2].strike_price_pct.is_nan());
        assert_eq!(sorted[2].ann_return, 55.0);

        let sorted = rank(&input, SortColumn::StrikePricePct, SortDirection::Desc);
        assert!(sorted[0].strike_price_pct.is_nan() && sorted[1].strike_price_pct.is_nan());
        assert_eq!(sorted[0].ann_return, 55.0);
        assert_eq!(sorted[3].strike_price_pct, 105.0);
    }

    #[test]
    fn columns_parse_from_record_keys() {
        assert_eq!("annReturn".parse::<SortColumn>(), Ok(SortColumn::AnnReturn));
        assert_eq!("ann_return".parse::<SortColumn>(), Ok(SortColumn::AnnReturn));
        assert_eq!("expDate".parse::<SortColumn>(), Ok(SortColumn::ExpirationDate));
        assert_eq!("strikePricePct".parse::<SortColumn>(), Ok(SortColumn::StrikePricePct));
        assert!("volume".parse::<SortColumn>().is_err());
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("up".parse::<SortDirection>().is_err());
    }
}
