use super::response;
use crate::{
    constants,
    http::client::{self, RequestError},
    model,
    provider::{ChainQuery, OptionsProvider},
};
use serde::de::DeserializeOwned;
use std::env;

// Checks the status returned from the API and returns an error if the status is not "ok".
fn check_status(s: &str, err: &Option<String>) -> Result<(), RequestError> {
    match s {
        "ok" => Ok(()),
        _ => Err(status_error(s, err)),
    }
}

fn status_error(s: &str, err: &Option<String>) -> RequestError {
    let message = match s {
        "no_data" => "No data".to_string(),
        "error" => err.clone().unwrap_or_else(|| "Unknown error".into()),
        _ => "Unknown status".to_string(),
    };
    RequestError::Status {
        status: s.to_string(),
        message,
    }
}

/// marketdata.app client bound to one bearer token.
#[derive(Debug, Clone)]
pub struct Requester {
    base_url: String,
    token: String,
}

impl Requester {
    pub fn new(base_url: &str, token: &str) -> Requester {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Requester {
            base_url,
            token: token.to_string(),
        }
    }

    /// Builds a requester from `marketdata_token` and, if set, `marketdata_base_url`.
    pub fn from_env() -> Result<Requester, RequestError> {
        let token = env::var(constants::TOKEN_ENV).map_err(|_| RequestError::TokenNotSet)?;
        let base_url =
            env::var(constants::BASE_URL_ENV).unwrap_or_else(|_| constants::BASE_URL.to_string());
        Ok(Requester::new(&base_url, &token))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, RequestError> {
        let url = format!("{}{}", self.base_url, path);
        match client::get::<T>(&url, params, Some(&self.token)).await {
            // no_data comes back as a 404 that still carries the status envelope.
            Err(RequestError::HttpError(url, code, body)) => {
                match serde_json::from_str::<response::Envelope>(&body) {
                    Ok(envelope) if envelope.s != "ok" => {
                        Err(status_error(&envelope.s, &envelope.errmsg))
                    }
                    _ => Err(RequestError::HttpError(url, code, body)),
                }
            }
            other => other,
        }
    }
}

impl OptionsProvider for Requester {
    async fn option_expirations(&self, symbol: &str) -> Result<Vec<String>, RequestError> {
        let resp = self
            .fetch::<response::OptionExpirations>(
                &format!("v1/options/expirations/{}/", symbol),
                &[],
            )
            .await?;
        check_status(&resp.s, &resp.errmsg)?;
        Ok(resp.expirations)
    }

    async fn option_chain(&self, query: &ChainQuery<'_>) -> Result<model::OptionChain, RequestError> {
        let side: &'static str = (&query.side).into();
        let strike = query.strikes.map(|window| window.to_string());
        let mut params = vec![("expiration", query.expiration), ("side", side)];
        if let Some(strike) = strike.as_deref() {
            params.push(("strike", strike));
        }

        let resp = self
            .fetch::<response::OptionChain>(
                &format!("v1/options/chain/{}/", query.symbol),
                &params,
            )
            .await?;
        check_status(&resp.s, &resp.errmsg)?;
        Ok(to_option_chain(resp))
    }
}

// Maps the parallel arrays into rows. Rows stop at the shortest quote array;
// a row with a null strike or quote is dropped.
fn to_option_chain(resp: response::OptionChain) -> model::OptionChain {
    let len = resp
        .strike
        .len()
        .min(resp.bid.len())
        .min(resp.ask.len())
        .min(resp.mid.len());
    let mut rows = Vec::with_capacity(len);
    for i in 0..len {
        let (Some(strike), Some(bid), Some(ask), Some(mid)) =
            (resp.strike[i], resp.bid[i], resp.ask[i], resp.mid[i])
        else {
            log::debug!("dropping chain row {} with a null quote field", i);
            continue;
        };
        rows.push(model::ChainRow {
            quote: model::OptionQuote {
                strike,
                bid,
                ask,
                mid,
            },
            dte: resp.dte.get(i).copied().flatten(),
            expiration: resp.expiration.get(i).copied().flatten(),
        });
    }
    model::OptionChain {
        underlying_price: resp.underlying_price.first().copied().flatten(),
        rows,
    }
}
