use serde::Deserialize;

/// Status envelope shared by every marketdata.app response.
#[derive(Deserialize, Debug)]
pub struct Envelope {
    pub s: String,
    pub errmsg: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct OptionExpirations {
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub expirations: Vec<String>,
    pub errmsg: Option<String>,
}

// Per-contract fields are parallel arrays aligned by index. Any of them may be
// missing, in which case they decode as empty, and single elements may be null.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OptionChain {
    #[serde(default)]
    pub s: String,
    #[serde(default)]
    pub underlying_price: Vec<Option<f64>>,
    #[serde(default)]
    pub strike: Vec<Option<f64>>,
    #[serde(default)]
    pub bid: Vec<Option<f64>>,
    #[serde(default)]
    pub ask: Vec<Option<f64>>,
    #[serde(default)]
    pub mid: Vec<Option<f64>>,
    #[serde(default)]
    pub dte: Vec<Option<i64>>,
    #[serde(default)]
    pub expiration: Vec<Option<i64>>,
    pub errmsg: Option<String>,
}
