// Base URL for the market data API.
pub const BASE_URL: &str = "https://api.marketdata.app/";

// Environment variable holding the marketdata bearer token.
pub const TOKEN_ENV: &str = "marketdata_token";
// Optional environment variable overriding BASE_URL.
pub const BASE_URL_ENV: &str = "marketdata_base_url";

// Filter defaults, same as the range sliders of the web page.
pub const DEFAULT_MIN_STRIKE_PCT: f64 = 30.0;
pub const DEFAULT_MAX_STRIKE_PCT: f64 = 80.0;
pub const DEFAULT_MIN_DTE: i64 = 1;
pub const DEFAULT_MAX_DTE: i64 = 45;

// Contract multiplier for US equity options.
pub const CONTRACT_SIZE: f64 = 100.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

// en-GB short date, e.g. 17/10/2026.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
