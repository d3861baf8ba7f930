// Collar opportunity scanner on top of the marketdata.app option chains.

// Market data API client.
pub mod marketdata {
    // Requester implementing the options provider.
    pub mod api_caller;
    // Response structures for market data.
    pub mod response;
}
// HTTP client module.
pub mod http {
    // HTTP client implementation.
    pub mod client;
}
// module storing defaults
pub mod constants;
// Data models.
pub mod model;
// Options data source abstraction.
pub mod provider;
// Expiration listing and DTE filtering.
pub mod expiration;
// Underlying price lookup and chain fetching.
pub mod chain;
// Call/put join and collar metrics.
pub mod collar;
// Per-symbol scan loop.
pub mod pipeline;
// Sorting of collar records.
pub mod ranking;
// Symbol input.
pub mod symbols;

#[cfg(test)]
mod test_support;
