// Transport module - network clients for catalog retrieval
//
// Numan Thabit 2025 Nov

pub mod jsonrpc;

pub use jsonrpc::{OpenApiClient, TradingPairs};
