// Library root module for maker-bridge
// This file defines the public API and module structure of the route
// resolution and transfer dispatch core
//
// Numan Thabit 2025 Nov

pub mod adapters;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod router;
pub mod transport;

pub use errors::{BridgeError, ErrorKind};
pub use router::{Router, TransferRequest};
