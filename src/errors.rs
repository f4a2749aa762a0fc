// Error types and error handling module
// This file defines the error surface shared by every component of the
// route resolution and dispatch core, plus the transport errors of the
// catalog client
//
// Numan Thabit 2025 Nov

use std::fmt;
use thiserror::Error;

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;

/// Category of a [`BridgeError`]. Callers branch on this, never on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No settlement rule matches the requested pair.
    NoRouteFound,
    /// Transfer amount outside the rule's min/max.
    OutOfBounds,
    /// A required address, contract, token or adapter is absent.
    MissingField,
    /// The account cannot be used on the network in its current state.
    UnsupportedAccountState,
    /// A memo or router instruction cannot be encoded.
    Encoding,
    /// Amount arithmetic overflowed or produced an unusable value.
    Computation,
    /// An address failed its chain-family format check.
    InvalidAddress,
    /// The chain id is not present in the chain catalog.
    UnknownChain,
    /// The active signer cannot serve the source chain.
    SignerMismatch,
    /// A catalog source failed to load.
    Catalog,
    /// A chain adapter failed.
    Adapter,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoRouteFound => "no_route_found",
            ErrorKind::OutOfBounds => "out_of_bounds",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::UnsupportedAccountState => "unsupported_account_state",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Computation => "computation",
            ErrorKind::InvalidAddress => "invalid_address",
            ErrorKind::UnknownChain => "unknown_chain",
            ErrorKind::SignerMismatch => "signer_mismatch",
            ErrorKind::Catalog => "catalog",
            ErrorKind::Adapter => "adapter",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct BridgeError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<anyhow::Error>,
}

impl BridgeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Attach the underlying failure.
    pub fn with_cause(mut self, cause: impl Into<anyhow::Error>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Wrap a failure returned by a chain adapter.
    pub fn adapter(message: impl Into<String>, cause: anyhow::Error) -> Self {
        Self::new(ErrorKind::Adapter, message).with_cause(cause)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_ref()
    }
}

/// Raise a [`BridgeError`]. Every component reports failures through this.
pub fn fail<T>(kind: ErrorKind, message: impl Into<String>) -> Result<T> {
    Err(BridgeError::new(kind, message))
}

/// Convert collaborator failures into a [`BridgeError`] of the given kind.
pub trait ResultExt<T> {
    fn or_fail(self, kind: ErrorKind, message: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_fail(self, kind: ErrorKind, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| BridgeError::new(kind, message).with_cause(e))
    }
}

/// User-facing rendering of a raw adapter error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterMessage {
    Known(&'static str),
    Raw(String),
}

impl AdapterMessage {
    pub fn into_string(self) -> String {
        match self {
            AdapterMessage::Known(msg) => msg.to_string(),
            AdapterMessage::Raw(msg) => msg,
        }
    }
}

/// Known Loopring failures, matched by substring. Append only.
pub const LOOPRING_ERROR_MESSAGES: &[(&str, &str)] = &[
    (
        "account is not activated",
        "This Loopring account is not yet activated, please activate it before transferring.",
    ),
    (
        "User account is frozen",
        "Your Loopring account is frozen, please check your Loopring account status on Loopring website. Get more details here: https://docs.loopring.io/en/basics/key_mgmt.html?h=frozen",
    ),
];

const LOOPRING_FALLBACK: &str =
    "Something was wrong by loopring transfer. please check it all";

/// Look `raw` up in `table`; unknown messages pass through unchanged.
pub fn translate_adapter_message(table: &[(&str, &'static str)], raw: &str) -> AdapterMessage {
    table
        .iter()
        .find(|(needle, _)| raw.contains(*needle))
        .map(|(_, msg)| AdapterMessage::Known(*msg))
        .unwrap_or_else(|| {
            if raw.trim().is_empty() {
                AdapterMessage::Known(LOOPRING_FALLBACK)
            } else {
                AdapterMessage::Raw(raw.to_string())
            }
        })
}

/// Transport-level failures of the JSON-RPC catalog client.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider error: {0}")]
    Provider(String),
}
