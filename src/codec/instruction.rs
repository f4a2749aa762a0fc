// Router instruction encoder
// RLP payloads telling the router contract where a transfer continues
//
// Numan Thabit 2025 Nov

use crate::errors::{fail, ErrorKind, Result};
use alloy_primitives::{Bytes, U256};
use alloy_rlp::{BufMut, Encodable, Header};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    /// Same token, possibly different receiver.
    Forward,
    /// Different token on the destination chain.
    ForwardAndConvert,
}

impl InstructionKind {
    pub fn tag(&self) -> u8 {
        match self {
            InstructionKind::Forward => 0x01,
            InstructionKind::ForwardAndConvert => 0x02,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstructionParams {
    pub destination_chain_id: String,
    pub destination_address: Option<String>,
    /// Signer address; a convert instruction omits the receiver when it is
    /// the sender.
    pub sender: String,
    pub destination_token: Option<String>,
    pub expected_amount: Option<U256>,
    /// Basis points.
    pub slippage: Option<u32>,
}

enum Field {
    Bytes(Vec<u8>),
    Uint(U256),
}

impl Field {
    /// `0x` text is decoded as hex, anything else is taken as UTF-8.
    fn text(name: &str, raw: &str) -> Result<Self> {
        let Some(digits) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) else {
            return Ok(Field::Bytes(raw.as_bytes().to_vec()));
        };
        let padded;
        let digits = if digits.len() % 2 == 1 {
            padded = format!("0{digits}");
            padded.as_str()
        } else {
            digits
        };
        match hex::decode(digits) {
            Ok(bytes) => Ok(Field::Bytes(bytes)),
            Err(e) => fail(ErrorKind::Encoding, format!("{name} is not valid hex: {e}")),
        }
    }
}

impl Encodable for Field {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Field::Bytes(bytes) => bytes.as_slice().encode(out),
            Field::Uint(value) => value.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Field::Bytes(bytes) => bytes.as_slice().length(),
            Field::Uint(value) => value.length(),
        }
    }
}

fn require<'a>(value: Option<&'a str>, kind: ErrorKind, what: &str) -> Result<&'a str> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => Ok(v),
        None => fail(kind, format!("router instruction requires {what}")),
    }
}

/// Encode a router instruction as an RLP list.
pub fn encode(kind: InstructionKind, params: &InstructionParams) -> Result<Bytes> {
    let Some(slippage) = params.slippage else {
        return fail(ErrorKind::Encoding, "router instruction requires slippage");
    };
    let destination = require(
        params.destination_address.as_deref(),
        ErrorKind::Encoding,
        "a destination address",
    )?;

    let mut fields = vec![
        Field::Uint(U256::from(kind.tag())),
        Field::text("destination chain id", &params.destination_chain_id)?,
    ];
    match kind {
        InstructionKind::Forward => {
            fields.push(Field::text("destination address", destination)?);
        }
        InstructionKind::ForwardAndConvert => {
            let token = require(
                params.destination_token.as_deref(),
                ErrorKind::MissingField,
                "a destination token",
            )?;
            let Some(expected) = params.expected_amount else {
                return fail(
                    ErrorKind::MissingField,
                    "router instruction requires an expected amount",
                );
            };
            fields.push(Field::text("destination token", token)?);
            fields.push(Field::Uint(expected));
            fields.push(Field::Uint(U256::from(slippage)));
            if !destination.eq_ignore_ascii_case(&params.sender) {
                fields.push(Field::text("destination address", destination)?);
            }
        }
    }

    let header = Header {
        list: true,
        payload_length: fields.iter().map(|f| f.length()).sum(),
    };
    let mut out = Vec::with_capacity(header.length() + header.payload_length);
    header.encode(&mut out);
    for field in &fields {
        field.encode(&mut out);
    }
    Ok(Bytes::from(out))
}
