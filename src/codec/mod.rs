// Codec module - amount arithmetic, routing memos and router instructions
// Everything in here is pure and deterministic
//
// Numan Thabit 2025 Nov

pub mod amount;
pub mod instruction;
pub mod memo;

pub use amount::{
    embed_routing_code, expected_destination_amount, extract_internal_id, routing_code,
    source_amount, to_base_units, trade_fee,
};
pub use instruction::{encode, InstructionKind, InstructionParams};
pub use memo::{memo_internal_id, routing_memo, MAX_MEMO_LEN};
