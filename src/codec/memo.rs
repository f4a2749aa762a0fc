// Routing memo
// Memo-tagged networks carry the routing code as text instead of in the amount
//
// Numan Thabit 2025 Nov

use super::amount::{routing_code, ROUTING_CODE_BASE};
use crate::errors::{fail, ErrorKind, Result};

pub const MAX_MEMO_LEN: usize = 128;

/// `"{code}"`, or `"{code}_{receiver}"` when a receiver override is given.
pub fn routing_memo(internal_id: &str, receiver: Option<&str>) -> Result<String> {
    let code = routing_code(internal_id)?;
    let memo = match receiver.filter(|r| !r.is_empty()) {
        Some(receiver) => format!("{code}_{receiver}"),
        None => code.to_string(),
    };
    let chars = memo.chars().count();
    if chars > MAX_MEMO_LEN {
        return fail(
            ErrorKind::Encoding,
            format!("memo is {chars} characters, limit is {MAX_MEMO_LEN}"),
        );
    }
    Ok(memo)
}

pub fn memo_internal_id(memo: &str) -> Option<u16> {
    let code = memo.split('_').next()?.parse::<u16>().ok()?;
    (ROUTING_CODE_BASE..ROUTING_CODE_BASE + 1000)
        .contains(&code)
        .then(|| code - ROUTING_CODE_BASE)
}
