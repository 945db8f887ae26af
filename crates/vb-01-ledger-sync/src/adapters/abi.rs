//! # Contract ABI Codec
//!
//! Just enough of the Solidity ABI to call the voting contract: 4-byte
//! selectors, `uint256` arguments, and decoding of `uint256`, `bool`,
//! `string`, `string[]` and `uint256[]` return values.
//!
//! All `uint256` values this subsystem reads (counts, timestamps, tallies)
//! must fit in a `u64`; wider values are a decode error rather than a silent
//! truncation.

use crate::domain::entities::LedgerElection;
use crate::domain::errors::LedgerError;
use sha3::{Digest, Keccak256};

/// ABI word size in bytes.
pub const WORD: usize = 32;

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// Calldata for a function whose arguments are all `uint256`.
pub fn encode_call(signature: &str, args: &[u64]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD * args.len());
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&uint_word(*arg));
    }
    data
}

/// Left-padded big-endian `uint256` word.
pub fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

fn decode_err(what: impl Into<String>) -> LedgerError {
    LedgerError::Decode(what.into())
}

fn word_at(data: &[u8], pos: usize) -> Result<&[u8], LedgerError> {
    let end = pos
        .checked_add(WORD)
        .ok_or_else(|| decode_err("offset overflow"))?;
    data.get(pos..end)
        .ok_or_else(|| decode_err(format!("word at {pos} past end of {} bytes", data.len())))
}

/// `uint256` at `pos`, narrowed to `u64`.
pub fn read_u64(data: &[u8], pos: usize) -> Result<u64, LedgerError> {
    let word = word_at(data, pos)?;
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(decode_err(format!("uint256 at {pos} exceeds u64")));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(low))
}

fn read_usize(data: &[u8], pos: usize) -> Result<usize, LedgerError> {
    let value = read_u64(data, pos)?;
    usize::try_from(value).map_err(|_| decode_err(format!("offset {value} exceeds usize")))
}

/// `bool` at `pos`.
pub fn read_bool(data: &[u8], pos: usize) -> Result<bool, LedgerError> {
    match read_u64(data, pos)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(decode_err(format!("invalid bool {other} at {pos}"))),
    }
}

/// `string` whose length word starts at `start`.
pub fn read_string_at(data: &[u8], start: usize) -> Result<String, LedgerError> {
    let len = read_usize(data, start)?;
    let body = start + WORD;
    let end = body
        .checked_add(len)
        .ok_or_else(|| decode_err("string length overflow"))?;
    let bytes = data
        .get(body..end)
        .ok_or_else(|| decode_err(format!("string at {start} runs past end")))?;
    String::from_utf8(bytes.to_vec()).map_err(|e| decode_err(e.to_string()))
}

/// `string[]` whose length word starts at `start`.
pub fn read_string_array_at(data: &[u8], start: usize) -> Result<Vec<String>, LedgerError> {
    let count = read_usize(data, start)?;
    let base = start + WORD;
    let mut items = Vec::with_capacity(count.min(1024));
    for i in 0..count {
        let offset = read_usize(data, base + i * WORD)?;
        let item_start = base
            .checked_add(offset)
            .ok_or_else(|| decode_err("string[] offset overflow"))?;
        items.push(read_string_at(data, item_start)?);
    }
    Ok(items)
}

/// `uint256[]` whose length word starts at `start`.
pub fn read_u64_array_at(data: &[u8], start: usize) -> Result<Vec<u64>, LedgerError> {
    let count = read_usize(data, start)?;
    let base = start + WORD;
    let mut items = Vec::with_capacity(count.min(1024));
    for i in 0..count {
        items.push(read_u64(data, base + i * WORD)?);
    }
    Ok(items)
}

/// Decode `getElectionInfo` output:
/// `(string name, string description, uint256 startTime, uint256 endTime,
///   string[] options, bool finalized)`.
pub fn decode_election_info(data: &[u8]) -> Result<LedgerElection, LedgerError> {
    Ok(LedgerElection {
        name: read_string_at(data, read_usize(data, 0)?)?,
        description: read_string_at(data, read_usize(data, WORD)?)?,
        start_time: read_u64(data, 2 * WORD)?,
        end_time: read_u64(data, 3 * WORD)?,
        options: read_string_array_at(data, read_usize(data, 4 * WORD)?)?,
        finalized: read_bool(data, 5 * WORD)?,
    })
}

/// Decode `getElectionResults` output: a single `uint256[]`.
pub fn decode_results(data: &[u8]) -> Result<Vec<u64>, LedgerError> {
    read_u64_array_at(data, read_usize(data, 0)?)
}
