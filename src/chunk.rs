/// Single-chunk encode/decode state machine.
///
/// **Encoding:** each byte is shifted by 128 (`byte ^ 0x80`), giving a value
/// in `[0, 256)`. Its quartile (`value >> 6`) selects an optional marker and
/// its low six bits select the symbol.
///
/// **Decoding:** a marker sets a pending quartile offset that applies to the
/// next symbol only. A symbol emits `index + offset - 128` and clears the
/// offset. A range can be decoded on its own only when it starts at a unit
/// boundary; [`crate::parallel::align`] guarantees that for parallel chunks.
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::alphabet;
use crate::{Qb64Error, Qb64Result};

/// Units processed between polls of the cancellation flag.
pub(crate) const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Encode a whole buffer.
pub fn encode(data: &[u8]) -> String {
    encode_range(data, 0..data.len())
}

/// Encode `data[range]`.
///
/// Panics if `range` is out of bounds for `data`.
pub fn encode_range(data: &[u8], range: Range<usize>) -> String {
    let input = &data[range];
    let mut output = String::with_capacity(input.len() * 2);
    for &byte in input {
        push_unit(&mut output, byte);
    }
    output
}

/// Decode a whole text.
pub fn decode(text: &str) -> Qb64Result<Vec<u8>> {
    decode_range(text, 0..text.len())
}

/// Decode `text[range]`, where `range` is in bytes.
///
/// Errors report offsets relative to the start of `text`, not of `range`.
pub fn decode_range(text: &str, range: Range<usize>) -> Qb64Result<Vec<u8>> {
    let never = AtomicBool::new(false);
    decode_chunk(text, range, &never)
}

/// Encode one chunk, polling `cancel` every [`CANCEL_CHECK_INTERVAL`] bytes.
pub(crate) fn encode_chunk(
    data: &[u8],
    range: Range<usize>,
    cancel: &AtomicBool,
) -> Qb64Result<String> {
    let input = &data[range];
    // Every byte produces at most a marker plus a symbol.
    let mut output = String::with_capacity(input.len() * 2);

    for (i, &byte) in input.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return Err(Qb64Error::Cancelled);
        }
        push_unit(&mut output, byte);
    }

    Ok(output)
}

/// Append the unit for one input byte: optional marker, then symbol.
#[inline]
fn push_unit(output: &mut String, byte: u8) {
    let shifted = byte ^ 0x80;
    if let Some(m) = alphabet::marker(shifted >> 6) {
        output.push(char::from(m));
    }
    output.push(char::from(alphabet::symbol(shifted)));
}

/// Decode one chunk, polling `cancel` every [`CANCEL_CHECK_INTERVAL`] characters.
pub(crate) fn decode_chunk(
    text: &str,
    range: Range<usize>,
    cancel: &AtomicBool,
) -> Qb64Result<Vec<u8>> {
    let start = range.start;
    let input = &text.as_bytes()[range];

    let size = input.iter().filter(|&&c| !alphabet::is_marker(c)).count();
    let mut output = Vec::with_capacity(size);
    let mut offset = 0u8;

    for (i, &c) in input.iter().enumerate() {
        if i % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return Err(Qb64Error::Cancelled);
        }
        if let Some(base) = alphabet::marker_offset(c) {
            offset = base;
            continue;
        }
        let index = alphabet::index_of(c).ok_or_else(|| invalid_symbol(text, start + i))?;
        output.push((index + offset) ^ 0x80);
        offset = 0;
    }

    Ok(output)
}

/// Build an `InvalidSymbol` for the character containing byte `offset`.
fn invalid_symbol(text: &str, offset: usize) -> Qb64Error {
    let mut boundary = offset;
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    let symbol = text[boundary..]
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Qb64Error::InvalidSymbol { symbol, offset }
}
