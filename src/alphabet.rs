/// Symbol alphabet and control markers.
///
/// 64 symbols (`A-Z`, `a-z`, `0-9`, `+`, `-`) carry the low six bits of a
/// shifted byte. Three markers carry its quartile:
///
/// | Marker | Quartile | Offset |
/// |--------|----------|--------|
/// | (none) | 0        | 0      |
/// | `@`    | 1        | 64     |
/// | `!`    | 2        | 128    |
/// | `?`    | 3        | 192    |
///
/// Both directions are `const`-built tables; lookups never allocate or lock.
pub const SYMBOLS: [u8; 64] = *b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+-";

/// Markers indexed by quartile. Quartile 0 has no marker.
pub const MARKERS: [Option<u8>; 4] = [None, Some(b'@'), Some(b'!'), Some(b'?')];

/// Width of one quartile of the shifted byte range.
pub const QUARTILE_WIDTH: u8 = 64;

/// Reverse-table entry for bytes that are not alphabet symbols.
const NOT_A_SYMBOL: u8 = 0xFF;

/// Reverse-table entry for bytes that are not markers.
const NOT_A_MARKER: u8 = 0;

const fn make_symbol_table() -> [u8; 256] {
    let mut table = [NOT_A_SYMBOL; 256];
    let mut i = 0;
    while i < SYMBOLS.len() {
        table[SYMBOLS[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const fn make_marker_table() -> [u8; 256] {
    let mut table = [NOT_A_MARKER; 256];
    let mut quartile = 1;
    while quartile < MARKERS.len() {
        if let Some(m) = MARKERS[quartile] {
            table[m as usize] = quartile as u8 * QUARTILE_WIDTH;
        }
        quartile += 1;
    }
    table
}

static SYMBOL_INDEX: [u8; 256] = make_symbol_table();
static MARKER_OFFSET: [u8; 256] = make_marker_table();

/// Symbol for a 6-bit index. Only the low six bits of `index` are used.
#[inline]
pub fn symbol(index: u8) -> u8 {
    SYMBOLS[(index & 0x3F) as usize]
}

/// Alphabet index of `c`, or `None` if `c` is not a symbol.
///
/// Markers are not symbols; use [`marker_offset`] for those.
#[inline]
pub fn index_of(c: u8) -> Option<u8> {
    match SYMBOL_INDEX[c as usize] {
        NOT_A_SYMBOL => None,
        idx => Some(idx),
    }
}

/// Marker that announces `quartile`, or `None` for quartile 0.
#[inline]
pub fn marker(quartile: u8) -> Option<u8> {
    MARKERS.get(quartile as usize).copied().flatten()
}

/// Quartile base offset (64, 128 or 192) announced by marker `c`.
#[inline]
pub fn marker_offset(c: u8) -> Option<u8> {
    match MARKER_OFFSET[c as usize] {
        NOT_A_MARKER => None,
        offset => Some(offset),
    }
}

#[inline]
pub fn is_marker(c: u8) -> bool {
    MARKER_OFFSET[c as usize] != NOT_A_MARKER
}
