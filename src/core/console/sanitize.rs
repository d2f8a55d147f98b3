//! Byte-level filtering for console lines.
//!
//! Kept separate from the transaction loop so it can be tested against
//! arbitrary escape/noise combinations in isolation.

/// Bytes stripped from a response line: prompt bleed-through, line
/// terminators and padding spaces.
const STRIPPED: [u8; 4] = [b'>', b'\r', b'\n', b' '];

/// Remove every occurrence of `>`, `\r`, `\n` and space from a raw
/// response line. Stripping the individual bytes also covers the `\r\n`
/// pair.
pub fn sanitize_line(line: &[u8]) -> Vec<u8> {
    line.iter()
        .copied()
        .filter(|b| !STRIPPED.contains(b))
        .collect()
}

/// True when `needle` occurs as a contiguous byte sequence in `haystack`.
/// Used for echo matching: the device reflects the command line verbatim,
/// possibly surrounded by prompt characters or terminal artifacts.
pub fn contains_subsequence(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.len() < needle.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
