//! Message payload encoding
//!
//! Inbound payloads are fixed-capacity byte buffers holding ASCII digits,
//! optionally followed by a zero terminator. Outbound counts are sent as
//! plain decimal ASCII.

use core::fmt::Write;

use heapless::{String, Vec};

/// Capacity of an inbound payload buffer in bytes
pub const PAYLOAD_CAPACITY: usize = 1024;

/// Maximum decimal digits of a `u32`
pub const COUNT_DIGITS: usize = 10;

/// Bounded inbound payload
pub type Payload = Vec<u8, PAYLOAD_CAPACITY>;

/// Decimal ASCII rendering of a count
pub type CountText = String<COUNT_DIGITS>;

/// Parse an ASCII-digit payload into an integer
///
/// Scans until the first zero byte or the end of the slice. Each byte
/// contributes `byte - b'0'` as a digit. Bytes outside `'0'..='9'` are not
/// rejected and corrupt the result; arithmetic wraps instead of overflowing.
/// Publishers of count targets rely on this leniency.
pub fn bytes_to_int(payload: &[u8]) -> u32 {
    let mut result: u32 = 0;
    for &byte in payload {
        if byte == 0 {
            break;
        }
        let digit = u32::from(byte).wrapping_sub(u32::from(b'0'));
        result = result.wrapping_mul(10).wrapping_add(digit);
    }
    result
}

/// Check whether a payload carries data
///
/// A payload whose first byte is the terminator counts as empty.
pub fn has_content(payload: &[u8]) -> bool {
    payload.first().is_some_and(|&b| b != 0)
}

/// Copy raw bytes into a bounded payload, truncating at capacity
pub fn payload_from_bytes(bytes: &[u8]) -> Payload {
    let len = bytes.len().min(PAYLOAD_CAPACITY);
    let mut payload = Payload::new();
    // Cannot fail: length is clamped to capacity
    let _ = payload.extend_from_slice(&bytes[..len]);
    payload
}

/// Render a count as decimal ASCII
pub fn format_count(value: u32) -> CountText {
    let mut text = CountText::new();
    // Cannot fail: u32::MAX has ten digits
    let _ = write!(text, "{}", value);
    text
}
