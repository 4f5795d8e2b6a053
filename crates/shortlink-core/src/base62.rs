//! Base-62 codec used for generated short codes.
//!
//! The alphabet is digits, then lowercase, then uppercase letters, so `0`
//! encodes as `"0"`, `61` as `"Z"` and `62` as `"10"`.

const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE: u64 = ALPHABET.len() as u64;

/// Longest encoding of a `u64` (`u64::MAX` is 11 base-62 digits).
pub const MAX_ENCODED_LEN: usize = 11;

/// Encodes `value` as a base-62 string with no padding.
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return String::from("0");
    }

    let mut buf = [0u8; MAX_ENCODED_LEN];
    let mut pos = MAX_ENCODED_LEN;
    while value > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(value % BASE) as usize];
        value /= BASE;
    }

    // every byte comes from the ASCII alphabet
    buf[pos..].iter().map(|&b| b as char).collect()
}

/// Decodes a base-62 string back into its integer value.
///
/// Returns `None` for an empty input, a character outside the alphabet, or a
/// value that does not fit in a `u64`.
pub fn decode(encoded: &str) -> Option<u64> {
    if encoded.is_empty() {
        return None;
    }

    encoded.bytes().try_fold(0u64, |acc, b| {
        let digit = digit_value(b)?;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

fn digit_value(b: u8) -> Option<u64> {
    let value = match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'z' => b - b'a' + 10,
        b'A'..=b'Z' => b - b'A' + 36,
        _ => return None,
    };
    Some(u64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_values() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(1), "1");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
        assert_eq!(encode(62), "10");
        assert_eq!(encode(62 * 62), "100");
    }

    #[test]
    fn max_value_fits_max_len() {
        let encoded = encode(u64::MAX);
        assert_eq!(encoded.len(), MAX_ENCODED_LEN);
        assert_eq!(decode(&encoded), Some(u64::MAX));
    }

    #[test]
    fn decode_reverses_encode() {
        for value in [1u64, 61, 62, 3843, 3844, 1_000_000, 56_800_235_583] {
            assert_eq!(decode(&encode(value)), Some(value));
        }
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("ab-c"), None);
        assert_eq!(decode("zzzzzzzzzzzz"), None); // overflows u64
    }
}
