//! Hex decoding helpers for fixed-width values.

/// Failure to decode a hex string into a fixed-width value.
///
/// Only `PartialEq`: [`hex::FromHexError`] does not implement `Eq`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HexDecodeError {
    /// Not a hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// Valid hex of the wrong width.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Width required by the target type
        expected: usize,
        /// Width actually decoded
        actual: usize,
    },
}

/// Decode `s` into exactly `N` bytes.
///
/// # Errors
/// If `s` is not hex or does not decode to `N` bytes.
pub fn decode_fixed_hex<const N: usize>(s: &str) -> Result<[u8; N], HexDecodeError> {
    let bytes = hex::decode(s)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| HexDecodeError::InvalidLength {
            expected: N,
            actual,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_exact_width() {
        assert_eq!(decode_fixed_hex::<2>("beef"), Ok([0xbe, 0xef]));
        assert_eq!(decode_fixed_hex::<2>("BEEF"), Ok([0xbe, 0xef]));
    }

    #[test]
    fn rejects_odd_and_wrong_width() {
        assert!(matches!(
            decode_fixed_hex::<2>("bee"),
            Err(HexDecodeError::InvalidHex(_))
        ));
        assert_eq!(
            decode_fixed_hex::<2>("zzzz"),
            Err(HexDecodeError::InvalidHex(hex::FromHexError::InvalidHexCharacter {
                c: 'z',
                index: 0
            }))
        );
        assert_eq!(
            decode_fixed_hex::<4>("beef"),
            Err(HexDecodeError::InvalidLength {
                expected: 4,
                actual: 2
            })
        );
    }
}
