//! Little-endian byte/number codec (component C1).
//!
//! A faithful Rust reading of `original_source/src/util/tannhauser/numbers/bytes.go`'s
//! `B2Uint64L`/`Ui64ToBL` pair, narrowed to the one direction the pipeline
//! actually needs.

/// Decodes an 8-byte little-endian slice into a `u64`.
///
/// # Panics
///
/// Panics if `b.len() != 8`, matching the Go original's unchecked slice
/// indexing (`input[7-i]` on anything but an 8-byte slice is itself a bug).
pub fn bytes_to_u64_le(b: &[u8]) -> u64 {
    assert_eq!(b.len(), 8, "bytes_to_u64_le requires an 8-byte slice");
    let mut buf = [0u8; 8];
    buf.copy_from_slice(b);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        for x in [0u64, 1, 42, u64::MAX, u64::MAX / 3, 1 << 40] {
            let bytes = x.to_le_bytes();
            assert_eq!(bytes_to_u64_le(&bytes), x);
        }
    }

    #[test]
    fn decodes_known_bytes() {
        let b = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(bytes_to_u64_le(&b), 1);

        let b = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
        assert_eq!(bytes_to_u64_le(&b), u64::MAX);
    }

    #[test]
    #[should_panic]
    fn rejects_wrong_length() {
        bytes_to_u64_le(&[0u8; 7]);
    }
}
