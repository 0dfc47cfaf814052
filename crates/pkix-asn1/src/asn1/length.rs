//! ASN.1 length octets (definite form only).

use pkix_types::Asn1Error;

/// Parse length octets from the start of `input`.
/// Returns the content length and the number of bytes consumed.
pub fn decode_length(input: &[u8]) -> Result<(usize, usize), Asn1Error> {
    let first = *input.first().ok_or(Asn1Error::Truncated {
        offset: 0,
        needed: 1,
    })?;

    if first < 0x80 {
        return Ok((first as usize, 1));
    }
    if first == 0x80 {
        // Indefinite length: BER only, never valid in DER
        return Err(Asn1Error::IndefiniteLength);
    }
    if first == 0xFF {
        return Err(Asn1Error::ReservedLength);
    }

    let num_bytes = (first & 0x7F) as usize;
    let available = input.len() - 1;
    if available < num_bytes {
        return Err(Asn1Error::Truncated {
            offset: input.len(),
            needed: num_bytes - available,
        });
    }

    let mut length: usize = 0;
    for &byte in &input[1..=num_bytes] {
        if length > (usize::MAX >> 8) {
            return Err(Asn1Error::LengthOverflow(num_bytes));
        }
        length = (length << 8) | byte as usize;
    }
    Ok((length, 1 + num_bytes))
}

/// Append the minimal definite-form length octets for `length` to `out`.
pub fn encode_length(length: usize, out: &mut Vec<u8>) {
    if length < 0x80 {
        out.push(length as u8);
        return;
    }
    let num_bytes = length_octets_len(length) - 1;
    out.push(0x80 | num_bytes as u8);
    for i in (0..num_bytes).rev() {
        out.push((length >> (8 * i)) as u8);
    }
}

/// Number of octets `encode_length` emits for `length`.
pub fn length_octets_len(length: usize) -> usize {
    if length < 0x80 {
        1
    } else {
        let significant_bits = usize::BITS - length.leading_zeros();
        1 + significant_bits.div_ceil(8) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;

    fn encode(length: usize) -> Vec<u8> {
        let mut out = Vec::new();
        encode_length(length, &mut out);
        out
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(encode(0), hex!("00"));
        assert_eq!(encode(127), hex!("7F"));
        assert_eq!(encode(128), hex!("81 80"));
        assert_eq!(encode(255), hex!("81 FF"));
        assert_eq!(encode(256), hex!("82 01 00"));
        assert_eq!(encode(65536), hex!("83 01 00 00"));
    }

    #[test]
    fn test_decode_boundaries() {
        assert_eq!(decode_length(&hex!("7F")).unwrap(), (127, 1));
        assert_eq!(decode_length(&hex!("81 80")).unwrap(), (128, 2));
        assert_eq!(decode_length(&hex!("83 01 00 00 AA")).unwrap(), (65536, 4));
    }

    #[test]
    fn test_non_minimal_long_form_is_accepted() {
        // BER permits padded length octets; strictness is enforced by the parser
        assert_eq!(decode_length(&hex!("82 00 05")).unwrap(), (5, 3));
    }

    #[test]
    fn test_indefinite_rejected() {
        assert_eq!(decode_length(&hex!("80")), Err(Asn1Error::IndefiniteLength));
    }

    #[test]
    fn test_reserved_rejected() {
        assert_eq!(decode_length(&hex!("FF")), Err(Asn1Error::ReservedLength));
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            decode_length(&hex!("82 01")),
            Err(Asn1Error::Truncated {
                offset: 2,
                needed: 1
            })
        );
        assert!(decode_length(&[]).is_err());
    }

    #[test]
    fn test_overflow() {
        let mut input = vec![0x80 | 9];
        input.extend_from_slice(&[0xFF; 9]);
        assert_eq!(decode_length(&input), Err(Asn1Error::LengthOverflow(9)));
    }

    proptest! {
        #[test]
        fn length_roundtrip(length: usize) {
            let bytes = encode(length);
            prop_assert_eq!(bytes.len(), length_octets_len(length));
            prop_assert_eq!(decode_length(&bytes).unwrap(), (length, bytes.len()));
        }
    }
}
