//! ASN.1 identifier octets.

use pkix_types::{Asn1Error, Tag, TagClass};

/// Parse identifier octets from the start of `input`.
/// Returns the tag and number of bytes consumed.
pub fn decode_tag(input: &[u8]) -> Result<(Tag, usize), Asn1Error> {
    let first = *input.first().ok_or(Asn1Error::Truncated {
        offset: 0,
        needed: 1,
    })?;

    let class = TagClass::from_identifier(first);
    let constructed = (first & 0x20) != 0;

    let low_bits = first & 0x1F;
    if low_bits < 0x1F {
        return Ok((Tag::new(class, constructed, low_bits as u32), 1));
    }

    // Long form: base-128, high bit set on every octet but the last
    let mut number: u32 = 0;
    let mut i = 1;
    loop {
        let byte = *input.get(i).ok_or(Asn1Error::Truncated {
            offset: i,
            needed: 1,
        })?;
        if i == 1 && byte == 0x80 {
            return Err(Asn1Error::NonCanonical("leading zero in tag number"));
        }
        if number > (u32::MAX >> 7) {
            return Err(Asn1Error::TagNumberOverflow);
        }
        number = (number << 7) | (byte & 0x7F) as u32;
        i += 1;
        if (byte & 0x80) == 0 {
            break;
        }
    }
    if number < 0x1F {
        return Err(Asn1Error::NonCanonical("long-form tag number below 31"));
    }
    Ok((Tag::new(class, constructed, number), i))
}

/// Append the identifier octets for `tag` to `out`.
pub fn encode_tag(tag: &Tag, out: &mut Vec<u8>) {
    let constructed_bit = if tag.constructed { 0x20 } else { 0x00 };
    let lead = tag.class.bits() | constructed_bit;

    if tag.number < 0x1F {
        out.push(lead | tag.number as u8);
        return;
    }

    out.push(lead | 0x1F);
    let groups = base128_len(tag.number);
    for i in (0..groups).rev() {
        let septet = ((tag.number >> (7 * i)) & 0x7F) as u8;
        out.push(if i == 0 { septet } else { septet | 0x80 });
    }
}

/// Number of identifier octets `encode_tag` emits for `tag`.
pub fn tag_octets_len(tag: &Tag) -> usize {
    if tag.number < 0x1F {
        1
    } else {
        1 + base128_len(tag.number)
    }
}

fn base128_len(mut n: u32) -> usize {
    let mut len = 1;
    while n >= 0x80 {
        n >>= 7;
        len += 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(tag: Tag) -> Vec<u8> {
        let mut out = Vec::new();
        encode_tag(&tag, &mut out);
        out
    }

    #[test]
    fn test_parse_simple_tag() {
        let (tag, len) = decode_tag(&[0x30]).unwrap();
        assert_eq!(tag.class, TagClass::Universal);
        assert!(tag.constructed);
        assert_eq!(tag.number, 0x10);
        assert_eq!(len, 1);
    }

    #[test]
    fn test_tag_31_uses_long_form() {
        let tag = Tag::context(31, true);
        assert_eq!(encode(tag), vec![0x80 | 0x20 | 0x1F, 0x1F]);
        assert_eq!(decode_tag(&[0xBF, 0x1F]).unwrap(), (tag, 2));
    }

    #[test]
    fn test_tag_300_multi_octet() {
        let tag = Tag::new(TagClass::Application, false, 300);
        let bytes = encode(tag);
        // 300 = 0b10_0101100 -> 0x82 0x2C
        assert_eq!(bytes, vec![0x5F, 0x82, 0x2C]);
        assert_eq!(tag_octets_len(&tag), 3);
        assert_eq!(decode_tag(&bytes).unwrap(), (tag, 3));
    }

    #[test]
    fn test_truncated_long_form() {
        assert_eq!(
            decode_tag(&[0x1F, 0x82]),
            Err(Asn1Error::Truncated {
                offset: 2,
                needed: 1
            })
        );
        assert!(matches!(
            decode_tag(&[]),
            Err(Asn1Error::Truncated { offset: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_padded_and_short_long_forms() {
        assert!(matches!(
            decode_tag(&[0x1F, 0x80, 0x20]),
            Err(Asn1Error::NonCanonical(_))
        ));
        assert!(matches!(
            decode_tag(&[0x1F, 0x05]),
            Err(Asn1Error::NonCanonical(_))
        ));
        // rejected by the default lenient parser too
        assert!(crate::Block::from_ber(&[0x1F, 0x80, 0x20, 0x00]).is_err());
        assert!(crate::Block::from_ber(&[0x1F, 0x05, 0x00]).is_err());
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            decode_tag(&[0x1F, 0x8F, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]),
            Err(Asn1Error::TagNumberOverflow)
        );
        let max = Tag::context(u32::MAX, false);
        assert_eq!(decode_tag(&encode(max)).unwrap().0, max);
    }

    proptest! {
        #[test]
        fn tag_roundtrip(class in 0u8..4, constructed: bool, number: u32) {
            let tag = Tag::new(TagClass::from_identifier(class << 6), constructed, number);
            let bytes = encode(tag);
            prop_assert_eq!(bytes.len(), tag_octets_len(&tag));
            prop_assert_eq!(decode_tag(&bytes).unwrap(), (tag, bytes.len()));
        }
    }
}
