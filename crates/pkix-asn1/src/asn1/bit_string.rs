//! ASN.1 BIT STRING with its unused-bits count.

use pkix_types::{Asn1Error, Tag};

use super::tags;

/// A BIT STRING value.
///
/// The content octets start with the number of unused bits in the final
/// octet (0..=7); the remaining octets carry the bits, most significant first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    unused_bits: u8,
    bytes: Vec<u8>,
}

impl BitString {
    pub fn new(unused_bits: u8, bytes: Vec<u8>) -> Result<Self, Asn1Error> {
        if unused_bits > 7 || (bytes.is_empty() && unused_bits != 0) {
            return Err(Asn1Error::invalid(
                tag(),
                format!("{unused_bits} unused bits with {} data octets", bytes.len()),
            ));
        }
        Ok(Self { unused_bits, bytes })
    }

    /// A bit string made of whole octets, e.g. a public key or signature.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            unused_bits: 0,
            bytes: bytes.into(),
        }
    }

    /// Encode a named-bit list (bit 0 first) with trailing zero bits removed,
    /// as DER requires for types such as KeyUsage.
    pub fn from_bits(bits: &[bool]) -> Self {
        let len = bits.iter().rposition(|&b| b).map_or(0, |i| i + 1);
        let mut bytes = vec![0u8; len.div_ceil(8)];
        for (i, &set) in bits[..len].iter().enumerate() {
            if set {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        let unused_bits = (bytes.len() * 8 - len) as u8;
        Self { unused_bits, bytes }
    }

    /// Decode BIT STRING content octets. With `strict`, padding bits must be zero.
    pub fn from_der_content(content: &[u8], strict: bool) -> Result<Self, Asn1Error> {
        let (&unused_bits, bytes) = content
            .split_first()
            .ok_or_else(|| Asn1Error::invalid(tag(), "missing unused-bits octet"))?;
        let bit_string = Self::new(unused_bits, bytes.to_vec())?;
        if strict && unused_bits > 0 {
            let mask = (1u8 << unused_bits) - 1;
            if bytes.last().is_some_and(|last| last & mask != 0) {
                return Err(Asn1Error::NonCanonical("non-zero BIT STRING padding"));
            }
        }
        Ok(bit_string)
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused_bits
    }

    /// Data octets including any padding bits in the last one.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 - self.unused_bits as usize
    }

    /// Bit `index`, counting from the most significant bit of the first octet.
    pub fn bit(&self, index: usize) -> bool {
        index < self.bit_len() && self.bytes[index / 8] & (0x80 >> (index % 8)) != 0
    }

    pub(crate) fn content_len(&self) -> usize {
        1 + self.bytes.len()
    }

    pub(crate) fn write_content(&self, out: &mut Vec<u8>) {
        out.push(self.unused_bits);
        out.extend_from_slice(&self.bytes);
    }
}

fn tag() -> Tag {
    Tag::universal(tags::BIT_STRING, false)
}
