//! ASN.1 BER/DER encoding and decoding.

mod bit_string;
mod block;
mod decoder;
mod dump;
mod integer;
mod length;
mod parser;
mod strings;
mod tag;
mod time;
mod value;

pub use bit_string::BitString;
pub use block::Block;
pub use decoder::Decoder;
pub use integer::Integer;
pub use length::{decode_length, encode_length, length_octets_len};
pub use parser::Parser;
pub use tag::{decode_tag, encode_tag, tag_octets_len};
pub use time::Asn1Time;
pub use value::Value;

/// Universal tag numbers.
pub mod tags {
    pub const BOOLEAN: u32 = 1;
    pub const INTEGER: u32 = 2;
    pub const BIT_STRING: u32 = 3;
    pub const OCTET_STRING: u32 = 4;
    pub const NULL: u32 = 5;
    pub const OID: u32 = 6;
    pub const ENUMERATED: u32 = 10;
    pub const UTF8_STRING: u32 = 12;
    pub const SEQUENCE: u32 = 16;
    pub const SET: u32 = 17;
    pub const NUMERIC_STRING: u32 = 18;
    pub const PRINTABLE_STRING: u32 = 19;
    pub const TELETEX_STRING: u32 = 20;
    pub const IA5_STRING: u32 = 22;
    pub const UTC_TIME: u32 = 23;
    pub const GENERALIZED_TIME: u32 = 24;
    pub const VISIBLE_STRING: u32 = 26;
    pub const GENERAL_STRING: u32 = 27;
    pub const UNIVERSAL_STRING: u32 = 28;
    pub const BMP_STRING: u32 = 30;
}

/// Shift the offsets carried by a decode error raised on a sub-slice so that
/// they are relative to the start of the whole input.
pub(crate) fn rebase(err: pkix_types::Asn1Error, base: usize) -> pkix_types::Asn1Error {
    use pkix_types::Asn1Error;
    match err {
        Asn1Error::Truncated { offset, needed } => Asn1Error::Truncated {
            offset: offset + base,
            needed,
        },
        Asn1Error::ContentOverflow {
            offset,
            length,
            available,
        } => Asn1Error::ContentOverflow {
            offset: offset + base,
            length,
            available,
        },
        Asn1Error::TrailingData { offset } => Asn1Error::TrailingData {
            offset: offset + base,
        },
        other => other,
    }
}
