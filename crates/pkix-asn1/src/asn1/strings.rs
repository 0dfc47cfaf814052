//! Character-set rules for the ASN.1 restricted string types.

use pkix_types::{Asn1Error, Tag};

use super::tags;

fn tag(number: u32) -> Tag {
    Tag::universal(number, false)
}

fn is_printable(c: char) -> bool {
    c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
}

fn is_numeric(c: char) -> bool {
    c.is_ascii_digit() || c == ' '
}

fn is_visible(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Check that `s` only uses characters the string type `number` allows.
pub(crate) fn validate(number: u32, s: &str) -> Result<(), Asn1Error> {
    let allowed: fn(char) -> bool = match number {
        tags::PRINTABLE_STRING => is_printable,
        tags::NUMERIC_STRING => is_numeric,
        tags::VISIBLE_STRING => is_visible,
        tags::IA5_STRING => |c: char| c.is_ascii(),
        tags::TELETEX_STRING | tags::GENERAL_STRING => |c: char| (c as u32) <= 0xFF,
        tags::BMP_STRING => |c: char| (c as u32) <= 0xFFFF,
        _ => return Ok(()),
    };
    match s.chars().find(|&c| !allowed(c)) {
        Some(c) => Err(Asn1Error::invalid(
            tag(number),
            format!("character {c:?} not allowed"),
        )),
        None => Ok(()),
    }
}

/// Decode string content octets for universal string type `number`.
pub(crate) fn decode(number: u32, content: &[u8]) -> Result<String, Asn1Error> {
    let s = match number {
        tags::UTF8_STRING => String::from_utf8(content.to_vec())
            .map_err(|_| Asn1Error::invalid(tag(number), "invalid UTF-8"))?,
        // T.61 and GeneralString are decoded as Latin-1
        tags::TELETEX_STRING | tags::GENERAL_STRING => {
            content.iter().map(|&b| b as char).collect()
        }
        tags::BMP_STRING => {
            if content.len() % 2 != 0 {
                return Err(Asn1Error::invalid(tag(number), "odd length"));
            }
            let units = content
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|_| Asn1Error::invalid(tag(number), "unpaired surrogate"))?
        }
        tags::UNIVERSAL_STRING => {
            if content.len() % 4 != 0 {
                return Err(Asn1Error::invalid(tag(number), "length not a multiple of 4"));
            }
            content
                .chunks_exact(4)
                .map(|quad| {
                    let code = u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]);
                    char::from_u32(code).ok_or_else(|| {
                        Asn1Error::invalid(tag(number), format!("invalid code point {code:#x}"))
                    })
                })
                .collect::<Result<String, _>>()?
        }
        _ => {
            let s = std::str::from_utf8(content)
                .map_err(|_| Asn1Error::invalid(tag(number), "non-ASCII octet"))?;
            validate(number, s)?;
            s.to_owned()
        }
    };
    Ok(s)
}

/// Encoded content length of `s` as string type `number`.
pub(crate) fn encoded_len(number: u32, s: &str) -> usize {
    match number {
        tags::TELETEX_STRING | tags::GENERAL_STRING => s.chars().count(),
        tags::BMP_STRING => s.encode_utf16().count() * 2,
        tags::UNIVERSAL_STRING => s.chars().count() * 4,
        _ => s.len(),
    }
}

/// Append the content octets of `s` as string type `number`. The value must
/// already have passed [`validate`].
pub(crate) fn encode(number: u32, s: &str, out: &mut Vec<u8>) {
    match number {
        tags::TELETEX_STRING | tags::GENERAL_STRING => {
            out.extend(s.chars().map(|c| c as u32 as u8));
        }
        tags::BMP_STRING => {
            for unit in s.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        tags::UNIVERSAL_STRING => {
            for c in s.chars() {
                out.extend_from_slice(&(c as u32).to_be_bytes());
            }
        }
        _ => out.extend_from_slice(s.as_bytes()),
    }
}
