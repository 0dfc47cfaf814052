//! The universal type set.
//!
//! Each universal tag number the codec understands maps to one `Value`
//! variant; [`Value::decode_primitive`] is the tag-number table used by the
//! parser and [`Value::write_content`] is its inverse. Content under
//! non-universal tags (and unknown universal numbers) stays generic as
//! [`Value::Primitive`] or [`Value::Constructed`] until the schema layer
//! reinterprets it.

use pkix_types::{Asn1Error, Tag};

use super::{strings, tags, Asn1Time, BitString, Block, Integer};
use crate::config::SetOrdering;
use crate::oid::Oid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Boolean(bool),
    Integer(Integer),
    Enumerated(Integer),
    BitString(BitString),
    OctetString(Vec<u8>),
    Null,
    ObjectIdentifier(Oid),
    Utf8String(String),
    NumericString(String),
    PrintableString(String),
    TeletexString(String),
    Ia5String(String),
    VisibleString(String),
    GeneralString(String),
    UniversalString(String),
    BmpString(String),
    UtcTime(Asn1Time),
    GeneralizedTime(Asn1Time),
    Sequence(Vec<Block>),
    Set(Vec<Block>),
    /// Constructed content under a tag the codec does not interpret.
    Constructed(Vec<Block>),
    /// Primitive content under a tag the codec does not interpret.
    Primitive(Vec<u8>),
}

impl Value {
    /// Universal tag number of typed variants; `None` for the generic ones.
    pub fn tag_number(&self) -> Option<u32> {
        let number = match self {
            Value::Boolean(_) => tags::BOOLEAN,
            Value::Integer(_) => tags::INTEGER,
            Value::Enumerated(_) => tags::ENUMERATED,
            Value::BitString(_) => tags::BIT_STRING,
            Value::OctetString(_) => tags::OCTET_STRING,
            Value::Null => tags::NULL,
            Value::ObjectIdentifier(_) => tags::OID,
            Value::Utf8String(_) => tags::UTF8_STRING,
            Value::NumericString(_) => tags::NUMERIC_STRING,
            Value::PrintableString(_) => tags::PRINTABLE_STRING,
            Value::TeletexString(_) => tags::TELETEX_STRING,
            Value::Ia5String(_) => tags::IA5_STRING,
            Value::VisibleString(_) => tags::VISIBLE_STRING,
            Value::GeneralString(_) => tags::GENERAL_STRING,
            Value::UniversalString(_) => tags::UNIVERSAL_STRING,
            Value::BmpString(_) => tags::BMP_STRING,
            Value::UtcTime(_) => tags::UTC_TIME,
            Value::GeneralizedTime(_) => tags::GENERALIZED_TIME,
            Value::Sequence(_) => tags::SEQUENCE,
            Value::Set(_) => tags::SET,
            Value::Constructed(_) | Value::Primitive(_) => return None,
        };
        Some(number)
    }

    /// The natural universal tag of typed variants.
    pub fn universal_tag(&self) -> Option<Tag> {
        self.tag_number()
            .map(|number| Tag::universal(number, self.is_constructed()))
    }

    pub fn is_constructed(&self) -> bool {
        matches!(
            self,
            Value::Sequence(_) | Value::Set(_) | Value::Constructed(_)
        )
    }

    /// Child nodes of constructed variants.
    pub fn children(&self) -> Option<&[Block]> {
        match self {
            Value::Sequence(c) | Value::Set(c) | Value::Constructed(c) => Some(c),
            _ => None,
        }
    }

    /// Text of any string variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8String(s)
            | Value::NumericString(s)
            | Value::PrintableString(s)
            | Value::TeletexString(s)
            | Value::Ia5String(s)
            | Value::VisibleString(s)
            | Value::GeneralString(s)
            | Value::UniversalString(s)
            | Value::BmpString(s) => Some(s),
            _ => None,
        }
    }

    /// Check that the value can be encoded under its natural tag.
    pub(crate) fn validate(&self) -> Result<(), Asn1Error> {
        match self {
            Value::UtcTime(t) => t.to_utc_time_string().map(|_| ()),
            _ => match (self.tag_number(), self.as_str()) {
                (Some(number), Some(s)) => strings::validate(number, s),
                _ => Ok(()),
            },
        }
    }

    /// Decode primitive content octets for universal tag `number`.
    ///
    /// In `strict` mode BER-only forms are rejected with
    /// [`Asn1Error::NonCanonical`]; otherwise they are accepted and the value
    /// is normalized.
    pub fn decode_primitive(number: u32, content: &[u8], strict: bool) -> Result<Value, Asn1Error> {
        let tag = Tag::universal(number, false);
        let value = match number {
            tags::BOOLEAN => {
                let [octet] = content else {
                    return Err(Asn1Error::invalid(tag, format!("length {}", content.len())));
                };
                if *octet != 0x00 && *octet != 0xFF {
                    if strict {
                        return Err(Asn1Error::NonCanonical("BOOLEAN true not encoded as 0xFF"));
                    }
                    log::debug!("accepting BOOLEAN true encoded as {octet:#04x}");
                }
                Value::Boolean(*octet != 0)
            }
            tags::INTEGER | tags::ENUMERATED => {
                let integer = Integer::from_der_content(content)?;
                if integer.as_bytes().len() != content.len() {
                    if strict {
                        return Err(Asn1Error::NonCanonical("non-minimal INTEGER encoding"));
                    }
                    log::debug!("normalizing {}-octet non-minimal INTEGER", content.len());
                }
                if number == tags::INTEGER {
                    Value::Integer(integer)
                } else {
                    Value::Enumerated(integer)
                }
            }
            tags::BIT_STRING => Value::BitString(BitString::from_der_content(content, strict)?),
            tags::OCTET_STRING => Value::OctetString(content.to_vec()),
            tags::NULL => {
                if !content.is_empty() {
                    return Err(Asn1Error::invalid(tag, "NULL with content"));
                }
                Value::Null
            }
            tags::OID => Value::ObjectIdentifier(Oid::from_content(content)?),
            tags::UTC_TIME => Value::UtcTime(Asn1Time::parse_utc_time(ascii(tag, content)?, strict)?),
            tags::GENERALIZED_TIME => {
                Value::GeneralizedTime(Asn1Time::parse_generalized_time(ascii(tag, content)?, strict)?)
            }
            tags::SEQUENCE | tags::SET => {
                return Err(Asn1Error::invalid(tag, "must be constructed"));
            }
            tags::UTF8_STRING => Value::Utf8String(strings::decode(number, content)?),
            tags::NUMERIC_STRING => Value::NumericString(strings::decode(number, content)?),
            tags::PRINTABLE_STRING => Value::PrintableString(strings::decode(number, content)?),
            tags::TELETEX_STRING => Value::TeletexString(strings::decode(number, content)?),
            tags::IA5_STRING => Value::Ia5String(strings::decode(number, content)?),
            tags::VISIBLE_STRING => Value::VisibleString(strings::decode(number, content)?),
            tags::GENERAL_STRING => Value::GeneralString(strings::decode(number, content)?),
            tags::UNIVERSAL_STRING => Value::UniversalString(strings::decode(number, content)?),
            tags::BMP_STRING => Value::BmpString(strings::decode(number, content)?),
            _ => Value::Primitive(content.to_vec()),
        };
        Ok(value)
    }

    /// Content octets in list order for constructed values.
    pub fn encode_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.content_len());
        self.write_content(&mut out, SetOrdering::Preserve);
        out
    }

    /// Length of the content octets, computed without encoding them.
    pub fn content_len(&self) -> usize {
        match self {
            Value::Boolean(_) => 1,
            Value::Integer(i) | Value::Enumerated(i) => i.as_bytes().len(),
            Value::BitString(b) => b.content_len(),
            Value::OctetString(bytes) | Value::Primitive(bytes) => bytes.len(),
            Value::Null => 0,
            Value::ObjectIdentifier(oid) => oid.content_len(),
            Value::UtcTime(_) => 13,
            Value::GeneralizedTime(t) => t.to_generalized_time_string().len(),
            Value::Sequence(children) | Value::Set(children) | Value::Constructed(children) => {
                children.iter().map(Block::encoded_len).sum()
            }
            _ => match (self.tag_number(), self.as_str()) {
                (Some(number), Some(s)) => strings::encoded_len(number, s),
                _ => 0,
            },
        }
    }

    pub(crate) fn write_content(&self, out: &mut Vec<u8>, ordering: SetOrdering) {
        match self {
            Value::Boolean(b) => out.push(if *b { 0xFF } else { 0x00 }),
            Value::Integer(i) | Value::Enumerated(i) => out.extend_from_slice(i.as_bytes()),
            Value::BitString(b) => b.write_content(out),
            Value::OctetString(bytes) | Value::Primitive(bytes) => out.extend_from_slice(bytes),
            Value::Null => {}
            Value::ObjectIdentifier(oid) => oid.write_content(out),
            Value::UtcTime(t) => out.extend_from_slice(t.utc_time_digits().as_bytes()),
            Value::GeneralizedTime(t) => {
                out.extend_from_slice(t.to_generalized_time_string().as_bytes())
            }
            Value::Set(children) if ordering == SetOrdering::DerSorted => {
                let mut encodings: Vec<Vec<u8>> = children
                    .iter()
                    .map(|child| {
                        let mut buf = Vec::with_capacity(child.encoded_len());
                        child.write_encoded(&mut buf, ordering);
                        buf
                    })
                    .collect();
                encodings.sort();
                for encoding in encodings {
                    out.extend_from_slice(&encoding);
                }
            }
            Value::Sequence(children) | Value::Set(children) | Value::Constructed(children) => {
                for child in children {
                    child.write_encoded(out, ordering);
                }
            }
            _ => {
                if let (Some(number), Some(s)) = (self.tag_number(), self.as_str()) {
                    strings::encode(number, s, out);
                }
            }
        }
    }
}

fn ascii(tag: Tag, content: &[u8]) -> Result<&str, Asn1Error> {
    std::str::from_utf8(content)
        .ok()
        .filter(|s| s.is_ascii())
        .ok_or_else(|| Asn1Error::invalid(tag, "non-ASCII time"))
}
