//! The tagged-value tree.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use pkix_types::{Asn1Error, SchemaError, Tag, TagClass};

use super::length::{encode_length, length_octets_len};
use super::tag::{encode_tag, tag_octets_len};
use super::{tags, Asn1Time, BitString, Integer, Parser, Value};
use crate::config::{CodecConfig, SetOrdering};
use crate::oid::Oid;

/// The bytes a node was decoded from, shared with the rest of its tree.
#[derive(Clone)]
pub(crate) struct RawSpan {
    source: Arc<[u8]>,
    start: usize,
    header_len: usize,
    end: usize,
}

impl RawSpan {
    pub(crate) fn new(source: Arc<[u8]>, start: usize, header_len: usize, end: usize) -> Self {
        Self {
            source,
            start,
            header_len,
            end,
        }
    }

    fn bytes(&self) -> &[u8] {
        &self.source[self.start..self.end]
    }
}

/// One node of a BER/DER tree: a tag plus either typed primitive content or
/// a list of children.
///
/// Blocks are immutable. Decoded blocks remember the exact bytes they came
/// from (see [`Block::original_bytes`]); every operation that changes a node
/// returns a new one without them.
///
/// Equality compares DER encodings.
#[derive(Clone)]
pub struct Block {
    tag: Tag,
    value: Value,
    raw: Option<RawSpan>,
}

impl Block {
    fn typed(number: u32, value: Value) -> Self {
        Self {
            tag: Tag::universal(number, value.is_constructed()),
            value,
            raw: None,
        }
    }

    pub(crate) fn decoded(tag: Tag, value: Value, raw: RawSpan) -> Self {
        Self {
            tag,
            value,
            raw: Some(raw),
        }
    }

    /// Node for `value` under `tag`.
    ///
    /// Under a universal tag, generic content is decoded into the matching
    /// typed variant and a typed value must carry that same tag number.
    /// Under any other tag, typed values are stored by their content octets
    /// (implicit tagging).
    pub fn tagged(tag: Tag, value: Value) -> Result<Self, Asn1Error> {
        value.validate()?;
        let value = match (tag.is_universal(), value) {
            (false, Value::Sequence(c) | Value::Set(c) | Value::Constructed(c)) => {
                Value::Constructed(c)
            }
            (false, Value::Primitive(bytes)) => Value::Primitive(bytes),
            (false, typed) => Value::Primitive(typed.encode_content()),
            (true, Value::Constructed(c)) => match tag.number {
                tags::SEQUENCE => Value::Sequence(c),
                tags::SET => Value::Set(c),
                _ => Value::Constructed(c),
            },
            (true, Value::Primitive(bytes)) => Value::decode_primitive(tag.number, &bytes, false)?,
            (true, typed) => {
                if typed.tag_number() != Some(tag.number) {
                    return Err(Asn1Error::unencodable(
                        tag,
                        format!("value has natural tag {:?}", typed.universal_tag()),
                    ));
                }
                typed
            }
        };
        Ok(Self {
            tag: Tag {
                constructed: value.is_constructed(),
                ..tag
            },
            value,
            raw: None,
        })
    }

    /// Node for a typed value under its natural universal tag.
    pub fn from_value(value: Value) -> Result<Self, Asn1Error> {
        match value.universal_tag() {
            Some(tag) => Self::tagged(tag, value),
            None => Err(Asn1Error::unencodable(
                Tag::universal(0, value.is_constructed()),
                "generic content needs an explicit tag",
            )),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(tags::BOOLEAN, Value::Boolean(value))
    }

    pub fn integer(value: impl Into<Integer>) -> Self {
        Self::typed(tags::INTEGER, Value::Integer(value.into()))
    }

    pub fn enumerated(value: impl Into<Integer>) -> Self {
        Self::typed(tags::ENUMERATED, Value::Enumerated(value.into()))
    }

    pub fn bit_string(value: BitString) -> Self {
        Self::typed(tags::BIT_STRING, Value::BitString(value))
    }

    pub fn octet_string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::typed(tags::OCTET_STRING, Value::OctetString(bytes.into()))
    }

    pub fn null() -> Self {
        Self::typed(tags::NULL, Value::Null)
    }

    pub fn oid(oid: Oid) -> Self {
        Self::typed(tags::OID, Value::ObjectIdentifier(oid))
    }

    pub fn utf8_string(s: impl Into<String>) -> Self {
        Self::typed(tags::UTF8_STRING, Value::Utf8String(s.into()))
    }

    pub fn universal_string(s: impl Into<String>) -> Self {
        Self::typed(tags::UNIVERSAL_STRING, Value::UniversalString(s.into()))
    }

    pub fn printable_string(s: impl Into<String>) -> Result<Self, Asn1Error> {
        Self::from_value(Value::PrintableString(s.into()))
    }

    pub fn ia5_string(s: impl Into<String>) -> Result<Self, Asn1Error> {
        Self::from_value(Value::Ia5String(s.into()))
    }

    pub fn numeric_string(s: impl Into<String>) -> Result<Self, Asn1Error> {
        Self::from_value(Value::NumericString(s.into()))
    }

    pub fn visible_string(s: impl Into<String>) -> Result<Self, Asn1Error> {
        Self::from_value(Value::VisibleString(s.into()))
    }

    pub fn teletex_string(s: impl Into<String>) -> Result<Self, Asn1Error> {
        Self::from_value(Value::TeletexString(s.into()))
    }

    pub fn bmp_string(s: impl Into<String>) -> Result<Self, Asn1Error> {
        Self::from_value(Value::BmpString(s.into()))
    }

    /// UTCTime; fails outside 1950..=2049 or with a fractional second.
    pub fn utc_time(time: Asn1Time) -> Result<Self, Asn1Error> {
        Self::from_value(Value::UtcTime(time))
    }

    pub fn generalized_time(time: Asn1Time) -> Self {
        Self::typed(tags::GENERALIZED_TIME, Value::GeneralizedTime(time))
    }

    pub fn sequence(children: Vec<Block>) -> Self {
        Self::typed(tags::SEQUENCE, Value::Sequence(children))
    }

    pub fn set(children: Vec<Block>) -> Self {
        Self::typed(tags::SET, Value::Set(children))
    }

    /// Constructed node with `children` under `tag` (any class).
    pub fn constructed(tag: Tag, children: Vec<Block>) -> Self {
        let value = match (tag.class, tag.number) {
            (TagClass::Universal, tags::SEQUENCE) => Value::Sequence(children),
            (TagClass::Universal, tags::SET) => Value::Set(children),
            _ => Value::Constructed(children),
        };
        Self {
            tag: Tag {
                constructed: true,
                ..tag
            },
            value,
            raw: None,
        }
    }

    /// Primitive node with raw `content` under `tag`. Universal content is
    /// decoded (leniently) into its typed variant.
    pub fn primitive(tag: Tag, content: impl Into<Vec<u8>>) -> Result<Self, Asn1Error> {
        Self::tagged(
            Tag {
                constructed: false,
                ..tag
            },
            Value::Primitive(content.into()),
        )
    }

    /// `[number] IMPLICIT`: `inner`'s content under a context tag.
    pub fn implicit(number: u32, inner: Block) -> Self {
        let constructed = inner.value.is_constructed();
        let value = match inner.value {
            Value::Sequence(c) | Value::Set(c) | Value::Constructed(c) => Value::Constructed(c),
            Value::Primitive(bytes) => Value::Primitive(bytes),
            typed => Value::Primitive(typed.encode_content()),
        };
        Self {
            tag: Tag::context(number, constructed),
            value,
            raw: None,
        }
    }

    /// `[number] EXPLICIT`: a constructed context tag wrapping `inner`.
    pub fn explicit(number: u32, inner: Block) -> Self {
        Self {
            tag: Tag::context(number, true),
            value: Value::Constructed(vec![inner]),
            raw: None,
        }
    }

    /// Parse exactly one element with the default configuration.
    pub fn from_ber(input: &[u8]) -> Result<Self, Asn1Error> {
        Parser::default().parse(input)
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn is_constructed(&self) -> bool {
        self.tag.constructed
    }

    /// Child nodes; empty for primitives.
    pub fn children(&self) -> &[Block] {
        self.value.children().unwrap_or(&[])
    }

    /// True for a context-specific tag with this number.
    pub fn is_context(&self, number: u32) -> bool {
        self.tag.class == TagClass::ContextSpecific && self.tag.number == number
    }

    /// New node with the same tag and different children.
    pub fn with_children(&self, children: Vec<Block>) -> Block {
        Self::constructed(self.tag, children)
    }

    /// New node with the same tag and a different value.
    pub fn with_value(&self, value: Value) -> Result<Block, Asn1Error> {
        Self::tagged(self.tag, value)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&Integer> {
        match &self.value {
            Value::Integer(i) | Value::Enumerated(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match &self.value {
            Value::ObjectIdentifier(oid) => Some(oid),
            _ => None,
        }
    }

    pub fn as_bit_string(&self) -> Option<&BitString> {
        match &self.value {
            Value::BitString(bs) => Some(bs),
            _ => None,
        }
    }

    pub fn as_octet_string(&self) -> Option<&[u8]> {
        match &self.value {
            Value::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }

    pub fn as_time(&self) -> Option<&Asn1Time> {
        match &self.value {
            Value::UtcTime(t) | Value::GeneralizedTime(t) => Some(t),
            _ => None,
        }
    }

    /// Raw content of a primitive the codec did not interpret.
    pub fn primitive_content(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Primitive(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Small two's-complement integer read straight from INTEGER, ENUMERATED
    /// or uninterpreted primitive content. `None` beyond eight octets.
    pub fn numeric_value(&self) -> Option<i64> {
        let content: &[u8] = match &self.value {
            Value::Integer(i) | Value::Enumerated(i) => i.as_bytes(),
            Value::Primitive(bytes) => bytes,
            _ => return None,
        };
        if content.is_empty() || content.len() > 8 {
            return None;
        }
        let fill = if content[0] & 0x80 != 0 { 0xFF } else { 0x00 };
        let mut buf = [fill; 8];
        buf[8 - content.len()..].copy_from_slice(content);
        Some(i64::from_be_bytes(buf))
    }

    /// Content octets: children's encodings in list order, or the primitive
    /// content.
    pub fn encode_content(&self) -> Vec<u8> {
        self.value.encode_content()
    }

    /// Total encoded size (tag, length and content), computed without
    /// encoding.
    pub fn encoded_len(&self) -> usize {
        let content_len = self.value.content_len();
        tag_octets_len(&self.tag) + length_octets_len(content_len) + content_len
    }

    pub(crate) fn write_encoded(&self, out: &mut Vec<u8>, ordering: SetOrdering) {
        encode_tag(&self.tag, out);
        encode_length(self.value.content_len(), out);
        self.value.write_content(out, ordering);
    }

    /// Definite-length encoding with minimal length octets and SET members
    /// in stored order.
    pub fn to_ber(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_encoded(&mut out, SetOrdering::Preserve);
        out
    }

    /// Encoding under `config`'s SET ordering.
    pub fn to_ber_with(&self, config: &CodecConfig) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.write_encoded(&mut out, config.set_ordering);
        out
    }

    /// The exact bytes this node was decoded from, if it was decoded.
    pub fn original_bytes(&self) -> Option<&[u8]> {
        self.raw.as_ref().map(RawSpan::bytes)
    }

    /// Offset of the node in its source buffer and its header length.
    pub(crate) fn position(&self) -> Option<(usize, usize)> {
        self.raw.as_ref().map(|raw| (raw.start, raw.header_len))
    }

    /// Encoding that reuses original bytes wherever a node is unmodified, so
    /// decoded-but-unmodeled content survives byte for byte.
    pub fn preserved_encoding(&self) -> Cow<'_, [u8]> {
        match self.original_bytes() {
            Some(bytes) => Cow::Borrowed(bytes),
            None => {
                let mut out = Vec::with_capacity(self.encoded_len());
                self.write_preserved(&mut out);
                Cow::Owned(out)
            }
        }
    }

    fn write_preserved(&self, out: &mut Vec<u8>) {
        if let Some(bytes) = self.original_bytes() {
            out.extend_from_slice(bytes);
            return;
        }
        match self.value.children() {
            Some(children) => {
                let mut content = Vec::new();
                for child in children {
                    child.write_preserved(&mut content);
                }
                encode_tag(&self.tag, out);
                encode_length(content.len(), out);
                out.extend_from_slice(&content);
            }
            None => self.write_encoded(out, SetOrdering::Preserve),
        }
    }

    /// Treat an implicitly tagged node as universal type `number`.
    pub fn reinterpret_implicit(&self, number: u32) -> Result<Block, Asn1Error> {
        let value = match &self.value {
            Value::Sequence(c) | Value::Set(c) | Value::Constructed(c) => {
                Value::Constructed(c.clone())
            }
            Value::Primitive(bytes) => Value::Primitive(bytes.clone()),
            typed => Value::Primitive(typed.encode_content()),
        };
        Self::tagged(Tag::universal(number, self.tag.constructed), value)
    }

    fn mismatch(&self, context: &'static str, expected: Tag) -> SchemaError {
        SchemaError::UnexpectedTag {
            context,
            expected,
            actual: self.tag,
        }
    }

    /// The single child of an explicitly tagged node.
    pub fn explicit_inner(&self, context: &'static str) -> Result<&Block, SchemaError> {
        if self.tag.is_universal() || !self.tag.constructed {
            let expected = Tag::new(self.tag.class, true, self.tag.number);
            return Err(self.mismatch(context, expected));
        }
        match self.children() {
            [inner] => Ok(inner),
            [] => Err(SchemaError::MissingField {
                context,
                field: "explicitly tagged value",
            }),
            [_, rest @ ..] => Err(SchemaError::UnexpectedElements {
                context,
                count: rest.len(),
            }),
        }
    }

    pub fn expect_tag(&self, context: &'static str, expected: Tag) -> Result<(), SchemaError> {
        if self.tag == expected {
            Ok(())
        } else {
            Err(self.mismatch(context, expected))
        }
    }

    pub fn expect_sequence(&self, context: &'static str) -> Result<&[Block], SchemaError> {
        match &self.value {
            Value::Sequence(children) => Ok(children),
            _ => Err(self.mismatch(context, Tag::universal(tags::SEQUENCE, true))),
        }
    }

    pub fn expect_set(&self, context: &'static str) -> Result<&[Block], SchemaError> {
        match &self.value {
            Value::Set(children) => Ok(children),
            _ => Err(self.mismatch(context, Tag::universal(tags::SET, true))),
        }
    }

    pub fn expect_bool(&self, context: &'static str) -> Result<bool, SchemaError> {
        self.as_bool()
            .ok_or_else(|| self.mismatch(context, Tag::universal(tags::BOOLEAN, false)))
    }

    pub fn expect_integer(&self, context: &'static str) -> Result<&Integer, SchemaError> {
        match &self.value {
            Value::Integer(i) => Ok(i),
            _ => Err(self.mismatch(context, Tag::universal(tags::INTEGER, false))),
        }
    }

    pub fn expect_oid(&self, context: &'static str) -> Result<&Oid, SchemaError> {
        self.as_oid()
            .ok_or_else(|| self.mismatch(context, Tag::universal(tags::OID, false)))
    }

    pub fn expect_octet_string(&self, context: &'static str) -> Result<&[u8], SchemaError> {
        self.as_octet_string()
            .ok_or_else(|| self.mismatch(context, Tag::universal(tags::OCTET_STRING, false)))
    }

    pub fn expect_bit_string(&self, context: &'static str) -> Result<&BitString, SchemaError> {
        self.as_bit_string()
            .ok_or_else(|| self.mismatch(context, Tag::universal(tags::BIT_STRING, false)))
    }

    pub fn expect_null(&self, context: &'static str) -> Result<(), SchemaError> {
        self.expect_tag(context, Tag::universal(tags::NULL, false))
    }

    /// Text of any string type.
    pub fn expect_str(&self, context: &'static str) -> Result<&str, SchemaError> {
        self.as_str()
            .ok_or_else(|| self.mismatch(context, Tag::universal(tags::UTF8_STRING, false)))
    }

    /// UTCTime or GeneralizedTime.
    pub fn expect_time(&self, context: &'static str) -> Result<&Asn1Time, SchemaError> {
        self.as_time()
            .ok_or_else(|| self.mismatch(context, Tag::universal(tags::UTC_TIME, false)))
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.to_ber() == other.to_ber()
    }
}

impl Eq for Block {}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("tag", &self.tag)
            .field("value", &self.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_context_wrapped_ia5_string() {
        // [2] IMPLICIT IA5String "example.com", as in a dNSName
        let bytes = hex!("82 0B 6578616D706C652E636F6D");
        let block = Block::from_ber(&bytes).unwrap();
        assert_eq!(block.tag(), Tag::context(2, false));
        assert_eq!(block.tag().class, TagClass::ContextSpecific);
        assert_eq!(block.primitive_content(), Some(&b"example.com"[..]));
        assert_eq!(block.to_ber(), bytes);

        let ia5 = block.reinterpret_implicit(tags::IA5_STRING).unwrap();
        assert_eq!(ia5.as_str(), Some("example.com"));
        let rebuilt = Block::implicit(2, Block::ia5_string("example.com").unwrap());
        assert_eq!(rebuilt, block);
    }

    #[test]
    fn test_nesting_fidelity() {
        // SEQUENCE { SET { INTEGER 5 } }
        let bytes = hex!("30 05 31 03 02 01 05");
        let block = Block::from_ber(&bytes).unwrap();
        let set = &block.expect_sequence("outer").unwrap()[0];
        let int = &set.expect_set("inner").unwrap()[0];
        assert_eq!(int.expect_integer("value").unwrap().to_i64(), Some(5));
        assert_eq!(block.to_ber(), bytes);

        let built = Block::sequence(vec![Block::set(vec![Block::integer(5)])]);
        assert_eq!(built.to_ber(), bytes);
        assert_eq!(built.encoded_len(), bytes.len());
        assert_eq!(built, block);
    }

    #[test]
    fn test_explicit_tagging() {
        let version = Block::explicit(0, Block::integer(2));
        assert_eq!(version.to_ber(), hex!("A0 03 02 01 02"));
        let inner = version.explicit_inner("version").unwrap();
        assert_eq!(inner.numeric_value(), Some(2));

        assert!(matches!(
            Block::integer(2).explicit_inner("version"),
            Err(SchemaError::UnexpectedTag { .. })
        ));
        let empty = Block::constructed(Tag::context(0, true), vec![]);
        assert!(matches!(
            empty.explicit_inner("version"),
            Err(SchemaError::MissingField { .. })
        ));
    }

    #[test]
    fn test_implicit_constructed() {
        let seq = Block::sequence(vec![Block::boolean(true)]);
        let tagged = Block::implicit(1, seq);
        assert_eq!(tagged.to_ber(), hex!("A1 03 01 01 FF"));
        let back = tagged.reinterpret_implicit(tags::SEQUENCE).unwrap();
        assert_eq!(back.to_ber(), hex!("30 03 01 01 FF"));
    }

    #[test]
    fn test_tagged_normalizes_universal_content() {
        let int = Block::primitive(Tag::universal(tags::INTEGER, false), vec![0x01, 0x00]).unwrap();
        assert_eq!(int.as_integer().unwrap().to_i64(), Some(256));
        assert!(Block::tagged(Tag::universal(tags::INTEGER, false), Value::Boolean(true)).is_err());
        assert!(Block::from_value(Value::Primitive(vec![])).is_err());
        let ctx = Block::tagged(Tag::context(5, false), Value::Boolean(true)).unwrap();
        assert_eq!(ctx.to_ber(), hex!("85 01 FF"));
    }

    #[test]
    fn test_string_constructors_validate() {
        assert!(Block::printable_string("Example Org").is_ok());
        assert!(Block::printable_string("a@b").is_err());
        assert!(Block::ia5_string("\u{e9}").is_err());
        let t = Asn1Time::new(2050, 1, 1, 0, 0, 0).unwrap();
        assert!(Block::utc_time(t).is_err());
        assert_eq!(
            Block::generalized_time(t).to_ber(),
            [&hex!("18 0F")[..], b"20500101000000Z"].concat()
        );
    }

    #[test]
    fn test_size_only_mode_matches_encoding() {
        let big = Block::sequence(vec![
            Block::octet_string(vec![0xAB; 300]),
            Block::oid("1.2.840.113549.1.1.11".parse().unwrap()),
            Block::null(),
            Block::bmp_string("hi").unwrap(),
        ]);
        assert_eq!(big.encoded_len(), big.to_ber().len());
        assert_eq!(&big.to_ber()[..4], hex!("30 82 01 43"));
    }

    #[test]
    fn test_set_ordering() {
        let set = Block::set(vec![Block::integer(2), Block::integer(1)]);
        assert_eq!(set.to_ber(), hex!("31 06 02 01 02 02 01 01"));
        assert_eq!(
            set.to_ber_with(&CodecConfig::der()),
            hex!("31 06 02 01 01 02 01 02")
        );
    }

    #[test]
    fn test_with_children_returns_new_node() {
        let original = Block::from_ber(&hex!("30 03 02 01 05")).unwrap();
        let changed = original.with_children(vec![Block::integer(6)]);
        assert_eq!(original.to_ber(), hex!("30 03 02 01 05"));
        assert_eq!(changed.to_ber(), hex!("30 03 02 01 06"));
        assert!(original.original_bytes().is_some());
        assert!(changed.original_bytes().is_none());
    }

    #[test]
    fn test_preserved_encoding_keeps_ber_forms() {
        // BOOLEAN true as 0x01 and a padded length: valid BER, not DER
        let bytes = hex!("30 81 03 01 01 01");
        let block = Block::from_ber(&bytes).unwrap();
        assert_eq!(block.to_ber(), hex!("30 03 01 01 FF"));
        assert_eq!(block.preserved_encoding().as_ref(), &bytes[..]);

        let extended = block.with_children(
            block.children().iter().cloned().chain([Block::null()]).collect(),
        );
        assert_eq!(
            extended.preserved_encoding().as_ref(),
            hex!("30 05 01 01 01 05 00")
        );
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(Block::integer(-129).numeric_value(), Some(-129));
        assert_eq!(Block::integer(u64::MAX).numeric_value(), None);
        assert_eq!(Block::enumerated(3).numeric_value(), Some(3));
        assert_eq!(Block::null().numeric_value(), None);
    }
}
