//! Human-readable tree dump in the layout of `openssl asn1parse`.

use std::fmt;

use pkix_types::{universal_name, TagClass};

use super::length::length_octets_len;
use super::tag::tag_octets_len;
use super::{Block, Value};

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.position().map_or(0, |(start, _)| start);
        dump(self, f, base, 0)
    }
}

/// Header and total length of `block` as laid out by its preserved encoding.
fn layout(block: &Block) -> (usize, usize) {
    if let (Some((_, header_len)), Some(bytes)) = (block.position(), block.original_bytes()) {
        return (header_len, bytes.len());
    }
    let content_len = match block.value().children() {
        Some(children) => children.iter().map(|c| layout(c).1).sum(),
        None => block.value().content_len(),
    };
    let header_len = tag_octets_len(&block.tag()) + length_octets_len(content_len);
    (header_len, header_len + content_len)
}

fn tag_name(block: &Block) -> String {
    let tag = block.tag();
    match tag.class {
        TagClass::Universal => match universal_name(tag.number) {
            Some(name) => name.to_string(),
            None => format!("[UNIVERSAL {}]", tag.number),
        },
        TagClass::ContextSpecific => format!("cont [ {} ]", tag.number),
        TagClass::Application => format!("appl [ {} ]", tag.number),
        TagClass::Private => format!("priv [ {} ]", tag.number),
    }
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Integer(i) | Value::Enumerated(i) => i.to_hex(),
        Value::ObjectIdentifier(oid) => match oid.name() {
            Some(name) => name.to_string(),
            None => oid.to_string(),
        },
        Value::OctetString(bytes) => {
            let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
            format!("[HEX DUMP]:{hex}")
        }
        Value::UtcTime(t) => t.utc_time_digits(),
        Value::GeneralizedTime(t) => t.to_generalized_time_string(),
        other => other.as_str()?.to_string(),
    };
    Some(text)
}

fn dump(block: &Block, f: &mut fmt::Formatter<'_>, offset: usize, depth: usize) -> fmt::Result {
    let (header_len, total_len) = layout(block);
    let kind = if block.is_constructed() { "cons" } else { "prim" };
    write!(
        f,
        "{offset:5}:d={depth:<2} hl={header_len} l={:4} {kind}: ",
        total_len - header_len
    )?;
    let name = tag_name(block);
    match value_text(block.value()) {
        Some(text) => writeln!(f, "{name:<18}:{text}")?,
        None => writeln!(f, "{name}")?,
    }

    let mut child_offset = offset + header_len;
    for child in block.children() {
        dump(child, f, child_offset, depth + 1)?;
        child_offset += layout(child).1;
    }
    Ok(())
}
