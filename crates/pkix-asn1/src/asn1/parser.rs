//! Recursive BER/DER parser.

use std::sync::Arc;

use pkix_types::{Asn1Error, TagClass};

use super::block::RawSpan;
use super::length::{decode_length, length_octets_len};
use super::{rebase, tags, Block, Value};
use crate::config::CodecConfig;

/// Builds [`Block`] trees from BER input.
///
/// The whole input is copied once into a shared buffer that every decoded
/// node references for [`Block::original_bytes`]. Parsing is all or nothing:
/// any error discards the partial tree.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: CodecConfig,
}

impl Parser {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Parse exactly one element spanning all of `input`.
    pub fn parse(&self, input: &[u8]) -> Result<Block, Asn1Error> {
        if input.is_empty() {
            return Err(Asn1Error::EmptyInput);
        }
        let source: Arc<[u8]> = Arc::from(input);
        let (block, next) = self.parse_element(&source, 0, source.len(), 1)?;
        if next != source.len() {
            return Err(Asn1Error::TrailingData { offset: next });
        }
        Ok(block)
    }

    /// Parse consecutive elements until `input` is exhausted.
    pub fn parse_all(&self, input: &[u8]) -> Result<Vec<Block>, Asn1Error> {
        if input.is_empty() {
            return Err(Asn1Error::EmptyInput);
        }
        let source: Arc<[u8]> = Arc::from(input);
        let mut blocks = Vec::new();
        let mut offset = 0;
        while offset < source.len() {
            let (block, next) = self.parse_element(&source, offset, source.len(), 1)?;
            blocks.push(block);
            offset = next;
        }
        Ok(blocks)
    }

    /// Parse the element starting at `offset`, returning it and the offset
    /// just past it. Offsets in the result and in errors are relative to the
    /// start of `input`.
    pub fn parse_from_offset(&self, input: &[u8], offset: usize) -> Result<(Block, usize), Asn1Error> {
        if offset >= input.len() {
            return Err(if input.is_empty() {
                Asn1Error::EmptyInput
            } else {
                Asn1Error::Truncated { offset, needed: 1 }
            });
        }
        let source: Arc<[u8]> = Arc::from(input);
        self.parse_element(&source, offset, source.len(), 1)
    }

    /// Decode the element at `start`, which must end by `limit`.
    fn parse_element(
        &self,
        source: &Arc<[u8]>,
        start: usize,
        limit: usize,
        depth: usize,
    ) -> Result<(Block, usize), Asn1Error> {
        if depth > self.config.max_depth {
            return Err(Asn1Error::MaxDepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let (tag, tag_len) =
            super::decode_tag(&source[start..limit]).map_err(|e| rebase(e, start))?;
        let length_start = start + tag_len;
        let (length, length_len) =
            decode_length(&source[length_start..limit]).map_err(|e| rebase(e, length_start))?;
        if length_len != length_octets_len(length) {
            if self.config.strict_der {
                return Err(Asn1Error::NonCanonical("non-minimal length encoding"));
            }
            log::debug!("accepting non-minimal length octets at offset {start}");
        }

        let content_start = length_start + length_len;
        let available = limit - content_start;
        if length > available {
            return Err(Asn1Error::ContentOverflow {
                offset: start,
                length,
                available,
            });
        }
        let end = content_start + length;
        log::trace!("{tag} at offset {start}, depth {depth}, {length} content bytes");

        let value = if tag.constructed {
            let children = self.parse_children(source, content_start, end, depth)?;
            match (tag.class, tag.number) {
                (TagClass::Universal, tags::SEQUENCE) => Value::Sequence(children),
                (TagClass::Universal, tags::SET) => Value::Set(children),
                _ => Value::Constructed(children),
            }
        } else if tag.is_universal() {
            let strict = self.config.strict_der;
            Value::decode_primitive(tag.number, &source[content_start..end], strict)
                .inspect_err(|e| log::debug!("{tag} at offset {start}: {e}"))?
        } else {
            Value::Primitive(source[content_start..end].to_vec())
        };

        let raw = RawSpan::new(Arc::clone(source), start, content_start - start, end);
        Ok((Block::decoded(tag, value, raw), end))
    }

    fn parse_children(
        &self,
        source: &Arc<[u8]>,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Vec<Block>, Asn1Error> {
        let mut children = Vec::new();
        let mut offset = start;
        while offset < end {
            let (child, next) = self.parse_element(source, offset, end, depth + 1)?;
            children.push(child);
            offset = next;
        }
        Ok(children)
    }
}
