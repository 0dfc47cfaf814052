//! Field-by-field reader over the children of a decoded SEQUENCE.

use pkix_types::{SchemaError, Tag};

use super::{Asn1Time, BitString, Block, Integer};
use crate::oid::Oid;

/// A cursor over a node's children, reporting schema errors under the name
/// of the structure being decoded.
pub struct Decoder<'a> {
    context: &'static str,
    fields: &'a [Block],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(context: &'static str, fields: &'a [Block]) -> Self {
        Self {
            context,
            fields,
            pos: 0,
        }
    }

    /// Cursor over the children of a SEQUENCE.
    pub fn sequence(context: &'static str, block: &'a Block) -> Result<Self, SchemaError> {
        Ok(Self::new(context, block.expect_sequence(context)?))
    }

    /// Returns the fields not yet read.
    pub fn remaining(&self) -> &'a [Block] {
        &self.fields[self.pos..]
    }

    /// Returns true if all fields have been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.fields.len()
    }

    /// Tag of the next field without consuming it.
    pub fn peek_tag(&self) -> Option<Tag> {
        self.fields.get(self.pos).map(Block::tag)
    }

    /// Read the next field, which must be present.
    pub fn read(&mut self, field: &'static str) -> Result<&'a Block, SchemaError> {
        let block = self.fields.get(self.pos).ok_or(SchemaError::MissingField {
            context: self.context,
            field,
        })?;
        self.pos += 1;
        Ok(block)
    }

    /// Read the next field if `accept` approves its tag.
    pub fn read_if(&mut self, accept: impl FnOnce(Tag) -> bool) -> Option<&'a Block> {
        let block = self.fields.get(self.pos).filter(|b| accept(b.tag()))?;
        self.pos += 1;
        Some(block)
    }

    pub fn read_integer(&mut self, field: &'static str) -> Result<&'a Integer, SchemaError> {
        self.read(field)?.expect_integer(self.context)
    }

    pub fn read_oid(&mut self, field: &'static str) -> Result<&'a Oid, SchemaError> {
        self.read(field)?.expect_oid(self.context)
    }

    pub fn read_octet_string(&mut self, field: &'static str) -> Result<&'a [u8], SchemaError> {
        self.read(field)?.expect_octet_string(self.context)
    }

    pub fn read_bit_string(&mut self, field: &'static str) -> Result<&'a BitString, SchemaError> {
        self.read(field)?.expect_bit_string(self.context)
    }

    pub fn read_string(&mut self, field: &'static str) -> Result<&'a str, SchemaError> {
        self.read(field)?.expect_str(self.context)
    }

    pub fn read_time(&mut self, field: &'static str) -> Result<&'a Asn1Time, SchemaError> {
        self.read(field)?.expect_time(self.context)
    }

    /// Read a SEQUENCE field, returning a cursor over its contents.
    pub fn read_sequence(&mut self, field: &'static str) -> Result<Decoder<'a>, SchemaError> {
        let children = self.read(field)?.expect_sequence(self.context)?;
        Ok(Decoder::new(self.context, children))
    }

    /// Read a SET field, returning its members.
    pub fn read_set(&mut self, field: &'static str) -> Result<&'a [Block], SchemaError> {
        self.read(field)?.expect_set(self.context)
    }

    /// Read a `BOOLEAN DEFAULT FALSE` field.
    pub fn read_default_false(&mut self) -> Result<bool, SchemaError> {
        match self.read_if(|tag| tag == Tag::universal(super::tags::BOOLEAN, false)) {
            Some(block) => block.expect_bool(self.context),
            None => Ok(false),
        }
    }

    /// Read an optional `[number]` field, explicit or implicit. Returns `None`
    /// without consuming anything if the next tag differs.
    pub fn try_read_context_specific(&mut self, number: u32) -> Option<&'a Block> {
        self.read_if(|tag| tag == Tag::context(number, true) || tag == Tag::context(number, false))
    }

    /// Read an optional `[number] EXPLICIT` field and unwrap it.
    pub fn try_read_explicit(&mut self, number: u32) -> Result<Option<&'a Block>, SchemaError> {
        match self.try_read_context_specific(number) {
            Some(block) => block.explicit_inner(self.context).map(Some),
            None => Ok(None),
        }
    }

    /// Fail if any field is left unread.
    pub fn finish(self) -> Result<(), SchemaError> {
        let count = self.fields.len() - self.pos.min(self.fields.len());
        if count == 0 {
            Ok(())
        } else {
            Err(SchemaError::UnexpectedElements {
                context: self.context,
                count,
            })
        }
    }
}
