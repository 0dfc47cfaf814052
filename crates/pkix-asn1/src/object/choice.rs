//! CHOICE dispatch by tag.

use std::collections::HashMap;

use pkix_types::{SchemaError, Tag, TagClass};

use super::PkiObject;
use crate::asn1::Block;

type DecodeFn<T> = fn(&Block) -> Result<T, SchemaError>;

/// A validated table from alternative tags to their decoders.
///
/// Alternatives are keyed by tag class and number; the constructed flag is
/// left to each decoder so that `[n]` alternatives may be explicit or
/// implicit. Decoding a tag with no entry is an error.
pub struct Choice<T> {
    name: &'static str,
    alternatives: HashMap<(TagClass, u32), DecodeFn<T>>,
}

/// Collects alternatives for a [`Choice`].
pub struct ChoiceBuilder<T> {
    name: &'static str,
    alternatives: Vec<(Tag, DecodeFn<T>)>,
}

impl<T> Choice<T> {
    pub fn builder(name: &'static str) -> ChoiceBuilder<T> {
        ChoiceBuilder {
            name,
            alternatives: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// True if an alternative is registered for `tag`'s class and number.
    pub fn contains(&self, tag: Tag) -> bool {
        self.alternatives.contains_key(&(tag.class, tag.number))
    }

    /// Decode `block` with the alternative registered for its tag.
    pub fn decode(&self, block: &Block) -> Result<T, SchemaError> {
        let tag = block.tag();
        let decode = self
            .alternatives
            .get(&(tag.class, tag.number))
            .ok_or(SchemaError::UnknownChoice {
                choice: self.name,
                tag,
            })?;
        decode(block)
    }

    /// Encode `value`, checking that it lands on a registered alternative.
    pub fn encode(&self, value: &T) -> Result<Block, SchemaError>
    where
        T: PkiObject,
    {
        let block = value.to_asn1();
        if !self.contains(block.tag()) {
            return Err(SchemaError::UnknownChoice {
                choice: self.name,
                tag: block.tag(),
            });
        }
        Ok(block)
    }
}

impl<T> ChoiceBuilder<T> {
    /// Alternative under `[number]`.
    pub fn context(self, number: u32, decode: DecodeFn<T>) -> Self {
        self.variant(Tag::context(number, false), decode)
    }

    /// Alternative under its own universal tag.
    pub fn universal(self, number: u32, decode: DecodeFn<T>) -> Self {
        self.variant(Tag::universal(number, false), decode)
    }

    pub fn variant(mut self, tag: Tag, decode: DecodeFn<T>) -> Self {
        self.alternatives.push((tag, decode));
        self
    }

    /// Fails if two alternatives share a tag class and number.
    pub fn build(self) -> Result<Choice<T>, SchemaError> {
        let mut alternatives = HashMap::with_capacity(self.alternatives.len());
        for (tag, decode) in self.alternatives {
            if alternatives.insert((tag.class, tag.number), decode).is_some() {
                return Err(SchemaError::DuplicateChoiceTag {
                    choice: self.name,
                    tag,
                });
            }
        }
        Ok(Choice {
            name: self.name,
            alternatives,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn1::tags;
    use hex_literal::hex;

    #[derive(Debug, PartialEq)]
    enum Name {
        Email(String),
        Dns(String),
        Serial(i64),
    }

    impl PkiObject for Name {
        fn to_asn1(&self) -> Block {
            match self {
                Name::Email(s) => Block::implicit(1, Block::utf8_string(s.as_str())),
                Name::Dns(s) => Block::implicit(2, Block::utf8_string(s.as_str())),
                Name::Serial(n) => Block::integer(*n),
            }
        }

        fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
            choice().decode(block)
        }
    }

    fn ia5(block: &Block) -> Result<String, SchemaError> {
        Ok(block
            .reinterpret_implicit(tags::IA5_STRING)?
            .expect_str("Name")?
            .to_string())
    }

    fn choice() -> Choice<Name> {
        Choice::<Name>::builder("Name")
            .context(1, |b| ia5(b).map(Name::Email))
            .context(2, |b| ia5(b).map(Name::Dns))
            .universal(tags::INTEGER, |b| {
                b.numeric_value().map(Name::Serial).ok_or(SchemaError::InvalidValue {
                    context: "Name",
                    reason: "serial out of range".into(),
                })
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_dispatch_by_tag() {
        let dns = Name::from_der(&hex!("82 0B 6578616D706C652E636F6D")).unwrap();
        assert_eq!(dns, Name::Dns("example.com".into()));
        assert_eq!(Name::from_der(&hex!("02 01 09")).unwrap(), Name::Serial(9));
        assert_eq!(choice().len(), 3);
        assert!(choice().contains(Tag::context(1, true)));
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let err = Name::from_der(&hex!("83 01 00")).unwrap_err();
        assert_eq!(err.to_string(), "schema error: Name: no alternative registered for [3]");
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        let result = Choice::<Name>::builder("Name")
            .context(0, |_| Ok(Name::Serial(0)))
            .variant(Tag::context(0, true), |_| Ok(Name::Serial(1)))
            .build();
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateChoiceTag { choice: "Name", .. })
        ));
    }

    #[test]
    fn test_encode_checks_registration() {
        let choice = choice();
        let block = choice.encode(&Name::Email("a@b".into())).unwrap();
        assert_eq!(block.tag(), Tag::context(1, false));

        let narrow = Choice::<Name>::builder("Name")
            .context(2, |_| Ok(Name::Serial(0)))
            .build()
            .unwrap();
        assert!(narrow.encode(&Name::Serial(1)).is_err());
    }
}
