//! The contract every PKI structure implements, and the SEQUENCE OF /
//! SET OF containers built on it.

mod choice;

pub use choice::{Choice, ChoiceBuilder};

use std::any::type_name;

use pkix_types::{PkiError, SchemaError};

use crate::asn1::{Block, Integer, Parser};
use crate::config::CodecConfig;
use crate::oid::Oid;

/// A value with an ASN.1 representation.
///
/// Implementors provide [`to_asn1`](PkiObject::to_asn1) and
/// [`from_asn1`](PkiObject::from_asn1); DER, PEM, equality and the dump
/// rendering all derive from those two.
pub trait PkiObject: Sized {
    /// Protocol-mandated PEM label. When `None` the label is derived from
    /// the type name, e.g. `AlgorithmIdentifier` becomes
    /// `ALGORITHM IDENTIFIER`.
    const PEM_LABEL: Option<&'static str> = None;

    fn to_asn1(&self) -> Block;

    fn from_asn1(block: &Block) -> Result<Self, SchemaError>;

    fn to_der(&self) -> Vec<u8> {
        self.to_asn1().to_ber()
    }

    /// Encoding with SET ordering taken from `config`.
    fn to_der_with(&self, config: &CodecConfig) -> Vec<u8> {
        self.to_asn1().to_ber_with(config)
    }

    fn from_der(der: &[u8]) -> Result<Self, PkiError> {
        Self::from_der_with(der, &CodecConfig::default())
    }

    fn from_der_with(der: &[u8], config: &CodecConfig) -> Result<Self, PkiError> {
        let block = Parser::new(config.clone()).parse(der)?;
        Ok(Self::from_asn1(&block)?)
    }

    fn pem_label() -> String {
        match Self::PEM_LABEL {
            Some(label) => label.to_string(),
            None => label_from_type_name(type_name::<Self>()),
        }
    }

    #[cfg(feature = "pem")]
    fn to_pem(&self) -> String {
        crate::pem::encode(&Self::pem_label(), &self.to_der())
    }

    /// Decode the first PEM block in `text`, which must carry this type's
    /// label.
    #[cfg(feature = "pem")]
    fn from_pem(text: &str) -> Result<Self, PkiError> {
        let block = crate::pem::parse_one(text)?.ok_or(PkiError::PemMissing)?;
        let expected = Self::pem_label();
        if block.label != expected {
            return Err(PkiError::PemLabel {
                expected,
                actual: block.label,
            });
        }
        Self::from_der(&block.data)
    }

    /// Structural equality: identical DER encodings.
    fn pki_eq(&self, other: &Self) -> bool {
        self.to_der() == other.to_der()
    }

    /// The asn1parse-style dump of the encoded value.
    fn to_asn1_string(&self) -> String {
        self.to_asn1().to_string()
    }
}

/// `FooBarBaz` -> `FOO BAR BAZ`, keeping acronym runs together
/// (`X509Crl` -> `X509 CRL`).
fn label_from_type_name(full: &str) -> String {
    let path = full.split('<').next().unwrap_or(full);
    let name = path.rsplit("::").next().unwrap_or(path);
    let chars: Vec<char> = name.chars().collect();
    let mut label = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let starts_word = i > 0
            && c.is_ascii_uppercase()
            && (chars[i - 1].is_ascii_lowercase()
                || chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase()));
        if starts_word {
            label.push(' ');
        }
        label.push(c.to_ascii_uppercase());
    }
    label
}

impl PkiObject for Block {
    fn to_asn1(&self) -> Block {
        self.clone()
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        Ok(block.clone())
    }
}

impl PkiObject for Integer {
    fn to_asn1(&self) -> Block {
        Block::integer(self.clone())
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        block.expect_integer("INTEGER").cloned()
    }
}

impl PkiObject for Oid {
    fn to_asn1(&self) -> Block {
        Block::oid(self.clone())
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        block.expect_oid("OBJECT IDENTIFIER").cloned()
    }
}

/// `SEQUENCE OF T`: order-preserving.
#[derive(Debug, Clone)]
pub struct PkiSequence<T> {
    items: Vec<T>,
}

/// `SET OF T`: unordered. Members keep the order they were decoded or
/// added in; [`SetOrdering`](crate::SetOrdering) decides the order they are
/// encoded in.
#[derive(Debug, Clone)]
pub struct PkiSet<T> {
    items: Vec<T>,
}

macro_rules! impl_collection {
    ($name:ident, $context:literal, $expect:ident, $build:ident) => {
        impl<T> $name<T> {
            pub fn new(items: Vec<T>) -> Self {
                Self { items }
            }

            pub fn len(&self) -> usize {
                self.items.len()
            }

            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, T> {
                self.items.iter()
            }

            pub fn as_slice(&self) -> &[T] {
                &self.items
            }

            pub fn into_vec(self) -> Vec<T> {
                self.items
            }

            /// New collection with `item` appended.
            pub fn with(&self, item: T) -> Self
            where
                T: Clone,
            {
                let mut items = self.items.clone();
                items.push(item);
                Self { items }
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self { items: Vec::new() }
            }
        }

        impl<T: PkiObject> PkiObject for $name<T> {
            fn to_asn1(&self) -> Block {
                Block::$build(self.items.iter().map(PkiObject::to_asn1).collect())
            }

            fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
                let items = block
                    .$expect($context)?
                    .iter()
                    .map(T::from_asn1)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self { items })
            }
        }

        impl<T> FromIterator<T> for $name<T> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                Self {
                    items: iter.into_iter().collect(),
                }
            }
        }

        impl<T> IntoIterator for $name<T> {
            type Item = T;
            type IntoIter = std::vec::IntoIter<T>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }

        impl<'a, T> IntoIterator for &'a $name<T> {
            type Item = &'a T;
            type IntoIter = std::slice::Iter<'a, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }
    };
}

impl_collection!(PkiSequence, "SEQUENCE OF", expect_sequence, sequence);
impl_collection!(PkiSet, "SET OF", expect_set, set);

impl<T: PkiObject> PartialEq for PkiSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().zip(&other.items).all(|(a, b)| a.pki_eq(b))
    }
}

impl<T: PkiObject> Eq for PkiSequence<T> {}

/// Sets are equal when they hold the same multiset of member encodings.
impl<T: PkiObject> PartialEq for PkiSet<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.items.len() != other.items.len() {
            return false;
        }
        let sorted = |items: &[T]| {
            let mut encodings: Vec<Vec<u8>> = items.iter().map(PkiObject::to_der).collect();
            encodings.sort();
            encodings
        };
        sorted(&self.items) == sorted(&other.items)
    }
}

impl<T: PkiObject> Eq for PkiSet<T> {}
