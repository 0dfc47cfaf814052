#![forbid(unsafe_code)]
#![doc = "ASN.1 BER/DER codec for the pkix object model: tags, lengths, the tagged-value tree, universal types, OIDs, PEM and the PKI object contract."]

pub mod asn1;
pub mod config;
pub mod object;
pub mod oid;

#[cfg(feature = "pem")]
pub mod pem;

pub use asn1::{Asn1Time, BitString, Block, Decoder, Integer, Parser, Value};
pub use config::{CodecConfig, CodecConfigBuilder, SetOrdering};
pub use object::{Choice, ChoiceBuilder, PkiObject, PkiSequence, PkiSet};
pub use oid::Oid;
pub use pkix_types::{Asn1Error, PkiError, SchemaError, Tag, TagClass};
