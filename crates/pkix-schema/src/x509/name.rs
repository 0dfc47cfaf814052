//! Distinguished names.

use std::fmt;

use pkix_asn1::oid::known::oid_to_dn_short_name;
use pkix_asn1::{Block, Decoder, Oid, PkiObject, PkiSequence, PkiSet};
use pkix_types::SchemaError;

/// One `type=value` pair of a distinguished name.
///
/// The value keeps its original string type (PrintableString, UTF8String,
/// ...) so that re-encoding is byte-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTypeAndValue {
    pub attr_type: Oid,
    pub value: Block,
}

/// A SET OF attributes; almost always a single one.
pub type RelativeDistinguishedName = PkiSet<AttributeTypeAndValue>;

impl AttributeTypeAndValue {
    pub fn new(attr_type: Oid, value: Block) -> Self {
        Self { attr_type, value }
    }

    /// Short name such as `CN`, or the dotted OID.
    pub fn short_name(&self) -> String {
        match oid_to_dn_short_name(&self.attr_type) {
            Some(name) => name.to_string(),
            None => self.attr_type.to_string(),
        }
    }

    pub fn value_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

impl PkiObject for AttributeTypeAndValue {
    fn to_asn1(&self) -> Block {
        Block::sequence(vec![Block::oid(self.attr_type.clone()), self.value.clone()])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("AttributeTypeAndValue", block)?;
        let attr_type = d.read_oid("type")?.clone();
        let value = d.read("value")?.clone();
        d.finish()?;
        Ok(Self { attr_type, value })
    }
}

impl fmt::Display for AttributeTypeAndValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value_str() {
            Some(text) => write!(f, "{}={}", self.short_name(), text),
            // RFC 4514: non-string values print as '#' and their hex encoding
            None => {
                let hex: String = self.value.to_ber().iter().map(|b| format!("{b:02x}")).collect();
                write!(f, "{}=#{}", self.short_name(), hex)
            }
        }
    }
}

/// An X.501 distinguished name: an ordered sequence of RDNs.
///
/// ```text
/// Name ::= CHOICE { rdnSequence RDNSequence }
/// RDNSequence ::= SEQUENCE OF RelativeDistinguishedName
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    rdns: PkiSequence<RelativeDistinguishedName>,
}

impl Name {
    pub fn new(rdns: PkiSequence<RelativeDistinguishedName>) -> Self {
        Self { rdns }
    }

    pub fn rdns(&self) -> &PkiSequence<RelativeDistinguishedName> {
        &self.rdns
    }

    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// New name with a single-valued RDN appended.
    pub fn with(&self, attr_type: Oid, value: Block) -> Self {
        let rdn = PkiSet::new(vec![AttributeTypeAndValue::new(attr_type, value)]);
        Self {
            rdns: self.rdns.with(rdn),
        }
    }

    /// All attributes in order, flattening multi-valued RDNs.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeTypeAndValue> {
        self.rdns.iter().flat_map(|rdn| rdn.iter())
    }

    /// Value of the first attribute with this short name (e.g. `"CN"`).
    pub fn get(&self, short_name: &str) -> Option<&str> {
        self.attributes()
            .find(|atv| oid_to_dn_short_name(&atv.attr_type) == Some(short_name))
            .and_then(AttributeTypeAndValue::value_str)
    }

    pub fn common_name(&self) -> Option<&str> {
        self.get("CN")
    }
}

impl PkiObject for Name {
    fn to_asn1(&self) -> Block {
        self.rdns.to_asn1()
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let rdns = PkiSequence::<RelativeDistinguishedName>::from_asn1(block)?;
        if let Some(position) = rdns.iter().position(|rdn| rdn.is_empty()) {
            return Err(SchemaError::InvalidValue {
                context: "Name",
                reason: format!("RDN {position} has no attributes"),
            });
        }
        Ok(Self { rdns })
    }
}

/// `C=US, O=Example Org, CN=example.com`, in encoding order; attributes
/// of a multi-valued RDN are joined with `+`.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rdn) in self.rdns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            for (j, atv) in rdn.iter().enumerate() {
                if j > 0 {
                    f.write_str("+")?;
                }
                write!(f, "{atv}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use pkix_asn1::oid::known;

    // C=US, O=Example Org, CN=example.com as OpenSSL writes it
    const NAME: [u8; 59] = hex!(
        "30 39"
        "31 0B 30 09 06 03 55 04 06 13 02 5553"
        "31 14 30 12 06 03 55 04 0A 0C 0B 4578616D706C65204F7267"
        "31 14 30 12 06 03 55 04 03 0C 0B 6578616D706C652E636F6D"
    );

    #[test]
    fn test_decode_and_display() {
        let name = Name::from_der(&NAME).unwrap();
        assert_eq!(name.to_string(), "C=US, O=Example Org, CN=example.com");
        assert_eq!(name.common_name(), Some("example.com"));
        assert_eq!(name.get("O"), Some("Example Org"));
        assert_eq!(name.get("OU"), None);
        assert_eq!(name.to_der(), NAME);
    }

    #[test]
    fn test_build_name() {
        let name = Name::default()
            .with(known::country_name(), Block::printable_string("US").unwrap())
            .with(known::organization_name(), Block::utf8_string("Example Org"))
            .with(known::common_name(), Block::utf8_string("example.com"));
        assert_eq!(name.to_der(), NAME);
        assert_eq!(name, Name::from_der(&NAME).unwrap());
    }

    #[test]
    fn test_multi_valued_rdn() {
        let rdn = PkiSet::new(vec![
            AttributeTypeAndValue::new(known::common_name(), Block::utf8_string("a")),
            AttributeTypeAndValue::new(Oid::new(&[2, 5, 4, 99]).unwrap(), Block::integer(5)),
        ]);
        let name = Name::new(PkiSequence::new(vec![rdn]));
        assert_eq!(name.to_string(), "CN=a+2.5.4.99=#020105");
        assert_eq!(name.attributes().count(), 2);
    }

    #[test]
    fn test_empty_rdn_rejected() {
        let err = Name::from_der(&hex!("30 02 31 00")).unwrap_err();
        assert_eq!(err.to_string(), "schema error: Name: RDN 0 has no attributes");
    }
}
