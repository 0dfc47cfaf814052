use pkix_asn1::{Block, Decoder, Oid, PkiObject, PkiSet};
use pkix_types::SchemaError;

/// A typed set of values, as carried by PKCS#8, PKCS#9 and CSR attributes.
///
/// ```text
/// Attribute ::= SEQUENCE {
///     attrType    OBJECT IDENTIFIER,
///     attrValues  SET OF AttributeValue
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub attr_type: Oid,
    pub values: PkiSet<Block>,
}

impl Attribute {
    pub fn new(attr_type: Oid, values: PkiSet<Block>) -> Self {
        Self { attr_type, values }
    }

    /// The value of a single-valued attribute.
    pub fn single_value(&self) -> Option<&Block> {
        match self.values.as_slice() {
            [value] => Some(value),
            _ => None,
        }
    }
}

impl PkiObject for Attribute {
    fn to_asn1(&self) -> Block {
        Block::sequence(vec![Block::oid(self.attr_type.clone()), self.values.to_asn1()])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("Attribute", block)?;
        let attr_type = d.read_oid("attrType")?.clone();
        let values = PkiSet::<Block>::from_asn1(d.read("attrValues")?)?;
        d.finish()?;
        Ok(Self { attr_type, values })
    }
}
