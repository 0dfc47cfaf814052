//! SEC1 elliptic curve private keys (RFC 5915).

use std::fmt;

use pkix_asn1::{BitString, Block, Decoder, Oid, PkiObject};
use pkix_types::SchemaError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// ```text
/// ECPrivateKey ::= SEQUENCE {
///     version        INTEGER { ecPrivkeyVer1(1) },
///     privateKey     OCTET STRING,
///     parameters [0] ECParameters {{ NamedCurve }} OPTIONAL,
///     publicKey  [1] BIT STRING OPTIONAL
/// }
/// ```
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EcPrivateKey {
    private_key: Vec<u8>,
    #[zeroize(skip)]
    parameters: Option<Block>,
    #[zeroize(skip)]
    public_key: Option<BitString>,
}

const CONTEXT: &str = "ECPrivateKey";
const VERSION: i64 = 1;

impl EcPrivateKey {
    pub fn new(private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            private_key: private_key.into(),
            parameters: None,
            public_key: None,
        }
    }

    /// The same key bound to a named curve.
    pub fn with_curve(&self, curve: Oid) -> Self {
        let mut key = self.clone();
        key.parameters = Some(Block::oid(curve));
        key
    }

    /// The same key carrying the encoded public point.
    pub fn with_public_key(&self, point: impl Into<Vec<u8>>) -> Self {
        let mut key = self.clone();
        key.public_key = Some(BitString::from_bytes(point));
        key
    }

    /// The raw scalar octets.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    pub fn parameters(&self) -> Option<&Block> {
        self.parameters.as_ref()
    }

    /// The curve OID when the parameters are a `namedCurve`.
    pub fn named_curve(&self) -> Option<&Oid> {
        self.parameters.as_ref().and_then(Block::as_oid)
    }

    pub fn public_key(&self) -> Option<&BitString> {
        self.public_key.as_ref()
    }
}

impl PkiObject for EcPrivateKey {
    const PEM_LABEL: Option<&'static str> = Some("EC PRIVATE KEY");

    fn to_asn1(&self) -> Block {
        let mut fields = vec![
            Block::integer(VERSION),
            Block::octet_string(self.private_key.clone()),
        ];
        if let Some(parameters) = &self.parameters {
            fields.push(Block::explicit(0, parameters.clone()));
        }
        if let Some(public_key) = &self.public_key {
            fields.push(Block::explicit(1, Block::bit_string(public_key.clone())));
        }
        Block::sequence(fields)
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence(CONTEXT, block)?;
        let version = d.read("version")?;
        version.expect_integer(CONTEXT)?;
        if version.numeric_value() != Some(VERSION) {
            return Err(SchemaError::InvalidValue {
                context: CONTEXT,
                reason: format!("unsupported version {:?}", version.numeric_value()),
            });
        }
        let private_key = d.read_octet_string("privateKey")?.to_vec();
        let parameters = d.try_read_explicit(0)?.cloned();
        let public_key = match d.try_read_explicit(1)? {
            Some(b) => Some(b.expect_bit_string(CONTEXT)?.clone()),
            None => None,
        };
        d.finish()?;
        Ok(Self {
            private_key,
            parameters,
            public_key,
        })
    }
}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("private_key", &format_args!("[{} bytes]", self.private_key.len()))
            .field("curve", &self.named_curve())
            .field("public_key", &self.public_key)
            .finish()
    }
}
