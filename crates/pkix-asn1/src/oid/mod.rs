//! OBJECT IDENTIFIER values.

pub mod registry;

use std::fmt;
use std::str::FromStr;

use pkix_types::Asn1Error;

/// A parsed OID represented as a sequence of arc values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    arcs: Vec<u64>,
}

impl Oid {
    /// Create an OID from its arcs. At least two arcs are required, the
    /// first must be 0, 1 or 2, and under 0 and 1 the second must be below 40.
    pub fn new(arcs: &[u64]) -> Result<Self, Asn1Error> {
        match arcs {
            [0 | 1, second, ..] if *second < 40 => {}
            [2, second, ..] if *second <= u64::MAX - 80 => {}
            _ => {
                return Err(Asn1Error::InvalidOid(format!(
                    "arcs {arcs:?} do not form a valid identifier"
                )))
            }
        }
        Ok(Self {
            arcs: arcs.to_vec(),
        })
    }

    /// Arcs known to be valid, used for the built-in constants.
    pub(crate) fn from_static(arcs: &[u64]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// Well-known name from the registry, e.g. `"commonName"`.
    pub fn name(&self) -> Option<&'static str> {
        registry::name_of(self)
    }

    /// Content octets (no tag or length).
    pub fn to_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.content_len());
        self.write_content(&mut out);
        out
    }

    pub(crate) fn content_len(&self) -> usize {
        self.subidentifiers().map(base128_len).sum()
    }

    pub(crate) fn write_content(&self, out: &mut Vec<u8>) {
        for sub in self.subidentifiers() {
            encode_base128(sub, out);
        }
    }

    /// Parse content octets into an OID.
    pub fn from_content(content: &[u8]) -> Result<Self, Asn1Error> {
        if content.is_empty() {
            return Err(Asn1Error::InvalidOid("empty content".into()));
        }
        let mut arcs = Vec::new();
        let mut i = 0;
        while i < content.len() {
            let (sub, consumed) = decode_base128(&content[i..])?;
            if arcs.is_empty() {
                match sub {
                    0..=39 => arcs.extend([0, sub]),
                    40..=79 => arcs.extend([1, sub - 40]),
                    _ => arcs.extend([2, sub - 80]),
                }
            } else {
                arcs.push(sub);
            }
            i += consumed;
        }
        Ok(Self { arcs })
    }

    /// Subidentifiers as encoded: the first packs arcs 0 and 1.
    fn subidentifiers(&self) -> impl Iterator<Item = u64> + '_ {
        let first = self.arcs[0] * 40 + self.arcs[1];
        std::iter::once(first).chain(self.arcs[2..].iter().copied())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.arcs.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
        }
        Ok(())
    }
}

impl FromStr for Oid {
    type Err = Asn1Error;

    /// Parse dotted-decimal notation such as `"1.2.840.113549.1.1.1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(|arc| {
                if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Asn1Error::InvalidOid(format!("bad arc {arc:?} in {s:?}")));
                }
                arc.parse::<u64>()
                    .map_err(|_| Asn1Error::InvalidOid(format!("arc {arc} exceeds 64 bits")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&arcs)
    }
}

fn base128_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

fn encode_base128(value: u64, out: &mut Vec<u8>) {
    let groups = base128_len(value);
    for i in (0..groups).rev() {
        let septet = ((value >> (7 * i)) & 0x7F) as u8;
        out.push(if i == 0 { septet } else { septet | 0x80 });
    }
}

fn decode_base128(data: &[u8]) -> Result<(u64, usize), Asn1Error> {
    if data.first() == Some(&0x80) {
        return Err(Asn1Error::InvalidOid("non-minimal subidentifier".into()));
    }
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if value > (u64::MAX >> 7) {
            return Err(Asn1Error::InvalidOid("subidentifier exceeds 64 bits".into()));
        }
        value = (value << 7) | (byte & 0x7F) as u64;
        if (byte & 0x80) == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Asn1Error::InvalidOid("truncated subidentifier".into()))
}

/// Well-known OIDs.
pub mod known {
    use super::Oid;

    // RSA
    pub fn rsa_encryption() -> Oid {
        Oid::from_static(&[1, 2, 840, 113549, 1, 1, 1])
    }
    pub fn sha256_with_rsa_encryption() -> Oid {
        Oid::from_static(&[1, 2, 840, 113549, 1, 1, 11])
    }

    // EC
    pub fn ec_public_key() -> Oid {
        Oid::from_static(&[1, 2, 840, 10045, 2, 1])
    }
    pub fn ecdsa_with_sha256() -> Oid {
        Oid::from_static(&[1, 2, 840, 10045, 4, 3, 2])
    }
    pub fn prime256v1() -> Oid {
        Oid::from_static(&[1, 2, 840, 10045, 3, 1, 7])
    }
    pub fn ed25519() -> Oid {
        Oid::from_static(&[1, 3, 101, 112])
    }

    // X.509 extensions (RFC 5280)
    pub fn subject_key_identifier() -> Oid {
        Oid::from_static(&[2, 5, 29, 14])
    }
    pub fn key_usage() -> Oid {
        Oid::from_static(&[2, 5, 29, 15])
    }
    pub fn subject_alt_name() -> Oid {
        Oid::from_static(&[2, 5, 29, 17])
    }
    pub fn basic_constraints() -> Oid {
        Oid::from_static(&[2, 5, 29, 19])
    }
    pub fn authority_key_identifier() -> Oid {
        Oid::from_static(&[2, 5, 29, 35])
    }
    pub fn ext_key_usage() -> Oid {
        Oid::from_static(&[2, 5, 29, 37])
    }
    pub fn crl_number() -> Oid {
        Oid::from_static(&[2, 5, 29, 20])
    }
    pub fn crl_reason() -> Oid {
        Oid::from_static(&[2, 5, 29, 21])
    }

    // DN attribute types (X.520)
    pub fn common_name() -> Oid {
        Oid::from_static(&[2, 5, 4, 3])
    }
    pub fn country_name() -> Oid {
        Oid::from_static(&[2, 5, 4, 6])
    }
    pub fn organization_name() -> Oid {
        Oid::from_static(&[2, 5, 4, 10])
    }
    pub fn email_address() -> Oid {
        Oid::from_static(&[1, 2, 840, 113549, 1, 9, 1])
    }

    /// Map a well-known DN attribute OID to its short name.
    pub fn oid_to_dn_short_name(oid: &Oid) -> Option<&'static str> {
        match oid.arcs() {
            [2, 5, 4, 3] => Some("CN"),
            [2, 5, 4, 6] => Some("C"),
            [2, 5, 4, 10] => Some("O"),
            [2, 5, 4, 11] => Some("OU"),
            [2, 5, 4, 8] => Some("ST"),
            [2, 5, 4, 7] => Some("L"),
            [2, 5, 4, 5] => Some("serialNumber"),
            [0, 9, 2342, 19200300, 100, 1, 25] => Some("DC"),
            [1, 2, 840, 113549, 1, 9, 1] => Some("emailAddress"),
            _ => None,
        }
    }
}
