//! GeneralName (RFC 5280 §4.2.1.6).

use std::fmt;
use std::net::IpAddr;
use std::sync::OnceLock;

use pkix_asn1::asn1::tags;
use pkix_asn1::{Block, Choice, Decoder, Oid, PkiObject, PkiSequence};
use pkix_types::{SchemaError, Tag};

use super::name::Name;

/// ```text
/// GeneralName ::= CHOICE {
///     otherName                 [0] OtherName,
///     rfc822Name                [1] IA5String,
///     dNSName                   [2] IA5String,
///     x400Address               [3] ORAddress,
///     directoryName             [4] Name,
///     ediPartyName              [5] EDIPartyName,
///     uniformResourceIdentifier [6] IA5String,
///     iPAddress                 [7] OCTET STRING,
///     registeredID              [8] OBJECT IDENTIFIER
/// }
/// ```
///
/// `x400Address` and `ediPartyName` are kept as their tagged trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    OtherName { type_id: Oid, value: Block },
    Rfc822Name(String),
    DnsName(String),
    X400Address(Block),
    DirectoryName(Name),
    EdiPartyName(Block),
    Uri(String),
    IpAddress(Vec<u8>),
    RegisteredId(Oid),
}

pub type GeneralNames = PkiSequence<GeneralName>;

const CONTEXT: &str = "GeneralName";

fn ia5_text(block: &Block) -> Result<String, SchemaError> {
    Ok(block
        .reinterpret_implicit(tags::IA5_STRING)?
        .expect_str(CONTEXT)?
        .to_string())
}

fn other_name(block: &Block) -> Result<GeneralName, SchemaError> {
    let seq = block.reinterpret_implicit(tags::SEQUENCE)?;
    let mut d = Decoder::sequence("OtherName", &seq)?;
    let type_id = d.read_oid("type-id")?.clone();
    let value = d.try_read_explicit(0)?.cloned().ok_or(SchemaError::MissingField {
        context: "OtherName",
        field: "value",
    })?;
    d.finish()?;
    Ok(GeneralName::OtherName { type_id, value })
}

fn constructed(block: &Block) -> Result<Block, SchemaError> {
    if !block.is_constructed() {
        let tag = block.tag();
        return Err(SchemaError::UnexpectedTag {
            context: CONTEXT,
            expected: Tag { constructed: true, ..tag },
            actual: tag,
        });
    }
    Ok(block.clone())
}

fn alternatives() -> Result<&'static Choice<GeneralName>, SchemaError> {
    static CHOICE: OnceLock<Result<Choice<GeneralName>, SchemaError>> = OnceLock::new();
    CHOICE
        .get_or_init(|| {
            Choice::builder(CONTEXT)
                .context(0, other_name)
                .context(1, |b| ia5_text(b).map(GeneralName::Rfc822Name))
                .context(2, |b| ia5_text(b).map(GeneralName::DnsName))
                .context(3, |b| constructed(b).map(GeneralName::X400Address))
                .context(4, |b| {
                    Name::from_asn1(b.explicit_inner(CONTEXT)?).map(GeneralName::DirectoryName)
                })
                .context(5, |b| constructed(b).map(GeneralName::EdiPartyName))
                .context(6, |b| ia5_text(b).map(GeneralName::Uri))
                .context(7, |b| {
                    let octets = b.reinterpret_implicit(tags::OCTET_STRING)?;
                    Ok(GeneralName::IpAddress(octets.expect_octet_string(CONTEXT)?.to_vec()))
                })
                .context(8, |b| {
                    let oid = b.reinterpret_implicit(tags::OID)?;
                    Ok(GeneralName::RegisteredId(oid.expect_oid(CONTEXT)?.clone()))
                })
                .build()
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// `[number] IMPLICIT IA5String`. IA5 content octets are the ASCII bytes,
/// identical to the UTF-8 encoding for the values the constructors admit.
fn implicit_ia5(number: u32, text: &str) -> Block {
    Block::implicit(number, Block::utf8_string(text))
}

fn require_ascii(kind: &'static str, text: &str) -> Result<(), SchemaError> {
    if text.is_ascii() {
        Ok(())
    } else {
        Err(SchemaError::InvalidValue {
            context: CONTEXT,
            reason: format!("{kind} {text:?} is not IA5"),
        })
    }
}

impl GeneralName {
    pub fn dns_name(name: &str) -> Result<Self, SchemaError> {
        require_ascii("dNSName", name)?;
        Ok(GeneralName::DnsName(name.to_string()))
    }

    pub fn email(address: &str) -> Result<Self, SchemaError> {
        require_ascii("rfc822Name", address)?;
        Ok(GeneralName::Rfc822Name(address.to_string()))
    }

    pub fn uri(uri: &str) -> Result<Self, SchemaError> {
        require_ascii("uniformResourceIdentifier", uri)?;
        Ok(GeneralName::Uri(uri.to_string()))
    }

    pub fn ip(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => GeneralName::IpAddress(v4.octets().to_vec()),
            IpAddr::V6(v6) => GeneralName::IpAddress(v6.octets().to_vec()),
        }
    }

    /// The address of an `iPAddress` name holding 4 or 16 octets.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self {
            GeneralName::IpAddress(octets) => match octets.len() {
                4 => <[u8; 4]>::try_from(octets.as_slice()).ok().map(IpAddr::from),
                16 => <[u8; 16]>::try_from(octets.as_slice()).ok().map(IpAddr::from),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_dns_name(&self) -> Option<&str> {
        match self {
            GeneralName::DnsName(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for GeneralName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralName::OtherName { type_id, .. } => write!(f, "othername:{type_id}"),
            GeneralName::Rfc822Name(text) => write!(f, "email:{text}"),
            GeneralName::DnsName(text) => write!(f, "DNS:{text}"),
            GeneralName::X400Address(_) => f.write_str("X400Name:<unsupported>"),
            GeneralName::DirectoryName(name) => write!(f, "DirName:{name}"),
            GeneralName::EdiPartyName(_) => f.write_str("EdiPartyName:<unsupported>"),
            GeneralName::Uri(text) => write!(f, "URI:{text}"),
            GeneralName::IpAddress(octets) => match self.ip_addr() {
                Some(addr) => write!(f, "IP Address:{addr}"),
                None => write!(f, "IP Address:<invalid {} octets>", octets.len()),
            },
            GeneralName::RegisteredId(oid) => write!(f, "Registered ID:{oid}"),
        }
    }
}

impl PkiObject for GeneralName {
    fn to_asn1(&self) -> Block {
        match self {
            GeneralName::OtherName { type_id, value } => Block::constructed(
                Tag::context(0, true),
                vec![Block::oid(type_id.clone()), Block::explicit(0, value.clone())],
            ),
            GeneralName::Rfc822Name(text) => implicit_ia5(1, text),
            GeneralName::DnsName(text) => implicit_ia5(2, text),
            GeneralName::X400Address(block) | GeneralName::EdiPartyName(block) => block.clone(),
            GeneralName::DirectoryName(name) => Block::explicit(4, name.to_asn1()),
            GeneralName::Uri(text) => implicit_ia5(6, text),
            GeneralName::IpAddress(octets) => Block::implicit(7, Block::octet_string(octets.clone())),
            GeneralName::RegisteredId(oid) => Block::implicit(8, Block::oid(oid.clone())),
        }
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        alternatives()?.decode(block)
    }
}
