//! ASN.1 tag identifiers.
//!
//! The encoding of these values into identifier octets lives in
//! `pkix_asn1::asn1::tag`; this module only describes them so that error
//! types can report expected and actual tags without depending on the codec.

use std::fmt;

/// ASN.1 tag class (the top two bits of the identifier octet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    /// Class from the two most significant bits of an identifier octet.
    pub fn from_identifier(octet: u8) -> Self {
        match octet >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    /// The class bits positioned as in an identifier octet.
    pub fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xC0,
        }
    }
}

impl fmt::Display for TagClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TagClass::Universal => "UNIVERSAL",
            TagClass::Application => "APPLICATION",
            TagClass::ContextSpecific => "CONTEXT_SPECIFIC",
            TagClass::Private => "PRIVATE",
        };
        f.write_str(name)
    }
}

/// A decoded ASN.1 tag: class, constructed flag and tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub class: TagClass,
    pub constructed: bool,
    pub number: u32,
}

impl Tag {
    pub const fn new(class: TagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    pub const fn universal(number: u32, constructed: bool) -> Self {
        Self::new(TagClass::Universal, constructed, number)
    }

    pub const fn context(number: u32, constructed: bool) -> Self {
        Self::new(TagClass::ContextSpecific, constructed, number)
    }

    /// Same class and number, ignoring the constructed flag.
    pub fn same_slot(&self, other: &Tag) -> bool {
        self.class == other.class && self.number == other.number
    }

    pub fn is_universal(&self) -> bool {
        self.class == TagClass::Universal
    }
}

/// Name of a universal tag number as printed by dumps and error messages.
pub fn universal_name(number: u32) -> Option<&'static str> {
    let name = match number {
        0 => "EOC",
        1 => "BOOLEAN",
        2 => "INTEGER",
        3 => "BIT STRING",
        4 => "OCTET STRING",
        5 => "NULL",
        6 => "OBJECT IDENTIFIER",
        7 => "ObjectDescriptor",
        8 => "EXTERNAL",
        9 => "REAL",
        10 => "ENUMERATED",
        11 => "EMBEDDED PDV",
        12 => "UTF8String",
        13 => "RELATIVE-OID",
        16 => "SEQUENCE",
        17 => "SET",
        18 => "NumericString",
        19 => "PrintableString",
        20 => "TeletexString",
        21 => "VideotexString",
        22 => "IA5String",
        23 => "UTCTime",
        24 => "GeneralizedTime",
        25 => "GraphicString",
        26 => "VisibleString",
        27 => "GeneralString",
        28 => "UniversalString",
        30 => "BMPString",
        _ => return None,
    };
    Some(name)
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TagClass::Universal => match universal_name(self.number) {
                Some(name) => f.write_str(name)?,
                None => write!(f, "UNIVERSAL {}", self.number)?,
            },
            TagClass::ContextSpecific => write!(f, "[{}]", self.number)?,
            TagClass::Application => write!(f, "[APPLICATION {}]", self.number)?,
            TagClass::Private => write!(f, "[PRIVATE {}]", self.number)?,
        }
        if self.constructed {
            f.write_str(" (constructed)")
        } else {
            Ok(())
        }
    }
}
