//! OID encode/decode.

use pkix_asn1::oid::registry;
use pkix_asn1::{Block, Oid};

pub fn run(value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let oid = resolve(value)?;
    let der = Block::oid(oid.clone()).to_ber();
    println!("oid:  {oid}");
    println!("name: {}", oid.name().unwrap_or("(unknown)"));
    println!("der:  {}", hex_str(&der));
    Ok(())
}

/// A dotted OID, a registered name, or hex DER of a complete OBJECT IDENTIFIER.
fn resolve(value: &str) -> Result<Oid, Box<dyn std::error::Error>> {
    let value = value.trim();
    if value.contains('.') {
        return Ok(value.parse()?);
    }
    if let Some(oid) = registry::lookup(value) {
        return Ok(oid);
    }
    let bytes = parse_hex(value).ok_or_else(|| format!("{value:?} is not an OID, a known name or hex"))?;
    let block = Block::from_ber(&bytes)?;
    block
        .as_oid()
        .cloned()
        .ok_or_else(|| format!("element is {:?}, not an OBJECT IDENTIFIER", block.tag()).into())
}

/// Hex digits, optionally separated by spaces or colons.
pub(crate) fn parse_hex(s: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !matches!(b, b' ' | b':'))
        .map(|b| (b as char).to_digit(16).map(|d| d as u8))
        .collect::<Option<_>>()?;
    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    Some(digits.chunks(2).map(|pair| pair[0] << 4 | pair[1]).collect())
}

pub(crate) fn hex_str(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_forms() {
        let cn: Oid = "2.5.4.3".parse().unwrap();
        assert_eq!(resolve("2.5.4.3").unwrap(), cn);
        assert_eq!(resolve("06 03 55 04 03").unwrap(), cn);
        assert_eq!(resolve("06:03:55:04:03").unwrap(), cn);
        assert_eq!(resolve("commonName").unwrap(), cn);
    }

    #[test]
    fn test_resolve_errors() {
        assert!(resolve("02 01 05").is_err());
        assert!(resolve("xyz").is_err());
        assert!(resolve("1..2").is_err());
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_hex("0a FF"), Some(vec![0x0A, 0xFF]));
        assert_eq!(parse_hex("abc"), None);
        assert_eq!(parse_hex(""), None);
        assert_eq!(hex_str(&[0x06, 0x03]), "06 03");
    }
}
