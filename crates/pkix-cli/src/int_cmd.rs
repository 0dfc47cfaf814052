//! INTEGER encoding.

use pkix_asn1::{Block, Integer};

use crate::oid_cmd::hex_str;

pub fn run(value: &str) -> Result<(), Box<dyn std::error::Error>> {
    let integer = parse(value)?;
    println!("value: {integer}");
    println!("hex:   {}", integer.to_hex());
    println!("der:   {}", hex_str(&Block::integer(integer.clone()).to_ber()));
    if integer.to_i64().is_none() {
        log::info!("value does not fit in 64 bits");
    }
    Ok(())
}

fn parse(value: &str) -> Result<Integer, pkix_asn1::Asn1Error> {
    let value = value.trim();
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    if unsigned.starts_with("0x") || unsigned.starts_with("0X") {
        Integer::from_hex(value)
    } else {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn der(value: &str) -> Vec<u8> {
        Block::integer(parse(value).unwrap()).to_ber()
    }

    #[test]
    fn test_encodings() {
        assert_eq!(der("0"), [0x02, 0x01, 0x00]);
        assert_eq!(der("128"), [0x02, 0x02, 0x00, 0x80]);
        assert_eq!(der("-129"), [0x02, 0x02, 0xFF, 0x7F]);
        assert_eq!(der("0xFF"), [0x02, 0x02, 0x00, 0xFF]);
        assert_eq!(der("-0x80"), [0x02, 0x01, 0x80]);
    }

    #[test]
    fn test_invalid() {
        assert!(parse("12a").is_err());
        assert!(parse("0xZZ").is_err());
    }
}
