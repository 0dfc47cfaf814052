//! PEM <-> DER conversion.

use std::fs;
use std::io::Write;

use pkix_asn1::{pem, Block};

pub fn run(
    input: &str,
    to_der: bool,
    to_pem: bool,
    label: &str,
    out: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = match (to_der, to_pem) {
        (true, false) => {
            let text = fs::read_to_string(input)?;
            pem_to_der(&text)?
        }
        (false, true) => der_to_pem(&fs::read(input)?, label)?.into_bytes(),
        _ => return Err("exactly one of --to-der or --to-pem is required".into()),
    };

    match out {
        Some(path) => fs::write(path, &output)?,
        None => std::io::stdout().write_all(&output)?,
    }
    Ok(())
}

/// Concatenated DER of every block in `text`.
fn pem_to_der(text: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let blocks = pem::parse(text)?;
    if blocks.is_empty() {
        return Err("no PEM blocks found".into());
    }
    for block in &blocks {
        log::info!("PEM block {} ({} bytes)", block.label, block.data.len());
    }
    Ok(blocks.into_iter().flat_map(|block| block.data).collect())
}

fn der_to_pem(der: &[u8], label: &str) -> Result<String, Box<dyn std::error::Error>> {
    Block::from_ber(der).map_err(|e| format!("input is not a single BER element: {e}"))?;
    Ok(pem::encode(label, der))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion() {
        let der = [0x30, 0x03, 0x02, 0x01, 0x05];
        let text = der_to_pem(&der, "TEST").unwrap();
        assert_eq!(text, "-----BEGIN TEST-----\nMAMCAQU=\n-----END TEST-----\n");
        assert_eq!(pem_to_der(&text).unwrap(), der);
    }

    #[test]
    fn test_rejects_non_ber() {
        assert!(der_to_pem(&[0x30, 0x05, 0x02], "TEST").is_err());
        assert!(pem_to_der("no armour here").is_err());
    }
}
