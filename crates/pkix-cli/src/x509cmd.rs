//! X.509 certificate display command implementation.

use std::fmt::Write;

use pkix_asn1::PkiObject;
use pkix_schema::x509::Certificate;

pub fn run(input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let der = crate::load_der(input, false)?;
    let cert = Certificate::from_der(&der).map_err(|e| format!("failed to parse certificate: {e}"))?;
    print!("{}", summary(&cert)?);
    Ok(())
}

fn summary(cert: &Certificate) -> Result<String, Box<dyn std::error::Error>> {
    let mut out = String::new();
    let validity = cert.validity();
    writeln!(out, "subject= {}", cert.subject())?;
    writeln!(out, "issuer= {}", cert.issuer())?;
    writeln!(out, "serial= {}", cert.serial_number().to_colon_hex())?;
    writeln!(out, "notBefore= {}", validity.not_before)?;
    writeln!(out, "notAfter= {}", validity.not_after)?;

    let algorithm = &cert.public_key().algorithm;
    let key_name = algorithm.algorithm.name().map_or_else(|| algorithm.algorithm.to_string(), str::to_string);
    match cert.public_key().curve() {
        Some(curve) => {
            writeln!(out, "key= {key_name} ({})", curve.name().unwrap_or("unknown curve"))?;
        }
        None => {
            writeln!(out, "key= {key_name}")?;
        }
    }

    if let Some(names) = cert.subject_alt_names()? {
        let names: Vec<String> = names.iter().map(ToString::to_string).collect();
        writeln!(out, "subjectAltName= {}", names.join(", "))?;
    }
    writeln!(out, "CA= {}", cert.is_ca()?)?;
    for ext in cert.unhandled_critical_extensions() {
        writeln!(out, "unhandled critical extension= {}", ext.extn_id)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CERT_DER: &[u8] = include_bytes!("../../../tests/interop/data/cert.der");

    #[test]
    fn test_summary() {
        let cert = Certificate::from_der(CERT_DER).unwrap();
        let text = summary(&cert).unwrap();
        assert!(text.contains("subject= C=US, O=Example Org, CN=example.com\n"));
        assert!(text.contains("serial= c0:ff:ee:12:34:56:78:9a:bc:de:f0\n"));
        assert!(text.contains("notBefore= 2026-10-18 14:22:17 UTC\n"));
        assert!(text.contains(
            "subjectAltName= DNS:example.com, DNS:www.example.com, IP Address:192.0.2.1\n"
        ));
        assert!(text.contains("CA= true\n"));
        assert!(!text.contains("unhandled"));
    }
}
