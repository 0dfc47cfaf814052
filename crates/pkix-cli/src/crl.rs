//! CRL display command.

use std::fmt::Write;

use pkix_asn1::PkiObject;
use pkix_schema::x509::CertificateList;

pub fn run(input: &str) -> Result<(), Box<dyn std::error::Error>> {
    let der = crate::load_der(input, false)?;
    let crl = CertificateList::from_der(&der).map_err(|e| format!("failed to parse CRL: {e}"))?;
    print!("{}", summary(&crl)?);
    Ok(())
}

fn summary(crl: &CertificateList) -> Result<String, Box<dyn std::error::Error>> {
    let tbs = &crl.tbs_cert_list;
    let mut out = String::new();
    writeln!(out, "issuer= {}", crl.issuer())?;
    writeln!(out, "lastUpdate= {}", tbs.this_update)?;
    match &tbs.next_update {
        Some(next) => writeln!(out, "nextUpdate= {next}")?,
        None => writeln!(out, "nextUpdate= NONE")?,
    }
    if let Some(number) = crl.crl_number()? {
        writeln!(out, "crlNumber= {number}")?;
    }

    let revoked = crl.revoked();
    if revoked.is_empty() {
        writeln!(out, "No Revoked Certificates.")?;
    }
    for entry in revoked {
        write!(
            out,
            "serial= {} revoked= {}",
            entry.user_certificate.to_colon_hex(),
            entry.revocation_date
        )?;
        match entry.reason()? {
            Some(reason) => writeln!(out, " reason= {reason:?}")?,
            None => writeln!(out)?,
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRL_DER: &[u8] = include_bytes!("../../../tests/interop/data/crl.der");

    #[test]
    fn test_summary() {
        let crl = CertificateList::from_der(CRL_DER).unwrap();
        let text = summary(&crl).unwrap();
        assert!(text.starts_with("issuer= C=US, O=Example Org, CN=example.com\n"));
        assert!(text.contains("nextUpdate= 2026-11-17 14:38:28 UTC\n"));
        assert!(text.contains("crlNumber= 4096\n"));
        assert!(text.contains("serial= 0a:1b revoked= 2026-10-18 15:00:00 UTC reason= KeyCompromise\n"));
    }
}
