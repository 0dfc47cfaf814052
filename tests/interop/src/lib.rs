//! Integration tests for the pkix crates.
//! Fixtures under `data/` were produced by OpenSSL and are decoded and
//! re-encoded here without any OpenSSL at test time.

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use pkix_asn1::oid::known;
    use pkix_asn1::{Block, CodecConfig, Integer, Parser, PkiObject};
    use pkix_schema::keys::{EcPrivateKey, PrivateKeyInfo, RsaPublicKey};
    use pkix_schema::x509::{
        CertificateList, Certificate, CrlReason, GeneralName, SubjectKeyIdentifier,
        SubjectPublicKeyInfo,
    };
    use std::net::Ipv4Addr;

    const CERT_DER: &[u8] = include_bytes!("../data/cert.der");
    const CERT_PEM: &str = include_str!("../data/cert.pem");
    const CRL_DER: &[u8] = include_bytes!("../data/crl.der");
    const CRL_PEM: &str = include_str!("../data/crl.pem");
    const PKCS8_PEM: &str = include_str!("../data/pk8.pem");
    const SEC1_PEM: &str = include_str!("../data/sec1.pem");
    const SPKI_PEM: &str = include_str!("../data/spki.pem");
    const RSA_PUB_DER: &[u8] = include_bytes!("../data/rsapub.der");

    // -------------------------------------------------------
    // 1. Generic tree: lossless parse / encode of real DER
    // -------------------------------------------------------
    #[test]
    fn test_tree_round_trip() {
        for der in [CERT_DER, CRL_DER, RSA_PUB_DER] {
            let block = Block::from_ber(der).unwrap();
            assert_eq!(block.to_ber(), der);
            assert_eq!(&*block.preserved_encoding(), der);
            assert_eq!(block.encoded_len(), der.len());
        }
    }

    #[test]
    fn test_fixtures_are_strict_der() {
        let strict = Parser::new(CodecConfig::der());
        for der in [CERT_DER, CRL_DER, RSA_PUB_DER] {
            strict.parse(der).unwrap();
        }
    }

    #[test]
    fn test_non_minimal_length_only_lenient() {
        // 30 81 F6 .. re-framed as 30 82 00 F6 ..
        assert_eq!(CRL_DER[..3], [0x30, 0x81, 0xF6]);
        let mut padded = vec![0x30, 0x82, 0x00, 0xF6];
        padded.extend_from_slice(&CRL_DER[3..]);

        assert!(CertificateList::from_der_with(&padded, &CodecConfig::der()).is_err());
        let crl = CertificateList::from_der(&padded).unwrap();
        assert_eq!(crl.to_der(), CRL_DER);

        let block = Block::from_ber(&padded).unwrap();
        assert_eq!(&*block.preserved_encoding(), &padded[..]);
        assert_eq!(block.to_ber(), CRL_DER);
    }

    #[test]
    fn test_edit_keeps_untouched_bytes() {
        let cert = Block::from_ber(CERT_DER).unwrap();
        let tbs = &cert.children()[0];
        let mut fields = tbs.children().to_vec();
        fields[1] = Block::integer(7);
        let edited = cert.with_children(vec![
            tbs.with_children(fields),
            cert.children()[1].clone(),
            cert.children()[2].clone(),
        ]);

        let bytes = edited.preserved_encoding().into_owned();
        assert_eq!(bytes.len(), CERT_DER.len() - 11);
        assert!(bytes.ends_with(&CERT_DER[CERT_DER.len() - 80..]));
        let back = Certificate::from_der(&bytes).unwrap();
        assert_eq!(back.serial_number(), &Integer::from(7));
    }

    #[test]
    fn test_dump() {
        let dump = Block::from_ber(CERT_DER).unwrap().to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "    0:d=0  hl=4 l= 495 cons: SEQUENCE");
        assert_eq!(lines[1], "    4:d=1  hl=4 l= 406 cons: SEQUENCE");
        assert_eq!(lines[2], "    8:d=2  hl=2 l=   3 cons: cont [ 0 ]");
        assert_eq!(lines[3], "   10:d=3  hl=2 l=   1 prim: INTEGER           :02");
        assert_eq!(lines[4], "   13:d=2  hl=2 l=  12 prim: INTEGER           :C0FFEE123456789ABCDEF0");
        assert!(dump.contains("  100:d=3  hl=2 l=  13 prim: UTCTime           :261018142217Z"));
    }

    // -------------------------------------------------------
    // 2. Certificate
    // -------------------------------------------------------
    #[test]
    fn test_certificate_round_trip() {
        let cert = Certificate::from_der(CERT_DER).unwrap();
        assert_eq!(cert.to_der(), CERT_DER);

        let from_pem = Certificate::from_pem(CERT_PEM).unwrap();
        assert_eq!(from_pem, cert);
        assert_eq!(from_pem.to_pem(), CERT_PEM);
        assert!(cert.pki_eq(&from_pem));
    }

    #[test]
    fn test_certificate_fields() {
        let cert = Certificate::from_der(CERT_DER).unwrap();
        assert_eq!(
            cert.serial_number().as_bytes(),
            hex!("00 C0 FF EE 12 34 56 78 9A BC DE F0")
        );
        assert_eq!(cert.subject().to_string(), "C=US, O=Example Org, CN=example.com");
        assert_eq!(cert.subject().common_name(), Some("example.com"));
        assert!(cert.is_self_issued());
        assert_eq!(cert.signature_algorithm.algorithm, known::ecdsa_with_sha256());

        let validity = cert.validity();
        assert_eq!(validity.not_before.to_string(), "2026-10-18 14:22:17 UTC");
        assert_eq!(validity.not_after.to_string(), "2036-10-15 14:22:17 UTC");
        assert!(validity.contains(validity.not_before.to_unix()));
        assert!(!validity.contains(validity.not_after.to_unix() + 1));
    }

    #[test]
    fn test_certificate_extensions() {
        let cert = Certificate::from_der(CERT_DER).unwrap();

        let names = cert.subject_alt_names().unwrap().unwrap();
        let dns: Vec<&str> = names.iter().filter_map(GeneralName::as_dns_name).collect();
        assert_eq!(dns, ["example.com", "www.example.com"]);
        let ips: Vec<_> = names.iter().filter_map(GeneralName::ip_addr).collect();
        assert_eq!(ips, [Ipv4Addr::new(192, 0, 2, 1)]);

        let bc = cert.basic_constraints().unwrap().unwrap();
        assert!(bc.ca);
        assert!(cert.extension(&known::basic_constraints()).unwrap().critical);
        assert!(cert.is_ca().unwrap());
        assert_eq!(cert.unhandled_critical_extensions().count(), 0);

        let ski: SubjectKeyIdentifier = cert
            .extension_value(&known::subject_key_identifier())
            .unwrap()
            .unwrap();
        assert_eq!(ski.0, hex!("06D42A3052FC5E5E9904736315F57D88BB2EAEDC"));
    }

    // -------------------------------------------------------
    // 3. CRL
    // -------------------------------------------------------
    #[test]
    fn test_crl() {
        let crl = CertificateList::from_der(CRL_DER).unwrap();
        assert_eq!(crl.to_der(), CRL_DER);
        assert_eq!(CertificateList::from_pem(CRL_PEM).unwrap(), crl);
        assert_eq!(crl.to_pem(), CRL_PEM);

        assert_eq!(crl.issuer().common_name(), Some("example.com"));
        assert_eq!(crl.crl_number().unwrap(), Some(Integer::from(4096)));
        assert_eq!(crl.revoked().len(), 1);

        let entry = crl.find_revoked(&Integer::from(0x0A1B)).unwrap();
        assert_eq!(entry.revocation_date.to_string(), "2026-10-18 15:00:00 UTC");
        assert_eq!(entry.reason().unwrap(), Some(CrlReason::KeyCompromise));
    }

    // -------------------------------------------------------
    // 4. Keys
    // -------------------------------------------------------
    #[test]
    fn test_spki_matches_certificate() {
        let spki = SubjectPublicKeyInfo::from_pem(SPKI_PEM).unwrap();
        let cert = Certificate::from_der(CERT_DER).unwrap();
        assert_eq!(&spki, cert.public_key());
        assert_eq!(spki.curve(), Some(&known::prime256v1()));
        assert_eq!(spki.to_pem(), SPKI_PEM);
    }

    #[test]
    fn test_pkcs8_and_sec1_hold_the_same_key() {
        let pkcs8 = PrivateKeyInfo::from_pem(PKCS8_PEM).unwrap();
        assert_eq!(pkcs8.to_pem(), PKCS8_PEM);
        let inner = pkcs8.ec_private_key().unwrap();

        let sec1 = EcPrivateKey::from_pem(SEC1_PEM).unwrap();
        assert_eq!(sec1.to_pem(), SEC1_PEM);
        assert_eq!(inner.private_key(), sec1.private_key());
        assert_eq!(inner.public_key(), sec1.public_key());
        assert_eq!(sec1.named_curve(), Some(&known::prime256v1()));

        let spki = SubjectPublicKeyInfo::from_pem(SPKI_PEM).unwrap();
        assert_eq!(sec1.public_key(), Some(&spki.subject_public_key));
    }

    #[test]
    fn test_rsa_public_key() {
        let key = RsaPublicKey::from_der(RSA_PUB_DER).unwrap();
        assert_eq!(key.bit_len(), 2048);
        assert_eq!(key.public_exponent, Integer::from(65537));
        assert_eq!(key.modulus.as_bytes()[..3], [0x00, 0x9B, 0x9D]);
        assert_eq!(key.to_der(), RSA_PUB_DER);
    }

    #[test]
    fn test_wrong_type_is_schema_error() {
        let err = Certificate::from_der(CRL_DER).unwrap_err();
        assert!(err.to_string().starts_with("schema error: "));
        assert!(PrivateKeyInfo::from_pem(CERT_PEM).is_err());
    }
}
