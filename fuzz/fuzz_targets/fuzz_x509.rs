#![no_main]
use libfuzzer_sys::fuzz_target;
use pkix_asn1::PkiObject;
use pkix_schema::x509::{Certificate, CertificateList};

fuzz_target!(|data: &[u8]| {
    if let Ok(cert) = Certificate::from_der(data) {
        let back = Certificate::from_der(&cert.to_der()).expect("re-encoding must decode");
        assert!(back.pki_eq(&cert));
        let _ = cert.subject_alt_names();
        let _ = cert.is_ca();
    }
    if let Ok(crl) = CertificateList::from_der(data) {
        for entry in crl.revoked() {
            let _ = entry.reason();
        }
        let _ = crl.crl_number();
    }
});
