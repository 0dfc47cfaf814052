#![no_main]
use libfuzzer_sys::fuzz_target;
use pkix_asn1::PkiObject;
use pkix_schema::keys::{EcPrivateKey, PrivateKeyInfo};

fuzz_target!(|data: &[u8]| {
    if let Ok(key) = PrivateKeyInfo::from_der(data) {
        let back = PrivateKeyInfo::from_der(&key.to_der()).expect("re-encoding must decode");
        assert_eq!(back, key);
        let _ = key.ec_private_key();
    }
    let _ = EcPrivateKey::from_der(data);
});
