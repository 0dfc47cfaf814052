//! Key containers: PKCS#8, SEC1 and PKCS#1.

mod pkcs8;
mod rsa;
mod sec1;

pub use pkcs8::PrivateKeyInfo;
pub use rsa::RsaPublicKey;
pub use sec1::EcPrivateKey;
