#![forbid(unsafe_code)]
#![doc = "PKI structures for the pkix object model: X.509 certificates and CRLs, names, extensions and key containers."]

#[cfg(feature = "x509")]
pub mod x509;

#[cfg(feature = "keys")]
pub mod keys;
