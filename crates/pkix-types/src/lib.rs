#![forbid(unsafe_code)]
#![doc = "Common error types and ASN.1 tag identifiers for the pkix crates."]

pub mod error;
pub mod tag;

pub use error::*;
pub use tag::*;
