//! Arbitrary-precision ASN.1 INTEGER.
//!
//! Values are held in their DER content form: minimal two's-complement,
//! big-endian. Serial numbers and key components routinely exceed 64 bits,
//! so the native-integer views are either checked (`to_i64`, `to_u64`) or
//! explicitly lossy (`to_i64_lossy`).

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use pkix_types::{Asn1Error, Tag};
use zeroize::Zeroize;

use super::tags;

/// A signed integer of unbounded size in DER content encoding.
///
/// The content octets are wiped when the value is dropped.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Integer {
    /// Minimal two's-complement big-endian bytes, never empty.
    bytes: Vec<u8>,
}

impl Integer {
    pub fn zero() -> Self {
        Self { bytes: vec![0x00] }
    }

    /// Encode a sign and big-endian magnitude as minimal two's complement.
    fn from_sign_magnitude(negative: bool, magnitude: &[u8]) -> Self {
        let start = magnitude
            .iter()
            .position(|&b| b != 0)
            .unwrap_or(magnitude.len());
        let digits = &magnitude[start..];
        if digits.is_empty() {
            return Self::zero();
        }

        let mut bytes = digits.to_vec();
        if negative {
            for b in bytes.iter_mut() {
                *b = !*b;
            }
            for b in bytes.iter_mut().rev() {
                let (sum, carry) = b.overflowing_add(1);
                *b = sum;
                if !carry {
                    break;
                }
            }
            if bytes[0] & 0x80 == 0 {
                bytes.insert(0, 0xFF);
            }
        } else if bytes[0] & 0x80 != 0 {
            bytes.insert(0, 0x00);
        }
        Self::from_twos_complement(bytes)
    }

    /// Take ownership of two's-complement bytes, dropping redundant sign
    /// octets so the stored form is minimal.
    fn from_twos_complement(mut bytes: Vec<u8>) -> Self {
        let redundant = redundant_prefix_len(&bytes);
        if redundant > 0 {
            bytes.drain(..redundant);
        }
        Self { bytes }
    }

    /// Build from INTEGER content octets. Non-minimal input is normalized.
    pub fn from_der_content(content: &[u8]) -> Result<Self, Asn1Error> {
        if content.is_empty() {
            return Err(Asn1Error::invalid(
                Tag::universal(tags::INTEGER, false),
                "empty content",
            ));
        }
        Ok(Self::from_twos_complement(content.to_vec()))
    }

    /// Interpret `bytes` as an unsigned big-endian magnitude, as found in raw
    /// key material.
    pub fn from_unsigned_bytes(bytes: &[u8]) -> Self {
        Self::from_sign_magnitude(false, bytes)
    }

    pub fn from_bigint(value: &BigInt) -> Self {
        let negative = value.sign() == Sign::Minus;
        Self::from_sign_magnitude(negative, &value.magnitude().to_bytes_be())
    }

    pub fn from_i128(value: i128) -> Self {
        Self::from_sign_magnitude(value < 0, &value.unsigned_abs().to_be_bytes())
    }

    pub fn from_u128(value: u128) -> Self {
        Self::from_sign_magnitude(false, &value.to_be_bytes())
    }

    /// Parse a hexadecimal magnitude, optionally prefixed by `-` and/or `0x`.
    pub fn from_hex(s: &str) -> Result<Self, Asn1Error> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let digits = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest);
        let magnitude = BigUint::parse_bytes(digits.as_bytes(), 16)
            .ok_or_else(|| Asn1Error::InvalidInteger(format!("invalid hex integer {s:?}")))?;
        Ok(Self::from_sign_magnitude(negative, &magnitude.to_bytes_be()))
    }

    /// Content octets as they appear in a DER INTEGER.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True if `content` is already in minimal form.
    pub fn is_minimal(content: &[u8]) -> bool {
        !content.is_empty() && redundant_prefix_len(content) == 0
    }

    pub fn is_negative(&self) -> bool {
        self.bytes[0] & 0x80 != 0
    }

    pub fn is_zero(&self) -> bool {
        self.bytes == [0x00]
    }

    /// Big-endian magnitude without the sign octet.
    pub fn magnitude_bytes(&self) -> Vec<u8> {
        if !self.is_negative() {
            return strip_sign_padding(&self.bytes).to_vec();
        }
        // Negate: complement then add one
        let mut magnitude: Vec<u8> = self.bytes.iter().map(|b| !b).collect();
        for b in magnitude.iter_mut().rev() {
            let (sum, carry) = b.overflowing_add(1);
            *b = sum;
            if !carry {
                break;
            }
        }
        strip_sign_padding(&magnitude).to_vec()
    }

    /// Exact arbitrary-precision value.
    pub fn to_bigint(&self) -> BigInt {
        let sign = if self.is_negative() {
            Sign::Minus
        } else if self.is_zero() {
            Sign::NoSign
        } else {
            Sign::Plus
        };
        BigInt::from_biguint(sign, BigUint::from_bytes_be(&self.magnitude_bytes()))
    }

    /// The value as an `i64`, or `None` if it does not fit.
    pub fn to_i64(&self) -> Option<i64> {
        if self.bytes.len() > 8 {
            return None;
        }
        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 8];
        buf[8 - self.bytes.len()..].copy_from_slice(&self.bytes);
        Some(i64::from_be_bytes(buf))
    }

    /// The value as a `u64`, or `None` if it is negative or too large.
    pub fn to_u64(&self) -> Option<u64> {
        if self.is_negative() {
            return None;
        }
        let digits = strip_sign_padding(&self.bytes);
        if digits.len() > 8 {
            return None;
        }
        let mut buf = [0u8; 8];
        buf[8 - digits.len()..].copy_from_slice(digits);
        Some(u64::from_be_bytes(buf))
    }

    /// Native view that keeps only the low 64 bits of values outside the
    /// `i64` range, logging a warning when that happens.
    pub fn to_i64_lossy(&self) -> i64 {
        if let Some(v) = self.to_i64() {
            return v;
        }
        log::warn!(
            "INTEGER of {} bytes exceeds 64 bits, truncating",
            self.bytes.len()
        );
        let low = &self.bytes[self.bytes.len() - 8..];
        let mut buf = [0u8; 8];
        buf.copy_from_slice(low);
        i64::from_be_bytes(buf)
    }

    /// Uppercase hex of the magnitude, without the DER sign octet, prefixed by
    /// `-` for negative values (e.g. serial `00 C0 FF EE` prints `C0FFEE`).
    pub fn to_hex(&self) -> String {
        let hex: String = self
            .magnitude_bytes()
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect();
        if self.is_negative() {
            format!("-{hex}")
        } else {
            hex
        }
    }

    /// Colon-separated hex of the content octets with the sign padding removed,
    /// the layout used when printing serial numbers and key moduli.
    pub fn to_colon_hex(&self) -> String {
        let digits = if self.is_negative() {
            &self.bytes[..]
        } else {
            strip_sign_padding(&self.bytes)
        };
        digits
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Count leading octets that only repeat the sign of the following octet.
fn redundant_prefix_len(bytes: &[u8]) -> usize {
    let mut n = 0;
    while n + 1 < bytes.len() {
        let (a, b) = (bytes[n], bytes[n + 1]);
        let redundant = (a == 0x00 && b & 0x80 == 0) || (a == 0xFF && b & 0x80 != 0);
        if !redundant {
            break;
        }
        n += 1;
    }
    n
}

fn strip_sign_padding(bytes: &[u8]) -> &[u8] {
    if bytes.len() > 1 && bytes[0] == 0x00 {
        &bytes[1..]
    } else {
        bytes
    }
}

impl Drop for Integer {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl Default for Integer {
    fn default() -> Self {
        Self::zero()
    }
}

macro_rules! impl_from_native {
    ($($t:ty => $via:ident),* $(,)?) => {
        $(
            impl From<$t> for Integer {
                fn from(value: $t) -> Self {
                    Self::$via(value.into())
                }
            }
        )*
    };
}

impl_from_native!(
    i8 => from_i128, i16 => from_i128, i32 => from_i128, i64 => from_i128, i128 => from_i128,
    u8 => from_u128, u16 => from_u128, u32 => from_u128, u64 => from_u128, u128 => from_u128,
);

impl From<&BigInt> for Integer {
    fn from(value: &BigInt) -> Self {
        Self::from_bigint(value)
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Self::from_bigint(&value)
    }
}

impl FromStr for Integer {
    type Err = Asn1Error;

    /// Parse a decimal string with an optional leading `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigInt::parse_bytes(s.trim().as_bytes(), 10)
            .ok_or_else(|| Asn1Error::InvalidInteger(format!("invalid decimal integer {s:?}")))?;
        Ok(Self::from_bigint(&value))
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bigint())
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: String = self.bytes.iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "Integer(0x{hex})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;

    #[test]
    fn test_boundary_encodings() {
        assert_eq!(Integer::from(0).as_bytes(), hex!("00"));
        assert_eq!(Integer::from(127).as_bytes(), hex!("7F"));
        assert_eq!(Integer::from(128).as_bytes(), hex!("00 80"));
        assert_eq!(Integer::from(-1).as_bytes(), hex!("FF"));
        assert_eq!(Integer::from(256).as_bytes(), hex!("01 00"));
        assert_eq!(Integer::from(-128).as_bytes(), hex!("80"));
        assert_eq!(Integer::from(-129).as_bytes(), hex!("FF 7F"));
        assert_eq!(Integer::from(-256).as_bytes(), hex!("FF 00"));
        assert_eq!(Integer::from(i64::MIN).as_bytes(), hex!("80 00 00 00 00 00 00 00"));
        assert_eq!(
            Integer::from(u64::MAX).as_bytes(),
            hex!("00 FF FF FF FF FF FF FF FF")
        );
    }

    #[test]
    fn test_decode_boundaries() {
        for v in [0i64, 1, 127, 128, 255, 256, -1, -127, -128, -129, i64::MAX, i64::MIN] {
            let int = Integer::from_der_content(Integer::from(v).as_bytes()).unwrap();
            assert_eq!(int.to_i64(), Some(v));
            assert_eq!(int.to_bigint(), BigInt::from(v));
        }
    }

    #[test]
    fn test_normalizes_non_minimal_content() {
        let int = Integer::from_der_content(&hex!("00 00 7F")).unwrap();
        assert_eq!(int.as_bytes(), hex!("7F"));
        let int = Integer::from_der_content(&hex!("FF FF 80")).unwrap();
        assert_eq!(int.as_bytes(), hex!("80"));
        assert!(!Integer::is_minimal(&hex!("00 7F")));
        assert!(Integer::is_minimal(&hex!("00 80")));
        assert!(Integer::from_der_content(&[]).is_err());
    }

    #[test]
    fn test_rsa_modulus_roundtrip() {
        // 2048-bit modulus generated by OpenSSL, high bit set
        let modulus = hex!(
            "9b9d45c3ecfa3f771b81408efa3231854d5d38a895b08a177d589b6f11d890d9"
            "80763f1d190020cfd1acdf4ff043b121a8cbf2fff5479b9e3d8d77f7b1120556"
            "1c437425f2ccc19dffd983d00a100d9d7f9aae1d3672ef420046f880e9a6f5ca"
            "ac7f6eb89ffd23357b2a02920537b20a15d35d0d92e1d95be73acd8a788ddced"
            "512b0b932bb978fad486f4659a41c05f563ab03ae9005ea2e61f56ab79975e2d"
            "b1a83e9ec4530ccf6f0926125a24cf9d2cc272d2ce76cbaeae17d78bd98cd246"
            "5f5e86e86dbfba0fec066a58612cc8155256f9c0e6999405079fa3bfd1dc821f"
            "82476a3948973248fdf405a3ce158cf5075741dc648793fb131f7d890a1b9eab"
        );
        let int = Integer::from_unsigned_bytes(&modulus);
        assert_eq!(int.as_bytes().len(), 257);
        assert_eq!(int.as_bytes()[0], 0x00);
        assert_eq!(int.magnitude_bytes(), modulus.to_vec());

        let big = BigInt::from_bytes_be(Sign::Plus, &modulus);
        assert_eq!(int.to_bigint(), big);
        assert_eq!(Integer::from_bigint(&big), int);
        assert_eq!(Integer::from_bigint(&-big.clone()).to_bigint(), -big);
        assert_eq!(int.to_i64(), None);
    }

    #[test]
    fn test_decimal_and_hex() {
        let int: Integer = "-340282366920938463463374607431768211456".parse().unwrap();
        assert_eq!(int.as_bytes(), hex!("FF 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00"));
        assert_eq!(int.to_string(), "-340282366920938463463374607431768211456");
        assert!("12a".parse::<Integer>().is_err());

        let serial = Integer::from_hex("0xC0FFEE123456789ABCDEF0").unwrap();
        assert_eq!(serial.as_bytes()[0], 0x00);
        assert_eq!(serial.to_hex(), "C0FFEE123456789ABCDEF0");
        assert_eq!(serial.to_colon_hex(), "c0:ff:ee:12:34:56:78:9a:bc:de:f0");
        assert_eq!(Integer::from(-255).to_hex(), "-FF");
    }

    #[test]
    fn test_lossy_view() {
        let big = Integer::from_u128(0x1_0000_0000_0000_0005);
        assert_eq!(big.to_i64(), None);
        assert_eq!(big.to_i64_lossy(), 5);
        assert_eq!(big.to_u64(), None);
        assert_eq!(Integer::from(u64::MAX).to_u64(), Some(u64::MAX));
        assert_eq!(Integer::from(-3).to_u64(), None);
    }

    #[test]
    fn test_views_after_clone_and_drop() {
        let original = Integer::from(-129);
        let copy = original.clone();
        drop(original);
        assert!(copy.is_negative());
        assert_eq!(copy.to_i64_lossy(), -129);
        assert_eq!(copy.magnitude_bytes(), hex!("81"));
        assert_eq!(Integer::default().magnitude_bytes(), hex!("00"));
    }

    proptest! {
        #[test]
        fn i128_roundtrip(v: i128) {
            let int = Integer::from(v);
            prop_assert!(Integer::is_minimal(int.as_bytes()));
            prop_assert_eq!(int.to_bigint(), BigInt::from(v));
            let decoded = Integer::from_der_content(int.as_bytes()).unwrap();
            prop_assert_eq!(decoded, int);
        }

        #[test]
        fn bigint_roundtrip(bytes in proptest::collection::vec(any::<u8>(), 1..64), negative: bool) {
            let sign = if negative { Sign::Minus } else { Sign::Plus };
            let value = BigInt::from_bytes_be(sign, &bytes);
            prop_assert_eq!(Integer::from_bigint(&value).to_bigint(), value);
        }
    }
}
