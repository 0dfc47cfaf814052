use std::fmt;
use std::sync::OnceLock;

use pkix_asn1::asn1::tags;
use pkix_asn1::{Asn1Time, Block, Choice, Decoder, PkiObject};
use pkix_types::SchemaError;

/// ```text
/// Time ::= CHOICE {
///     utcTime        UTCTime,
///     generalTime    GeneralizedTime
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Time {
    UtcTime(Asn1Time),
    GeneralizedTime(Asn1Time),
}

impl Time {
    /// RFC 5280 §4.1.2.5: UTCTime through 2049, GeneralizedTime after.
    pub fn new(time: Asn1Time) -> Self {
        if time.fits_utc_time() {
            Time::UtcTime(time)
        } else {
            Time::GeneralizedTime(time)
        }
    }

    pub fn from_unix(timestamp: i64) -> Result<Self, SchemaError> {
        Ok(Self::new(Asn1Time::from_unix(timestamp)?))
    }

    pub fn time(&self) -> Asn1Time {
        match *self {
            Time::UtcTime(t) | Time::GeneralizedTime(t) => t,
        }
    }

    pub fn to_unix(&self) -> i64 {
        self.time().to_unix()
    }
}

fn alternatives() -> Result<&'static Choice<Time>, SchemaError> {
    static CHOICE: OnceLock<Result<Choice<Time>, SchemaError>> = OnceLock::new();
    CHOICE
        .get_or_init(|| {
            Choice::builder("Time")
                .universal(tags::UTC_TIME, |b| Ok(Time::UtcTime(*b.expect_time("Time")?)))
                .universal(tags::GENERALIZED_TIME, |b| {
                    Ok(Time::GeneralizedTime(*b.expect_time("Time")?))
                })
                .build()
        })
        .as_ref()
        .map_err(Clone::clone)
}

impl PkiObject for Time {
    fn to_asn1(&self) -> Block {
        match *self {
            Time::UtcTime(t) => Block::utc_time(t).unwrap_or_else(|e| {
                log::warn!("{t} cannot be a UTCTime ({e}); writing GeneralizedTime");
                Block::generalized_time(t)
            }),
            Time::GeneralizedTime(t) => Block::generalized_time(t),
        }
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        alternatives()?.decode(block)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.time(), f)
    }
}

/// ```text
/// Validity ::= SEQUENCE {
///     notBefore      Time,
///     notAfter       Time
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

impl Validity {
    pub fn new(not_before: Time, not_after: Time) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    /// True if `timestamp` (UNIX seconds) lies within the period, inclusive.
    pub fn contains(&self, timestamp: i64) -> bool {
        self.not_before.to_unix() <= timestamp && timestamp <= self.not_after.to_unix()
    }
}

impl PkiObject for Validity {
    fn to_asn1(&self) -> Block {
        Block::sequence(vec![self.not_before.to_asn1(), self.not_after.to_asn1()])
    }

    fn from_asn1(block: &Block) -> Result<Self, SchemaError> {
        let mut d = Decoder::sequence("Validity", block)?;
        let not_before = Time::from_asn1(d.read("notBefore")?)?;
        let not_after = Time::from_asn1(d.read("notAfter")?)?;
        d.finish()?;
        Ok(Self {
            not_before,
            not_after,
        })
    }
}
