//! UTCTime and GeneralizedTime values.

use std::fmt;

use pkix_types::{Asn1Error, Tag};

use super::tags;

/// A calendar date and time in UTC, as carried by UTCTime and
/// GeneralizedTime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asn1Time {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

const SECS_PER_DAY: i64 = 86_400;

impl Asn1Time {
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, Asn1Error> {
        let valid = year <= 9999
            && (1..=12).contains(&month)
            && day >= 1
            && day <= days_in_month(year, month)
            && hour <= 23
            && minute <= 59
            && second <= 59;
        if !valid {
            return Err(Asn1Error::invalid(
                generalized_tag(),
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} is not a valid date"),
            ));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond: 0,
        })
    }

    pub fn with_nanosecond(self, nanosecond: u32) -> Result<Self, Asn1Error> {
        if nanosecond >= 1_000_000_000 {
            return Err(Asn1Error::invalid(
                generalized_tag(),
                "fraction of a second out of range",
            ));
        }
        Ok(Self { nanosecond, ..self })
    }

    /// Convert seconds since 1970-01-01T00:00:00Z.
    pub fn from_unix(timestamp: i64) -> Result<Self, Asn1Error> {
        let days = timestamp.div_euclid(SECS_PER_DAY);
        let day_secs = timestamp.rem_euclid(SECS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        if !(0..=9999).contains(&year) {
            return Err(Asn1Error::invalid(
                generalized_tag(),
                format!("timestamp {timestamp} is outside years 0000-9999"),
            ));
        }
        Self::new(
            year as u16,
            month,
            day,
            (day_secs / 3600) as u8,
            ((day_secs % 3600) / 60) as u8,
            (day_secs % 60) as u8,
        )
    }

    /// Seconds since 1970-01-01T00:00:00Z, ignoring any fraction.
    pub fn to_unix(&self) -> i64 {
        let days = days_from_civil(self.year as i64, self.month, self.day);
        days * SECS_PER_DAY + self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    pub fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// True if UTCTime can represent this value (RFC 5280: 1950 through 2049,
    /// whole seconds).
    pub fn fits_utc_time(&self) -> bool {
        (1950..=2049).contains(&self.year) && self.nanosecond == 0
    }

    /// Parse UTCTime content: `YYMMDDhhmm[ss]` followed by `Z` or `±hhmm`.
    /// Two-digit years 00-49 map to 2000-2049, 50-99 to 1950-1999.
    pub fn parse_utc_time(s: &str, strict: bool) -> Result<Self, Asn1Error> {
        let tag = utc_tag();
        let b = s.as_bytes();
        let yy = digits(b, 0, 2, tag)?;
        let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
        let month = digits(b, 2, 2, tag)?;
        let day = digits(b, 4, 2, tag)?;
        let hour = digits(b, 6, 2, tag)?;
        let minute = digits(b, 8, 2, tag)?;
        let (second, pos) = if b.get(10).is_some_and(u8::is_ascii_digit) {
            (digits(b, 10, 2, tag)?, 12)
        } else {
            if strict {
                return Err(Asn1Error::NonCanonical("UTCTime without seconds"));
            }
            (0, 10)
        };
        let time = Self::new(
            year as u16,
            month as u8,
            day as u8,
            hour as u8,
            minute as u8,
            second as u8,
        )
        .map_err(|_| Asn1Error::invalid(tag, format!("invalid date in {s:?}")))?;
        let time = apply_zone(time, &b[pos..], strict, tag)?;
        if !time.fits_utc_time() {
            return Err(Asn1Error::invalid(
                tag,
                format!("{s:?} normalizes to {time}, outside 1950-2049"),
            ));
        }
        Ok(time)
    }

    /// Parse GeneralizedTime content: `YYYYMMDDhh[mm[ss]][.fff]` followed by
    /// `Z` or `±hhmm`. Local times without a zone are rejected.
    pub fn parse_generalized_time(s: &str, strict: bool) -> Result<Self, Asn1Error> {
        let tag = generalized_tag();
        let b = s.as_bytes();
        let year = digits(b, 0, 4, tag)?;
        let month = digits(b, 4, 2, tag)?;
        let day = digits(b, 6, 2, tag)?;
        let hour = digits(b, 8, 2, tag)?;
        let mut pos = 10;
        let mut minute = 0;
        let mut second = 0;
        if b.get(pos).is_some_and(u8::is_ascii_digit) {
            minute = digits(b, pos, 2, tag)?;
            pos += 2;
            if b.get(pos).is_some_and(u8::is_ascii_digit) {
                second = digits(b, pos, 2, tag)?;
                pos += 2;
            }
        }
        if strict && pos != 14 {
            return Err(Asn1Error::NonCanonical(
                "GeneralizedTime without minutes or seconds",
            ));
        }

        let mut nanosecond = 0u32;
        if let Some(&sep) = b.get(pos).filter(|&&c| c == b'.' || c == b',') {
            if strict && sep == b',' {
                return Err(Asn1Error::NonCanonical("GeneralizedTime comma separator"));
            }
            pos += 1;
            let start = pos;
            while b.get(pos).is_some_and(u8::is_ascii_digit) {
                pos += 1;
            }
            let fraction = &b[start..pos];
            if fraction.is_empty() {
                return Err(Asn1Error::invalid(tag, format!("empty fraction in {s:?}")));
            }
            if fraction.len() > 9 {
                return Err(Asn1Error::invalid(
                    tag,
                    format!("fraction in {s:?} is finer than nanoseconds"),
                ));
            }
            if strict && fraction.last() == Some(&b'0') {
                return Err(Asn1Error::NonCanonical("GeneralizedTime fraction trailing zero"));
            }
            for i in 0..9 {
                let digit = fraction.get(i).map_or(0, |d| (d - b'0') as u32);
                nanosecond = nanosecond * 10 + digit;
            }
        }

        let time = Self::new(
            year as u16,
            month as u8,
            day as u8,
            hour as u8,
            minute as u8,
            second as u8,
        )
        .and_then(|t| t.with_nanosecond(nanosecond))
        .map_err(|_| Asn1Error::invalid(tag, format!("invalid date in {s:?}")))?;
        apply_zone(time, &b[pos..], strict, tag)
    }

    /// UTCTime text `YYMMDDhhmmssZ`.
    pub fn to_utc_time_string(&self) -> Result<String, Asn1Error> {
        if !self.fits_utc_time() {
            return Err(Asn1Error::unencodable(
                utc_tag(),
                format!("{self} is outside 1950-2049 or has a fraction"),
            ));
        }
        Ok(self.utc_time_digits())
    }

    /// UTCTime text without the range check; callers validate first.
    pub(crate) fn utc_time_digits(&self) -> String {
        format!(
            "{:02}{:02}{:02}{:02}{:02}{:02}Z",
            self.year % 100,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// GeneralizedTime text `YYYYMMDDhhmmss[.f]Z` with trailing fraction zeros
    /// removed.
    pub fn to_generalized_time_string(&self) -> String {
        let mut s = format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        );
        if self.nanosecond > 0 {
            let fraction = format!("{:09}", self.nanosecond);
            s.push('.');
            s.push_str(fraction.trim_end_matches('0'));
        }
        s.push('Z');
        s
    }
}

impl fmt::Display for Asn1Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        if self.nanosecond > 0 {
            let fraction = format!("{:09}", self.nanosecond);
            write!(f, ".{}", fraction.trim_end_matches('0'))?;
        }
        f.write_str(" UTC")
    }
}

fn utc_tag() -> Tag {
    Tag::universal(tags::UTC_TIME, false)
}

fn generalized_tag() -> Tag {
    Tag::universal(tags::GENERALIZED_TIME, false)
}

fn digits(b: &[u8], pos: usize, n: usize, tag: Tag) -> Result<u32, Asn1Error> {
    let field = b
        .get(pos..pos + n)
        .filter(|f| f.iter().all(u8::is_ascii_digit))
        .ok_or_else(|| Asn1Error::invalid(tag, format!("expected {n} digits at position {pos}")))?;
    Ok(field.iter().fold(0, |acc, d| acc * 10 + (d - b'0') as u32))
}

/// Consume the zone designator and normalize the time to UTC.
fn apply_zone(time: Asn1Time, rest: &[u8], strict: bool, tag: Tag) -> Result<Asn1Time, Asn1Error> {
    match rest {
        [b'Z'] => Ok(time),
        [sign @ (b'+' | b'-'), ..] if rest.len() == 5 => {
            if strict {
                return Err(Asn1Error::NonCanonical("time zone offset instead of Z"));
            }
            let hh = digits(rest, 1, 2, tag)? as i64;
            let mm = digits(rest, 3, 2, tag)? as i64;
            if hh > 23 || mm > 59 {
                return Err(Asn1Error::invalid(tag, "time zone offset out of range"));
            }
            let offset = (hh * 3600 + mm * 60) * if *sign == b'+' { 1 } else { -1 };
            Asn1Time::from_unix(time.to_unix() - offset)?.with_nanosecond(time.nanosecond)
        }
        [] => Err(Asn1Error::invalid(tag, "local time without zone designator")),
        _ => Err(Asn1Error::invalid(tag, "malformed zone designator")),
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let m = month as i64;
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Proleptic Gregorian date for a count of days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
