//! PDF date strings.
//!
//! PDF dates (ISO 32000-1:2008, Section 7.9.4) look like
//! `D:YYYYMMDDHHmmSSOHH'mm'` where everything after the year is optional and
//! `O` is one of `Z`, `+` or `-`. XMP wants the same instant as a W3C date.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};
use std::fmt;

/// A parsed PDF date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfDate(DateTime<FixedOffset>);

impl PdfDate {
    /// Wrap an existing date.
    pub fn new(date: DateTime<FixedOffset>) -> Self {
        Self(date)
    }

    /// The current time in UTC.
    pub fn now() -> Self {
        Self(Utc::now().fixed_offset())
    }

    /// Parse a PDF date string.
    ///
    /// Missing month/day default to 1, missing time fields to 0 and a missing
    /// offset to UTC. Returns a human readable reason on failure.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let body = s.strip_prefix("D:").unwrap_or(s);
        let bytes = body.as_bytes();

        let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits < 4 {
            return Err(format!("expected at least a 4-digit year in {:?}", s));
        }
        if digits > 14 || digits % 2 != 0 {
            return Err(format!("malformed date/time digits in {:?}", s));
        }

        let field = |start: usize, default: u32| -> u32 {
            if start + 2 <= digits {
                body[start..start + 2].parse().unwrap_or(default)
            } else {
                default
            }
        };
        let year: i32 = body[..4]
            .parse()
            .map_err(|_| format!("invalid year in {:?}", s))?;
        let month = field(4, 1);
        let day = field(6, 1);
        let hour = field(8, 0);
        let minute = field(10, 0);
        let second = field(12, 0);

        let offset = parse_offset(&body[digits..])
            .ok_or_else(|| format!("invalid UTC offset in {:?}", s))?;

        let naive = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .ok_or_else(|| format!("date out of range in {:?}", s))?;

        offset
            .from_local_datetime(&naive)
            .single()
            .map(Self)
            .ok_or_else(|| format!("ambiguous local time in {:?}", s))
    }

    /// The date as a chrono value.
    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// W3C date format used by XMP (`2024-01-15T10:30:00+01:00`, `Z` for UTC).
    pub fn to_w3c(&self) -> String {
        w3c(&self.0)
    }

    /// PDF date format for Info dictionaries (`D:20240115103000+01'00'`).
    pub fn to_pdf_string(&self) -> String {
        let offset_secs = self.0.offset().local_minus_utc();
        let mut out = self.0.format("D:%Y%m%d%H%M%S").to_string();
        if offset_secs == 0 {
            out.push('Z');
        } else {
            let sign = if offset_secs < 0 { '-' } else { '+' };
            let abs = offset_secs.abs();
            out.push_str(&format!("{}{:02}'{:02}'", sign, abs / 3600, (abs % 3600) / 60));
        }
        out
    }
}

impl fmt::Display for PdfDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pdf_string())
    }
}

impl From<DateTime<FixedOffset>> for PdfDate {
    fn from(date: DateTime<FixedOffset>) -> Self {
        Self(date)
    }
}

/// Format a date in W3C form.
pub fn w3c(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_offset(rest: &str) -> Option<FixedOffset> {
    let mut chars = rest.chars();
    let sign = match chars.next() {
        None => return FixedOffset::east_opt(0),
        Some('Z') | Some('z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let digits: String = chars.filter(|c| c.is_ascii_digit()).collect();
    let (hours, minutes) = match digits.len() {
        0 => (0, 0),
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_date() {
        let date = PdfDate::parse("D:20240115103000+01'00'").unwrap();
        assert_eq!(date.to_w3c(), "2024-01-15T10:30:00+01:00");
    }

    #[test]
    fn test_parse_utc() {
        let date = PdfDate::parse("D:20240115103000Z").unwrap();
        assert_eq!(date.to_w3c(), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_parse_year_only() {
        let date = PdfDate::parse("D:2023").unwrap();
        assert_eq!(date.to_w3c(), "2023-01-01T00:00:00Z");
    }

    #[test]
    fn test_parse_without_prefix_and_negative_offset() {
        let date = PdfDate::parse("199812231952-08'00").unwrap();
        assert_eq!(date.to_w3c(), "1998-12-23T19:52:00-08:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PdfDate::parse("yesterday").is_err());
        assert!(PdfDate::parse("D:20241345").is_err());
        assert!(PdfDate::parse("D:2024011510300").is_err());
        assert!(PdfDate::parse("D:20240115103000X").is_err());
    }

    #[test]
    fn test_pdf_string_round_trip() {
        let original = "D:20240115103000+05'30'";
        let date = PdfDate::parse(original).unwrap();
        assert_eq!(date.to_pdf_string(), original);
        assert_eq!(PdfDate::parse(&date.to_pdf_string()).unwrap(), date);
    }

    #[test]
    fn test_pdf_string_utc() {
        let date = PdfDate::parse("D:20240115103000").unwrap();
        assert_eq!(date.to_pdf_string(), "D:20240115103000Z");
    }
}
