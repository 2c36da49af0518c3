use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};

/// Timestamps carrying an offset; `%#z` also takes `Z` and `+hhmm`.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a publication date the way search providers emit it.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00.000Z`), RFC 2822, ISO 8601
/// timestamps with minute precision or a basic `+hhmm` offset, and the
/// reduced `YYYY-MM-DD`, `YYYY-MM` and `YYYY` dates (padded to the first day).
/// Values without an offset are read as UTC. Anything else is `None`.
pub fn parse_published_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    parse_reduced_date(raw)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_reduced_date(raw: &str) -> Option<NaiveDate> {
    let padded = match raw.len() {
        10 => raw.to_string(),
        7 => format!("{raw}-01"),
        4 if raw.bytes().all(|b| b.is_ascii_digit()) => format!("{raw}-01-01"),
        _ => return None,
    };
    NaiveDate::parse_from_str(&padded, "%Y-%m-%d").ok()
}

/// `now` moved back by `months` calendar months.
///
/// Day of month and time of day are kept; a day that does not exist in the
/// target month rolls over into the next one (Aug 31 minus 6 months is
/// Mar 3, or Mar 2 in a leap year). Negative counts move forward. Returns
/// `None` when the result is outside the representable range.
pub fn months_before(now: DateTime<Utc>, months: i64) -> Option<DateTime<Utc>> {
    let absolute = i64::from(now.year())
        .checked_mul(12)?
        .checked_add(i64::from(now.month0()))?
        .checked_sub(months)?;
    let year = i32::try_from(absolute.div_euclid(12)).ok()?;
    let month = u32::try_from(absolute.rem_euclid(12)).ok()? + 1;
    let date = NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(now.day0())))?;
    Some(date.and_time(now.time()).and_utc())
}

/// Cutoff for a rule's month count: fractional months truncate toward zero,
/// non-finite counts have no cutoff.
pub(crate) fn cutoff_for_months(now: DateTime<Utc>, months: f64) -> Option<DateTime<Utc>> {
    if !months.is_finite() {
        return None;
    }
    let whole = months.trunc();
    if whole.abs() > i64::MAX as f64 / 2.0 {
        return None;
    }
    months_before(now, whole as i64)
}
