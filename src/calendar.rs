//! Jalali (Solar Hijri) timestamps as shown by the panel
//!
//! The panel renders comment dates like `۱۵ فروردین ۰۲، ۱۴:۳۰`: day, month
//! name, abbreviated year, an Arabic comma, then the time. Digits may come
//! in either the Persian or the Arabic-Indic script.
//!
//! Conversion to the Gregorian calendar uses the 33-year arithmetic cycle,
//! counting days from 1 Farvardin 979 (20 March 1600).
//!
//! Wall-clock times are resolved in `Asia/Tehran` unless a fixed offset is
//! configured, so timestamps from daylight saving years get the right UTC
//! value.

use std::fmt;

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

use crate::{MigrateError, Result};

/// Separator between the date and the time halves
pub const DATE_TIME_SEPARATOR: &str = "، ";

/// Export timestamp layout (`YYYY-MM-DD HH:MM:SS`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Month names, including Arabic-script spellings (`ي`, `ك`, bare alef)
const MONTHS: &[(&str, u32)] = &[
    ("فروردین", 1),
    ("فروردين", 1),
    ("اردیبهشت", 2),
    ("ارديبهشت", 2),
    ("خرداد", 3),
    ("تیر", 4),
    ("تير", 4),
    ("مرداد", 5),
    ("شهریور", 6),
    ("شهريور", 6),
    ("مهر", 7),
    ("آبان", 8),
    ("ابان", 8),
    ("آذر", 9),
    ("اذر", 9),
    ("دی", 10),
    ("دي", 10),
    ("بهمن", 11),
    ("اسفند", 12),
];

const MONTH_DAYS: [i64; 12] = [31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

/// Days between 1 January 1600 and 1 Farvardin 979
const EPOCH_GAP_DAYS: i64 = 79;

/// Replace Persian and Arabic-Indic digits with ASCII digits
pub fn transliterate_digits(text: &str) -> String {
    text.chars()
        .map(|ch| {
            PERSIAN_DIGITS
                .iter()
                .chain(ARABIC_INDIC_DIGITS.iter())
                .position(|&d| d == ch)
                .map(|i| char::from(b'0' + (i % 10) as u8))
                .unwrap_or(ch)
        })
        .collect()
}

/// Month number (1-12) for a Jalali month name
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, number)| *number)
}

/// Expand an abbreviated year numeral
///
/// A leading zero marks the 1400s (`"02"` is 1402); anything else is taken
/// as an offset from 1300 (`"85"` is 1385).
///
/// # Examples
///
/// ```
/// use panel2wxr::calendar::normalize_year;
///
/// assert_eq!(normalize_year("02").unwrap(), 1402);
/// assert_eq!(normalize_year("85").unwrap(), 1385);
/// ```
pub fn normalize_year(numeral: &str) -> Result<i32> {
    let value: i32 = numeral
        .parse()
        .map_err(|_| MigrateError::format(format!("Invalid year: {:?}", numeral)))?;
    let century = if numeral.starts_with('0') { 1400 } else { 1300 };
    value
        .checked_add(century)
        .ok_or_else(|| MigrateError::format(format!("Year out of range: {:?}", numeral)))
}

fn day_number(year: i32, month: u32, day: u32) -> i64 {
    let jy = i64::from(year) - 979;
    let mut days = 365 * jy + jy.div_euclid(33) * 8 + (jy.rem_euclid(33) + 3) / 4;
    days += MONTH_DAYS[..(month - 1) as usize].iter().sum::<i64>();
    days + i64::from(day) - 1
}

/// Number of days in a Jalali month; Esfand has 30 in leap years
pub fn month_length(year: i32, month: u32) -> Option<u32> {
    match month {
        1..=11 => Some(MONTH_DAYS[(month - 1) as usize] as u32),
        12 => {
            let next = year.checked_add(1)?;
            Some((day_number(next, 1, 1) - day_number(year, 12, 1)) as u32)
        }
        _ => None,
    }
}

/// Convert a Jalali calendar date to the Gregorian calendar
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use panel2wxr::calendar::jalali_to_gregorian;
///
/// let date = jalali_to_gregorian(1402, 1, 1).unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2023, 3, 21).unwrap());
/// ```
pub fn jalali_to_gregorian(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let length = month_length(year, month).ok_or_else(|| {
        MigrateError::format(format!("Invalid month {} of year {}", month, year))
    })?;
    if day < 1 || day > length {
        return Err(MigrateError::format(format!(
            "Invalid day {} for month {} of {}",
            day, month, year
        )));
    }

    let offset = day_number(year, month, day) + EPOCH_GAP_DAYS;
    NaiveDate::from_ymd_opt(1600, 1, 1)
        .zip(Duration::try_days(offset))
        .and_then(|(epoch, delta)| epoch.checked_add_signed(delta))
        .ok_or_else(|| MigrateError::format(format!("Date out of range: {}/{}/{}", year, month, day)))
}

/// Zone the panel's wall-clock times are read in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelZone {
    /// IANA zone, with its historical daylight saving rules
    Named(Tz),
    /// Constant offset from UTC
    Fixed(FixedOffset),
}

impl PanelZone {
    /// `Asia/Tehran`
    pub fn tehran() -> Self {
        PanelZone::Named(chrono_tz::Asia::Tehran)
    }

    /// Attach this zone to a wall-clock time
    ///
    /// A time repeated by a fall-back transition resolves to the earlier
    /// instant. A time skipped by a spring-forward transition keeps the offset
    /// in effect just before the gap.
    pub fn resolve(&self, local: NaiveDateTime) -> Result<DateTime<FixedOffset>> {
        match self {
            PanelZone::Fixed(offset) => offset
                .from_local_datetime(&local)
                .single()
                .ok_or_else(|| MigrateError::format(format!("Local time out of range: {}", local))),
            PanelZone::Named(tz) => {
                if let Some(ts) = tz.from_local_datetime(&local).earliest() {
                    return Ok(ts.fixed_offset());
                }
                let before = local
                    .checked_sub_signed(Duration::hours(1))
                    .and_then(|earlier| tz.offset_from_local_datetime(&earlier).earliest())
                    .map(|offset| offset.fix())
                    .ok_or_else(|| {
                        MigrateError::format(format!("No {} time for {}", tz.name(), local))
                    })?;
                PanelZone::Fixed(before).resolve(local)
            }
        }
    }
}

impl Default for PanelZone {
    fn default() -> Self {
        Self::tehran()
    }
}

impl From<FixedOffset> for PanelZone {
    fn from(offset: FixedOffset) -> Self {
        PanelZone::Fixed(offset)
    }
}

impl From<Tz> for PanelZone {
    fn from(tz: Tz) -> Self {
        PanelZone::Named(tz)
    }
}

impl fmt::Display for PanelZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelZone::Named(tz) => f.write_str(tz.name()),
            PanelZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Build a timestamp from Jalali calendar fields in the given zone
pub fn jalali_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    zone: impl Into<PanelZone>,
) -> Result<DateTime<FixedOffset>> {
    let date = jalali_to_gregorian(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
        MigrateError::format(format!("Invalid time: {:02}:{:02}:{:02}", hour, minute, second))
    })?;
    zone.into().resolve(date.and_time(time))
}

/// Parses panel date strings into timestamps of one zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleDateConverter {
    zone: PanelZone,
}

impl LocaleDateConverter {
    pub fn new(zone: impl Into<PanelZone>) -> Self {
        Self { zone: zone.into() }
    }

    pub fn zone(&self) -> PanelZone {
        self.zone
    }

    /// Parse `"<day> <month-name> <year>، <hour>:<minute>"`
    pub fn parse(&self, text: &str) -> Result<DateTime<FixedOffset>> {
        parse_datetime(text, self.zone)
    }
}

impl Default for LocaleDateConverter {
    fn default() -> Self {
        Self::new(PanelZone::tehran())
    }
}

/// Parse a panel date string into a timestamp
///
/// # Examples
///
/// ```
/// use panel2wxr::calendar::{format_local, format_utc, parse_datetime, PanelZone};
///
/// let ts = parse_datetime("۱۵ فروردین ۰۲، ۱۴:۳۰", PanelZone::tehran()).unwrap();
/// assert_eq!(format_local(&ts), "2023-04-04 14:30:00");
/// assert_eq!(format_utc(&ts), "2023-04-04 11:00:00");
/// ```
pub fn parse_datetime(text: &str, zone: impl Into<PanelZone>) -> Result<DateTime<FixedOffset>> {
    let ascii = transliterate_digits(text.trim());

    let (date_part, time_part) = ascii
        .split_once(DATE_TIME_SEPARATOR)
        .ok_or_else(|| MigrateError::format(format!("Missing date/time separator: {:?}", text)))?;

    let fields: Vec<&str> = date_part.split_whitespace().collect();
    let [day, month_name, year] = fields.as_slice() else {
        return Err(MigrateError::format(format!("Malformed date: {:?}", date_part)));
    };

    let day: u32 = day
        .parse()
        .map_err(|_| MigrateError::format(format!("Invalid day: {:?}", day)))?;
    let month = month_number(month_name)
        .ok_or_else(|| MigrateError::format(format!("Unknown month: {:?}", month_name)))?;
    let year = normalize_year(year)?;

    let (hour, minute) = time_part
        .trim()
        .split_once(':')
        .ok_or_else(|| MigrateError::format(format!("Malformed time: {:?}", time_part)))?;
    let hour: u32 = hour
        .trim()
        .parse()
        .map_err(|_| MigrateError::format(format!("Invalid hour: {:?}", hour)))?;
    let minute: u32 = minute
        .trim()
        .parse()
        .map_err(|_| MigrateError::format(format!("Invalid minute: {:?}", minute)))?;

    jalali_datetime(year, month, day, hour, minute, 0, zone)
}

/// Local wall-clock time in export layout
pub fn format_local(ts: &DateTime<FixedOffset>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// UTC time in export layout
pub fn format_utc(ts: &DateTime<FixedOffset>) -> String {
    ts.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string()
}
