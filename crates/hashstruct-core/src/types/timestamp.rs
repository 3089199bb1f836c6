use crate::types::Date;
use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Utc};
use std::fmt::{self, Display};

///
/// Timestamp
/// (an instant plus the UTC offset it was expressed in)
///
/// Equality, ordering and hashing follow the instant, so two timestamps
/// written in different offsets compare equal when they name the same moment.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    #[must_use]
    pub const fn new(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }

    #[must_use]
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.fixed_offset())
    }

    /// Construct a UTC timestamp from calendar parts.
    /// Returns `None` for out-of-range parts.
    #[must_use]
    pub fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::from_utc)
    }

    /// Construct a timestamp from wall-clock parts in a fixed offset
    /// (seconds east of UTC).
    #[must_use]
    pub fn with_offset(
        offset_secs: i32,
        (year, month, day): (i32, u32, u32),
        (hour, min, sec): (u32, u32, u32),
    ) -> Option<Self> {
        FixedOffset::east_opt(offset_secs)?
            .with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self)
    }

    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(s).map(Self)
    }

    /// Midnight UTC at the start of `date`.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        Self::from_utc(date.get().and_time(chrono::NaiveTime::MIN).and_utc())
    }

    ///
    /// OFFSET
    ///

    /// Same instant re-expressed at offset zero.
    #[must_use]
    pub fn to_utc(self) -> Self {
        Self::from_utc(self.0.with_timezone(&Utc))
    }

    #[must_use]
    pub fn is_utc(&self) -> bool {
        self.0.offset().local_minus_utc() == 0
    }

    #[must_use]
    pub const fn get(self) -> DateTime<FixedOffset> {
        self.0
    }

    /// ISO 8601 with millisecond precision, `Z` for UTC.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }
}
