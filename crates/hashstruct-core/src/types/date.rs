use chrono::NaiveDate;
use std::fmt::{self, Debug, Display};

///
/// Date
/// calendar date without time or zone
///

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Date(NaiveDate);

impl Date {
    #[must_use]
    pub fn new_checked(y: i32, m: u32, d: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(y, m, d).map(Self)
    }

    /// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
    pub fn parse_iso8601(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self)
    }

    #[must_use]
    pub const fn get(self) -> NaiveDate {
        self.0
    }
}

impl Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date({self})")
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Self(d)
    }
}
