use derive_more::{Display, FromStr};
use rust_decimal::{Decimal as WrappedDecimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

///
/// Decimal
///
/// Exact base-10 number. Binary floats never convert into a Decimal
/// implicitly.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
pub struct Decimal(WrappedDecimal);

impl Decimal {
    /// Construct a decimal from mantissa and scale.
    #[must_use]
    pub fn new(num: i64, scale: u32) -> Self {
        Self(WrappedDecimal::new(num, scale))
    }

    #[must_use]
    pub fn from_i64(n: i64) -> Self {
        Self(WrappedDecimal::from(n))
    }

    /// Parse plain (`12.34`) or scientific (`1.234e1`) notation.
    /// Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self, rust_decimal::Error> {
        let s = s.trim();

        WrappedDecimal::from_str_exact(s)
            .or_else(|_| WrappedDecimal::from_scientific(s))
            .map(Self)
    }

    ///
    /// CONVERSION
    ///

    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }

    /// Integer part, truncated toward zero.
    #[must_use]
    pub fn trunc_to_i64(&self) -> Option<i64> {
        self.0.trunc().to_i64()
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

impl From<WrappedDecimal> for Decimal {
    fn from(d: WrappedDecimal) -> Self {
        Self(d)
    }
}

// Serde always uses the decimal string so JSON never round-trips through f64.
impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
