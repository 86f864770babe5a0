//! Offset-aware timestamps and their storage encoding.
//!
//! Storage columns are timezone-naive. Every value is written as the naive UTC
//! wall-clock time and read back with a `+00:00` offset, so neither the server's
//! local zone nor the database session zone can change what a stored instant means.

use chrono::{DateTime, FixedOffset, NaiveDateTime, SubsecRound, TimeZone, Utc};
use sea_orm::sea_query::{ArrayType, ColumnType, Nullable, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, DbErr, QueryResult, TryGetError, TryGetable, Value};

use super::error::LifecycleError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Sub-second digits kept by [`SystemClock`] unless configured otherwise.
pub const DEFAULT_TIMESTAMP_PRECISION: u16 = 6;

/// An instant with an explicit UTC offset.
///
/// Equality and ordering compare instants: `10:00+09:00 == 01:00+00:00`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct OffsetTimestamp(DateTime<FixedOffset>);

impl OffsetTimestamp {
    #[must_use]
    pub fn from_datetime<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self(dt.fixed_offset())
    }

    /// Interpret a naive storage value as UTC.
    #[must_use]
    pub fn from_utc_naive(naive: NaiveDateTime) -> Self {
        Self(naive.and_utc().fixed_offset())
    }

    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    #[must_use]
    pub fn to_utc_naive(&self) -> NaiveDateTime {
        self.0.naive_utc()
    }

    #[must_use]
    pub fn offset_seconds(&self) -> i32 {
        self.0.offset().local_minus_utc()
    }

    /// Drop sub-second digits beyond `digits` (max 9).
    #[must_use]
    pub fn truncated(self, digits: u16) -> Self {
        Self(self.0.trunc_subsecs(digits.min(9)))
    }

    /// Same instant, shown at the given offset.
    #[must_use]
    pub fn with_offset(self, offset: FixedOffset) -> Self {
        Self(self.0.with_timezone(&offset))
    }

    fn parse_text(text: &str) -> Result<Self, LifecycleError> {
        let trimmed = text.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_datetime(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(Self::from_utc_naive)
            .ok_or_else(|| LifecycleError::DataIntegrity(format!("malformed timestamp '{trimmed}'")))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for OffsetTimestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::from_datetime(dt)
    }
}

impl std::fmt::Display for OffsetTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Conversion between [`OffsetTimestamp`] and storage values.
pub struct TimestampCodec;

impl TimestampCodec {
    /// `None` becomes a typed storage null.
    #[must_use]
    pub fn encode(ts: Option<&OffsetTimestamp>) -> Value {
        match ts {
            Some(ts) => Value::from(ts.to_utc_naive()),
            None => Value::from(None::<NaiveDateTime>),
        }
    }

    /// Decode a storage value; nulls of any timestamp-like type decode to `None`.
    ///
    /// Accepts naive datetimes (read as UTC), zoned datetimes, and text in RFC 3339
    /// or `YYYY-MM-DD HH:MM:SS[.fff]` form. The result always carries a UTC offset.
    ///
    /// # Errors
    /// Returns `LifecycleError::DataIntegrity` for unparsable text or a value that is
    /// not timestamp-shaped at all.
    pub fn decode(value: Value) -> Result<Option<OffsetTimestamp>, LifecycleError> {
        if let Ok(naive) = <Option<NaiveDateTime> as ValueType>::try_from(value.clone()) {
            return Ok(naive.map(OffsetTimestamp::from_utc_naive));
        }
        if let Ok(utc) = <Option<DateTime<Utc>> as ValueType>::try_from(value.clone()) {
            return Ok(utc.map(OffsetTimestamp::from_datetime));
        }
        if let Ok(zoned) = <Option<DateTime<FixedOffset>> as ValueType>::try_from(value.clone()) {
            return Ok(zoned.map(|dt| OffsetTimestamp::from_datetime(dt.with_timezone(&Utc))));
        }
        if let Ok(text) = <Option<String> as ValueType>::try_from(value) {
            return text.as_deref().map(OffsetTimestamp::parse_text).transpose();
        }
        Err(LifecycleError::DataIntegrity(
            "stored value is not a timestamp".to_owned(),
        ))
    }
}

impl From<OffsetTimestamp> for Value {
    fn from(ts: OffsetTimestamp) -> Self {
        TimestampCodec::encode(Some(&ts))
    }
}

impl Nullable for OffsetTimestamp {
    fn null() -> Value {
        TimestampCodec::encode(None)
    }
}

impl ValueType for OffsetTimestamp {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        match TimestampCodec::decode(v) {
            Ok(Some(ts)) => Ok(ts),
            _ => Err(ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "OffsetTimestamp".to_owned()
    }

    fn array_type() -> ArrayType {
        ArrayType::ChronoDateTime
    }

    fn column_type() -> ColumnType {
        ColumnType::DateTime
    }
}

impl TryGetable for OffsetTimestamp {
    fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
        match NaiveDateTime::try_get_by(res, index) {
            Ok(naive) => Ok(Self::from_utc_naive(naive)),
            Err(TryGetError::DbErr(err)) => Err(TryGetError::DbErr(DbErr::Type(format!(
                "malformed timestamp: {err}"
            )))),
            Err(null) => Err(null),
        }
    }
}

/// Source of "now" for audit stamping.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetTimestamp;
}

/// Wall clock, truncated to a fixed number of sub-second digits so values survive
/// a storage round trip unchanged.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    precision: u16,
}

impl SystemClock {
    #[must_use]
    pub fn with_precision(precision: u16) -> Self {
        Self {
            precision: precision.min(9),
        }
    }

    #[must_use]
    pub fn precision(&self) -> u16 {
        self.precision
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::with_precision(DEFAULT_TIMESTAMP_PRECISION)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetTimestamp {
        OffsetTimestamp::from_datetime(Utc::now()).truncated(self.precision)
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetTimestamp);

impl Clock for FixedClock {
    fn now(&self) -> OffsetTimestamp {
        self.0
    }
}
