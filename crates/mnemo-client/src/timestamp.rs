//! Date/time arguments normalized to the wire format.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use mnemo_core::defaults::TIMESTAMP_FORMAT;

/// A date/time argument as sent on the wire.
///
/// Strings pass through unchanged (the server validates them); structured
/// timestamps are converted to UTC and rendered as `YYYY-MM-DDTHH:MM:SSZ`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Self(dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string())
    }
}
