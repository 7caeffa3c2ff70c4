//! Viewer-facing datetime formatting.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::error::ConfigError;

/// Default format, matching the en-US locale's `toLocaleString` layout.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Shown when epoch seconds fall outside the representable range.
pub const INVALID_DATE: &str = "Invalid Date";

/// Timezone the viewer reads dates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerZone {
    /// Host's local timezone.
    Local,
    Fixed(FixedOffset),
}

/// Formats epoch seconds according to the viewer's conventions.
#[derive(Debug, Clone)]
pub struct DateFormatter {
    format: String,
    zone: ViewerZone,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
            zone: ViewerZone::Local,
        }
    }
}

impl DateFormatter {
    /// Build a formatter, rejecting format strings chrono can't render.
    pub fn new(format: &str, zone: ViewerZone) -> Result<Self, ConfigError> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid {
                key: "date_format",
                reason: format!("unsupported specifier in {:?}", format),
            });
        }
        Ok(Self {
            format: format.to_string(),
            zone,
        })
    }

    /// Fixed-offset zone from minutes east of UTC.
    pub fn zone_from_offset_minutes(minutes: Option<i32>) -> Result<ViewerZone, ConfigError> {
        match minutes {
            None => Ok(ViewerZone::Local),
            Some(m) => m
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(ViewerZone::Fixed)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "utc_offset_minutes",
                    reason: format!("{} is out of range", m),
                }),
        }
    }

    /// Render epoch seconds as a datetime string.
    pub fn format_epoch_seconds(&self, seconds: i64) -> String {
        let instant = seconds
            .checked_mul(1000)
            .and_then(DateTime::<Utc>::from_timestamp_millis);
        let Some(instant) = instant else {
            return INVALID_DATE.to_string();
        };

        match self.zone {
            ViewerZone::Local => instant
                .with_timezone(&Local)
                .format(&self.format)
                .to_string(),
            ViewerZone::Fixed(offset) => instant
                .with_timezone(&offset)
                .format(&self.format)
                .to_string(),
        }
    }
}
