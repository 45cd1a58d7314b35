//! Channel catalog and EPG data model.
//!
//! [`ChannelInfo`] describes one entry of the portal catalog (name, page
//! URL, icon URL). [`ChannelProgram`] is one EPG schedule row with a
//! wall-clock [`ProgramTime`] parsed from the portal's `"HH:MM"` format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Basic information about a channel: the channel name, the URL to the
/// channel page, and the URL to the channel icon.
///
/// Names can be non-ASCII (e.g., Cyrillic channel names like `"ТЕТ"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel name as shown in the catalog (e.g., `"History 2"`).
    pub name: String,
    /// Absolute URL of the channel page (e.g., `http://ip.viks.tv/601-history_5.html`).
    pub page_url: String,
    /// Absolute URL of the channel icon image.
    pub icon_url: String,
}

/// Error parsing a `"HH:MM"` program time string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramTimeError {
    #[error("time is not in HH:MM format: {0:?}")]
    Format(String),
    #[error("time is out of range: {0:?}")]
    Range(String),
}

/// Wall-clock time of an EPG entry, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProgramTime {
    pub hour: u8,
    pub minute: u8,
}

impl ProgramTime {
    /// Minutes since midnight, for ordering and current-program detection.
    #[must_use]
    pub fn minutes_of_day(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

impl FromStr for ProgramTime {
    type Err = ProgramTimeError;

    /// Parse the portal's `"HH:MM"` format: exactly five characters, a
    /// colon in the middle, digits elsewhere. Hours above 23 or minutes
    /// above 59 are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let valid = bytes.len() == 5
            && bytes[2] == b':'
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[3].is_ascii_digit()
            && bytes[4].is_ascii_digit();
        if !valid {
            return Err(ProgramTimeError::Format(s.to_string()));
        }

        let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
        if hour > 23 || minute > 59 {
            return Err(ProgramTimeError::Range(s.to_string()));
        }

        Ok(Self { hour, minute })
    }
}

impl fmt::Display for ProgramTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ProgramTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProgramTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of a channel's EPG schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProgram {
    /// Program title. Can be non-English.
    pub name: String,
    /// Start time within the broadcast day.
    pub time: ProgramTime,
}

impl ChannelProgram {
    /// Create a program entry, validating the `"HH:MM"` time string.
    pub fn new(name: impl Into<String>, time: &str) -> Result<Self, ProgramTimeError> {
        Ok(Self {
            name: name.into(),
            time: time.parse()?,
        })
    }
}

/// Index of the program airing at `now`, assuming `programs` covers one
/// broadcast day in schedule order.
///
/// The airing program is the last one that started at or before `now`.
/// Returns `None` when the list is empty or the first program has not
/// started yet.
#[must_use]
pub fn current_program_index(programs: &[ChannelProgram], now: ProgramTime) -> Option<usize> {
    let now = now.minutes_of_day();
    programs
        .iter()
        .rposition(|p| p.time.minutes_of_day() <= now)
}
