use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, SlotParseError};

/// One bookable start time as sent by the backend: `"HH:MM"` or
/// `"HH:MM:DURATION"` with the duration in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
    pub duration: Option<u32>,
}

impl TimeSlot {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour,
            minute,
            duration: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn label(&self) -> String {
        crate::clock::slot_label(self.hour, self.minute)
    }
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotParseError::Malformed(raw.to_string());
        let parts = raw
            .split(':')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        let (hour, minute, duration) = match parts.as_slice() {
            [hour, minute] => (*hour, *minute, None),
            [hour, minute, duration] => (*hour, *minute, Some(*duration)),
            _ => return Err(malformed()),
        };

        if hour > 23 || minute > 59 {
            return Err(SlotParseError::OutOfRange(raw.to_string()));
        }

        Ok(Self {
            hour,
            minute,
            duration,
        })
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = SlotParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if let Some(duration) = self.duration {
            write!(f, ":{duration}")?;
        }
        Ok(())
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// Slots for a single month, keyed by 1-based day of month. Slot order is
/// whatever the backend sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthAvailability(BTreeMap<u32, Vec<TimeSlot>>);

impl MonthAvailability {
    pub fn slots_for(&self, day: u32) -> &[TimeSlot] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn insert(&mut self, day: u32, slots: Vec<TimeSlot>) {
        self.0.insert(day, slots);
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

impl FromIterator<(u32, Vec<TimeSlot>)> for MonthAvailability {
    fn from_iter<I: IntoIterator<Item = (u32, Vec<TimeSlot>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An artist's bookable times keyed by month offset (0 is the current
/// month), then day of month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<i32, MonthAvailability>);

impl Availability {
    pub fn month(&self, offset: i32) -> Option<&MonthAvailability> {
        self.0.get(&offset)
    }

    pub fn insert(&mut self, offset: i32, month: MonthAvailability) {
        self.0.insert(offset, month);
    }

    /// Number of month offsets present, including empty ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(MonthAvailability::is_empty)
    }
}

impl FromIterator<(i32, MonthAvailability)> for Availability {
    fn from_iter<I: IntoIterator<Item = (i32, MonthAvailability)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Body of the backend's availability endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(rename = "availableEvents", default)]
    pub available_events: Option<Availability>,
}

impl AvailabilityResponse {
    /// A 200 is not enough: the lookup only succeeded if `availableEvents`
    /// is present and holds at least one slot.
    pub fn into_availability(self) -> Result<Availability, AvailabilityError> {
        match self.available_events {
            Some(events) if !events.is_empty() => Ok(events),
            _ => Err(AvailabilityError::MissingEvents),
        }
    }
}
