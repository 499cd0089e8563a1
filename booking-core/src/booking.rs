//! Booking form controller: artist, availability, chosen slot, validation
//! and submission status.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artist::{Artist, ArtistCatalog};
use crate::availability::{Availability, MonthAvailability};
use crate::calendar::MonthChange;
use crate::clock::StudioClock;
use crate::error::SubmitBlocked;
use crate::request::{AvailabilityQuery, MAX_REFERENCES};

/// Furthest month the visitor can page to, counted from the current one.
pub const MAX_MONTH_OFFSET: i32 = 5;

/// A fully resolved appointment time in studio wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedSlot {
    pub year: i32,
    /// 0-based, January is 0.
    pub month0: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl SelectedSlot {
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, self.day)?
            .and_hms_opt(self.hour, self.minute, 0)
    }

    /// ISO-8601 with the studio's UTC offset for that day.
    pub fn to_iso(&self, clock: &StudioClock) -> Option<String> {
        self.to_naive().map(|at| clock.localize(at).to_rfc3339())
    }
}

/// Current contents of the detail fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub sizing: String,
    pub placement: String,
    pub reference_count: usize,
}

impl BookingFields {
    /// Labels of required text fields that are still blank.
    pub fn missing_text(&self) -> Vec<&'static str> {
        [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("description", &self.description),
            ("sizing", &self.sizing),
            ("placement", &self.placement),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    pub fn required_filled(&self) -> bool {
        self.missing_text().is_empty() && self.reference_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    AgreeToggled,
    MonthChanged(MonthChange),
    ArtistSelected(Artist),
    AvailabilityLoaded {
        generation: u64,
        availability: Availability,
    },
    AvailabilityFailed {
        generation: u64,
        reason: String,
    },
    SlotSelected(SelectedSlot),
    FieldsChanged(BookingFields),
    SubmitBlocked(SubmitBlocked),
    SubmitRequested,
    SubmitSucceeded,
    SubmitFailed(String),
}

/// An availability lookup the caller should run. The result must be fed
/// back with the same `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub generation: u64,
    pub query: AvailabilityQuery,
}

/// Values the form adds to the multipart body on top of the visitor's
/// own fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub date: String,
    pub calendar_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingState {
    pub artist: Option<Artist>,
    pub selected_slot: Option<SelectedSlot>,
    pub has_agreed: bool,
    pub required_fields_filled: bool,
    pub year: i32,
    pub month0: u32,
    pub available_times: Availability,
    pub month_offset: i32,
    pub is_loading: bool,
    pub is_saving: bool,
    /// Bumped for every availability request; older responses are dropped.
    pub fetch_generation: u64,
    pub error: Option<String>,
    today: NaiveDate,
}

impl BookingState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            artist: None,
            selected_slot: None,
            has_agreed: false,
            required_fields_filled: false,
            year: today.year(),
            month0: today.month0(),
            available_times: Availability::default(),
            month_offset: 0,
            is_loading: false,
            is_saving: false,
            fetch_generation: 0,
            error: None,
            today,
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.selected_slot.is_some() && self.has_agreed && self.required_fields_filled
    }

    /// Availability for the month the calendar is showing.
    pub fn displayed_availability(&self) -> Option<&MonthAvailability> {
        self.available_times.month(self.month_offset)
    }

    /// Look `name` up in the catalog and start loading that artist's
    /// availability. Unknown names leave the state untouched.
    pub fn change_artist(
        &mut self,
        catalog: &ArtistCatalog,
        name: &str,
        clock: &StudioClock,
        now: DateTime<Utc>,
    ) -> Option<AvailabilityRequest> {
        let Some(artist) = catalog.find(name).cloned() else {
            tracing::debug!(artist = name, "ignoring unknown artist");
            return None;
        };

        let query = AvailabilityQuery::for_artist(&artist, clock, now);
        self.reduce(BookingAction::ArtistSelected(artist));
        Some(AvailabilityRequest {
            generation: self.fetch_generation,
            query,
        })
    }

    /// Check everything a submission needs before any request goes out.
    pub fn prepare_submission(
        &self,
        fields: &BookingFields,
        clock: &StudioClock,
    ) -> Result<SubmissionTicket, SubmitBlocked> {
        if self.is_saving {
            return Err(SubmitBlocked::AlreadySaving);
        }
        let slot = self.selected_slot.ok_or(SubmitBlocked::NoSlot)?;
        let artist = self.artist.as_ref().ok_or(SubmitBlocked::NoArtist)?;
        if !self.has_agreed {
            return Err(SubmitBlocked::NotAgreed);
        }
        let missing = fields.missing_text();
        if !missing.is_empty() {
            return Err(SubmitBlocked::MissingFields(missing));
        }
        if fields.reference_count == 0 {
            return Err(SubmitBlocked::NoReferences);
        }
        if fields.reference_count > MAX_REFERENCES {
            return Err(SubmitBlocked::TooManyReferences(MAX_REFERENCES));
        }
        let date = slot.to_iso(clock).ok_or(SubmitBlocked::NoSlot)?;

        Ok(SubmissionTicket {
            date,
            calendar_id: artist.calendar_id.clone(),
        })
    }

    pub fn reduce(&mut self, action: BookingAction) {
        match action {
            BookingAction::AgreeToggled => self.has_agreed = !self.has_agreed,
            BookingAction::MonthChanged(change) => self.change_month(change),
            BookingAction::ArtistSelected(artist) => {
                self.artist = Some(artist);
                self.selected_slot = None;
                self.available_times = Availability::default();
                self.month_offset = 0;
                self.year = self.today.year();
                self.month0 = self.today.month0();
                self.is_loading = true;
                self.error = None;
                self.fetch_generation = self.fetch_generation.wrapping_add(1);
            }
            BookingAction::AvailabilityLoaded {
                generation,
                availability,
            } => {
                if self.is_stale(generation) {
                    return;
                }
                self.available_times = availability;
                self.is_loading = false;
            }
            BookingAction::AvailabilityFailed { generation, reason } => {
                if self.is_stale(generation) {
                    return;
                }
                self.available_times = Availability::default();
                self.is_loading = false;
                self.error = Some(format!("Could not load availability: {reason}"));
            }
            BookingAction::SlotSelected(slot) => self.selected_slot = Some(slot),
            BookingAction::FieldsChanged(fields) => {
                self.required_fields_filled = fields.required_filled();
            }
            BookingAction::SubmitBlocked(reason) => self.error = Some(reason.to_string()),
            BookingAction::SubmitRequested => {
                self.is_saving = true;
                self.error = None;
            }
            BookingAction::SubmitSucceeded => self.is_saving = false,
            BookingAction::SubmitFailed(reason) => {
                self.is_saving = false;
                self.error = Some(format!("Your booking could not be sent: {reason}"));
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        let stale = generation != self.fetch_generation;
        if stale {
            tracing::debug!(
                generation,
                current = self.fetch_generation,
                "dropping stale availability response"
            );
        }
        stale
    }

    fn change_month(&mut self, change: MonthChange) {
        let MonthChange {
            month0,
            previous_month0,
        } = change;

        // At the year wrap the offset follows the direction of travel and
        // `year` moves against it.
        let forward = match (previous_month0, month0) {
            (11, 0) => {
                self.year -= 1;
                true
            }
            (0, 11) => {
                self.year += 1;
                false
            }
            (previous, next) => next > previous,
        };

        self.month_offset += if forward { 1 } else { -1 };
        self.month0 = month0;
    }
}
