//! Payloads sent to the booking backend.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::artist::Artist;
use crate::clock::{self, StudioClock};
use crate::error::SubmissionError;

/// Query for an artist's free slots from "now" through the end of the
/// sixth following month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub calendar_id: String,
    pub time_min: String,
    pub time_max: String,
    /// `(weekday key, HH:MM:duration)`, repeated per window.
    pub windows: Vec<(String, String)>,
}

impl AvailabilityQuery {
    pub const MONTHS_AHEAD: i32 = 6;

    pub fn for_artist(artist: &Artist, clock: &StudioClock, now: DateTime<Utc>) -> Self {
        let today = clock.to_local(now).date();
        let last_month = clock::add_months(clock::first_of_month(today), Self::MONTHS_AHEAD);
        let time_max = clock.localize(clock::end_of_month(last_month));

        Self {
            calendar_id: artist.calendar_id.clone(),
            time_min: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            time_max: clock::to_iso_utc(time_max),
            windows: artist.available_times.query_pairs(),
        }
    }

    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = vec![
            ("calendarId", self.calendar_id.as_str()),
            ("timeMin", self.time_min.as_str()),
            ("timeMax", self.time_max.as_str()),
        ];
        pairs.extend(
            self.windows
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );
        pairs
    }

    pub fn to_query_string(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A validated booking request, ready to be sent as multipart form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
    pub sizing: String,
    pub placement: String,
    pub references: Vec<ReferenceFile>,
    pub date: String,
    pub calendar_id: String,
}

impl BookingSubmission {
    /// Text parts in wire order. `phone` is left out when blank.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("first_name", self.first_name.as_str()),
            ("last_name", self.last_name.as_str()),
            ("email", self.email.as_str()),
        ];
        if let Some(phone) = &self.phone {
            fields.push(("phone", phone.as_str()));
        }
        fields.extend([
            ("description", self.description.as_str()),
            ("sizing", self.sizing.as_str()),
            ("placement", self.placement.as_str()),
            ("date", self.date.as_str()),
            ("calendarId", self.calendar_id.as_str()),
        ]);
        fields
    }
}

/// Most reference images one booking may carry.
pub const MAX_REFERENCES: usize = 5;
/// Largest single reference image accepted, in bytes.
pub const MAX_REFERENCE_BYTES: usize = 10 * 1024 * 1024;

/// Collects multipart fields as they stream in and validates them once
/// the form is complete.
#[derive(Debug, Default)]
pub struct SubmissionBuilder {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    description: Option<String>,
    sizing: Option<String>,
    placement: Option<String>,
    date: Option<String>,
    calendar_id: Option<String>,
    references: Vec<ReferenceFile>,
}

impl SubmissionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, name: &str, value: String) {
        let slot = match name {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "description" => &mut self.description,
            "sizing" => &mut self.sizing,
            "placement" => &mut self.placement,
            "date" => &mut self.date,
            "calendarId" => &mut self.calendar_id,
            other => {
                tracing::debug!(field = other, "ignoring unexpected booking field");
                return;
            }
        };
        *slot = Some(value);
    }

    /// Whether another reference may still be read. Checked before a file
    /// part is buffered.
    pub fn accepts_reference(&self) -> Result<(), SubmissionError> {
        if self.references.len() >= MAX_REFERENCES {
            return Err(SubmissionError::TooManyReferences(MAX_REFERENCES));
        }
        Ok(())
    }

    /// Browsers send an empty, unnamed part for a file input with nothing
    /// selected; those are dropped.
    pub fn reference(&mut self, file: ReferenceFile) -> Result<(), SubmissionError> {
        if file.file_name.is_empty() && file.bytes.is_empty() {
            return Ok(());
        }
        if file.bytes.len() > MAX_REFERENCE_BYTES {
            return Err(SubmissionError::ReferenceTooLarge {
                name: file.file_name,
                limit: MAX_REFERENCE_BYTES,
            });
        }
        self.accepts_reference()?;
        self.references.push(file);
        Ok(())
    }

    pub fn finish(self) -> Result<BookingSubmission, SubmissionError> {
        let date = required(self.date, "date")?;
        if DateTime::parse_from_rfc3339(&date).is_err() {
            return Err(SubmissionError::InvalidDate(date));
        }

        let submission = BookingSubmission {
            first_name: required(self.first_name, "first_name")?,
            last_name: required(self.last_name, "last_name")?,
            email: required(self.email, "email")?,
            phone: self
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            description: required(self.description, "description")?,
            sizing: required(self.sizing, "sizing")?,
            placement: required(self.placement, "placement")?,
            calendar_id: required(self.calendar_id, "calendarId")?,
            date,
            references: self.references,
        };

        if submission.references.is_empty() {
            return Err(SubmissionError::NoReferences);
        }
        Ok(submission)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, SubmissionError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(SubmissionError::MissingField(field))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::artist::{AvailabilityWindow, WeeklyAvailability};

    fn artist() -> Artist {
        Artist {
            name: "Mara".to_string(),
            calendar_id: "mara@studio".to_string(),
            available_times: WeeklyAvailability {
                tu: vec![AvailabilityWindow {
                    hour: 11,
                    minute: 0,
                    duration: 60,
                }],
                ..Default::default()
            },
        }
    }

    #[test]
    fn query_window_runs_to_end_of_sixth_month() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 22, 0, 0).unwrap();
        let query = AvailabilityQuery::for_artist(&artist(), &StudioClock::default(), now);

        assert_eq!(query.calendar_id, "mara@studio");
        assert_eq!(query.time_min, "2026-10-18T22:00:00.000Z");
        // 19 October in Melbourne, so the window closes at the end of April 2027.
        assert_eq!(query.time_max, "2027-04-30T13:59:59.999Z");
        assert_eq!(
            query.to_query_string(),
            "calendarId=mara%40studio&timeMin=2026-10-18T22%3A00%3A00.000Z\
             &timeMax=2027-04-30T13%3A59%3A59.999Z&tu=11%3A00%3A60"
        );
    }

    fn filled_builder() -> SubmissionBuilder {
        let mut builder = SubmissionBuilder::new();
        for (name, value) in [
            ("first_name", "Ada"),
            ("last_name", "Lovelace"),
            ("email", "ada@example.com"),
            ("phone", "  "),
            ("description", "A small engine"),
            ("sizing", "5cm"),
            ("placement", "Inner left forearm"),
            ("date", "2026-10-20T14:30:00+11:00"),
            ("calendarId", "mara@studio"),
            ("agree", "on"),
        ] {
            builder.text(name, value.to_string());
        }
        builder
    }

    fn sketch() -> ReferenceFile {
        ReferenceFile {
            file_name: "sketch.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn builds_submission_and_drops_blank_phone() {
        let mut builder = filled_builder();
        builder.reference(sketch()).unwrap();
        let submission = builder.finish().unwrap();

        assert_eq!(submission.phone, None);
        assert_eq!(submission.references.len(), 1);
        let names: Vec<_> = submission.text_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            [
                "first_name",
                "last_name",
                "email",
                "description",
                "sizing",
                "placement",
                "date",
                "calendarId"
            ]
        );
    }

    #[test]
    fn empty_file_part_does_not_count_as_reference() {
        let mut builder = filled_builder();
        builder
            .reference(ReferenceFile {
                file_name: String::new(),
                content_type: Some("application/octet-stream".to_string()),
                bytes: Vec::new(),
            })
            .unwrap();
        assert_eq!(builder.finish(), Err(SubmissionError::NoReferences));
    }

    #[test]
    fn caps_reference_count_and_size() {
        let mut builder = filled_builder();
        for _ in 0..MAX_REFERENCES {
            builder.reference(sketch()).unwrap();
        }
        assert_eq!(
            builder.accepts_reference(),
            Err(SubmissionError::TooManyReferences(MAX_REFERENCES))
        );
        assert_eq!(
            builder.reference(sketch()),
            Err(SubmissionError::TooManyReferences(MAX_REFERENCES))
        );
        assert_eq!(builder.finish().unwrap().references.len(), MAX_REFERENCES);

        let mut builder = filled_builder();
        let huge = ReferenceFile {
            file_name: "huge.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0; MAX_REFERENCE_BYTES + 1],
        };
        assert_eq!(
            builder.reference(huge),
            Err(SubmissionError::ReferenceTooLarge {
                name: "huge.png".to_string(),
                limit: MAX_REFERENCE_BYTES,
            })
        );
    }

    #[test]
    fn reports_missing_and_invalid_fields() {
        let mut builder = filled_builder();
        builder.reference(sketch()).unwrap();
        builder.text("sizing", " ".to_string());
        assert_eq!(builder.finish(), Err(SubmissionError::MissingField("sizing")));

        let mut builder = filled_builder();
        builder.reference(sketch()).unwrap();
        builder.text("date", "next tuesday".to_string());
        assert_eq!(
            builder.finish(),
            Err(SubmissionError::InvalidDate("next tuesday".to_string()))
        );
    }
}
