//! Booking domain for the studio site: the fixed-zone clock, artist
//! catalog, backend payloads, and the calendar and booking form state
//! machines. Nothing in here touches the UI or the network.

pub mod artist;
pub mod availability;
pub mod booking;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod request;

pub use artist::{Artist, ArtistCatalog, AvailabilityWindow, WeeklyAvailability};
pub use availability::{Availability, AvailabilityResponse, MonthAvailability, TimeSlot};
pub use booking::{
    AvailabilityRequest, BookingAction, BookingFields, BookingState, SelectedSlot,
    SubmissionTicket, MAX_MONTH_OFFSET,
};
pub use calendar::{CalendarAction, CalendarState, CalendarView, DayCell, MonthChange, SlotOption};
pub use clock::StudioClock;
pub use error::{AvailabilityError, CatalogError, SlotParseError, SubmissionError, SubmitBlocked};
pub use request::{
    AvailabilityQuery, BookingSubmission, ReferenceFile, SubmissionBuilder, MAX_REFERENCES,
    MAX_REFERENCE_BYTES,
};
