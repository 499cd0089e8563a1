use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotParseError {
    #[error("slot `{0}` is not HH:MM or HH:MM:DURATION")]
    Malformed(String),
    #[error("slot `{0}` is outside 00:00-23:59")]
    OutOfRange(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read artist catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("artist catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("artist catalog has no artists")]
    Empty,
    #[error("artist catalog contains an artist without a name")]
    BlankName,
    #[error("artist `{0}` is listed more than once")]
    DuplicateName(String),
    #[error("artist `{0}` has no calendar id")]
    MissingCalendarId(String),
}

/// The backend answered, but not with what a successful availability
/// lookup looks like.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("response did not include any availableEvents")]
    MissingEvents,
}

/// Reasons a multipart booking payload cannot be forwarded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("at least one reference image is required")]
    NoReferences,
    #[error("booking date `{0}` is not an ISO-8601 timestamp")]
    InvalidDate(String),
    #[error("no more than {0} reference images can be attached")]
    TooManyReferences(usize),
    #[error("reference image `{name}` is larger than {limit} bytes")]
    ReferenceTooLarge { name: String, limit: usize },
}

/// Why the booking form refused to start a submission. The messages are
/// shown to the visitor as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    #[error("A submission is already in progress.")]
    AlreadySaving,
    #[error("Please pick a time slot first.")]
    NoSlot,
    #[error("Please choose an artist.")]
    NoArtist,
    #[error("Please agree to the booking terms.")]
    NotAgreed,
    #[error("Please fill in: {}.", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Please attach at least one reference image.")]
    NoReferences,
    #[error("Please attach no more than {0} reference images.")]
    TooManyReferences(usize),
}
