use booking_core::{ArtistCatalog, Availability};
use leptos::prelude::*;
use leptos::server;
use server_fn::codec::{MultipartData, MultipartFormData};

#[cfg(feature = "ssr")]
use crate::backend::AppState;

#[cfg(feature = "ssr")]
fn app_state() -> Result<AppState, ServerFnError> {
    use_context::<AppState>()
        .ok_or_else(|| ServerFnError::new("Application state is not available".to_string()))
}

/// Rebuilds the availability query from the catalog so the browser only
/// chooses which artist to look up.
#[cfg(feature = "ssr")]
fn availability_query(
    catalog: &ArtistCatalog,
    calendar_id: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<booking_core::AvailabilityQuery, ServerFnError> {
    use booking_core::{AvailabilityQuery, StudioClock};

    let artist = catalog.find_by_calendar_id(calendar_id).ok_or_else(|| {
        tracing::warn!(calendar_id, "availability requested for unknown calendar");
        ServerFnError::new("Unknown artist".to_string())
    })?;
    Ok(AvailabilityQuery::for_artist(
        artist,
        &StudioClock::default(),
        now,
    ))
}

#[server]
pub async fn get_artist_catalog() -> Result<ArtistCatalog, ServerFnError> {
    let state = app_state()?;
    Ok(state.catalog.as_ref().clone())
}

#[server]
pub async fn fetch_available_times(calendar_id: String) -> Result<Availability, ServerFnError> {
    let state = app_state()?;
    let query = availability_query(&state.catalog, &calendar_id, chrono::Utc::now())?;

    match state.backend.fetch_availability(&query).await {
        Ok(availability) => Ok(availability),
        Err(e) => {
            tracing::error!(calendar_id = %query.calendar_id, error = %e, "availability lookup failed");
            Err(ServerFnError::new(e.visitor_message().to_string()))
        }
    }
}

/// Receives the booking form as the browser posted it and forwards it to
/// the booking API once every required part is present.
#[server(input = MultipartFormData)]
pub async fn submit_booking(data: MultipartData) -> Result<(), ServerFnError> {
    use booking_core::{ReferenceFile, SubmissionBuilder, SubmissionError, MAX_REFERENCE_BYTES};

    let rejected = |e: SubmissionError| {
        tracing::warn!(error = %e, "rejected booking form");
        ServerFnError::new(e.to_string())
    };
    fn malformed(e: impl std::fmt::Display) -> ServerFnError {
        tracing::warn!(error = %e, "malformed booking form");
        ServerFnError::new("The booking form could not be read".to_string())
    }

    let state = app_state()?;
    let mut multipart = data
        .into_inner()
        .ok_or_else(|| ServerFnError::new("Booking form was empty".to_string()))?;

    let mut builder = SubmissionBuilder::new();
    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if name != "references" {
            let value = field.text().await.map_err(malformed)?;
            builder.text(&name, value);
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|mime| mime.to_string());
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(malformed)? {
            if bytes.is_empty() && !chunk.is_empty() {
                builder.accepts_reference().map_err(rejected)?;
            }
            if bytes.len() + chunk.len() > MAX_REFERENCE_BYTES {
                return Err(rejected(SubmissionError::ReferenceTooLarge {
                    name: file_name,
                    limit: MAX_REFERENCE_BYTES,
                }));
            }
            bytes.extend_from_slice(&chunk);
        }
        builder
            .reference(ReferenceFile {
                file_name,
                content_type,
                bytes,
            })
            .map_err(rejected)?;
    }

    let submission = builder.finish().map_err(rejected)?;

    if state
        .catalog
        .find_by_calendar_id(&submission.calendar_id)
        .is_none()
    {
        return Err(ServerFnError::new("Unknown artist".to_string()));
    }

    state.backend.submit(submission).await.map_err(|e| {
        tracing::error!(error = %e, "booking submission failed");
        ServerFnError::new(e.visitor_message().to_string())
    })
}
