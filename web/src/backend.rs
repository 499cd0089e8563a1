//! HTTP client for the studio's booking API.

use std::sync::Arc;

use booking_core::{
    ArtistCatalog, Availability, AvailabilityError, AvailabilityQuery, AvailabilityResponse,
    BookingSubmission,
};
use http::StatusCode;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("booking API unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("booking API responded with {0}")]
    Status(StatusCode),
    #[error("booking API sent an unreadable body: {0}")]
    Decode(String),
    #[error(transparent)]
    Rejected(#[from] AvailabilityError),
}

impl BackendError {
    /// Text safe to show a visitor. The full error, which can carry the
    /// API address and query, only goes to the server log.
    pub fn visitor_message(&self) -> &'static str {
        match self {
            BackendError::Rejected(_) => "No availability was returned for this artist.",
            BackendError::Transport(_) | BackendError::Status(_) | BackendError::Decode(_) => {
                "The booking service is unavailable right now. Please try again later."
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingBackend {
    client: reqwest::Client,
    base_url: String,
}

impl BookingBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Availability, BackendError> {
        tracing::debug!(
            calendar_id = %query.calendar_id,
            time_min = %query.time_min,
            time_max = %query.time_max,
            windows = query.windows.len(),
            "requesting availability"
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&query.pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: AvailabilityResponse =
            serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))?;
        let availability = parsed.into_availability()?;

        tracing::info!(
            calendar_id = %query.calendar_id,
            months = availability.len(),
            "availability loaded"
        );
        Ok(availability)
    }

    /// One multipart POST; no retries.
    pub async fn submit(&self, submission: BookingSubmission) -> Result<(), BackendError> {
        let mut form = Form::new();
        for (name, value) in submission.text_fields() {
            form = form.text(name, value.to_string());
        }

        let calendar_id = submission.calendar_id.clone();
        let reference_count = submission.references.len();
        for file in submission.references {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            form = form.part("references", part);
        }

        let response = self
            .client
            .post(&self.base_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status));
        }

        tracing::info!(
            calendar_id = %calendar_id,
            references = reference_count,
            "booking submitted"
        );
        Ok(())
    }
}

/// Read-only state handed to every request through Leptos context.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<ArtistCatalog>,
    pub backend: BookingBackend,
}

impl AppState {
    pub fn new(catalog: ArtistCatalog, backend: BookingBackend) -> Self {
        Self {
            catalog: Arc::new(catalog),
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::RawQuery;
    use axum::routing::get;
    use axum::Router;
    use booking_core::ReferenceFile;

    use super::*;

    async fn serve(router: Router) -> BookingBackend {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        BookingBackend::new(format!("http://{}/api/", addr))
    }

    fn query() -> AvailabilityQuery {
        AvailabilityQuery {
            calendar_id: "mara@studio".to_string(),
            time_min: "2026-10-18T22:00:00.000Z".to_string(),
            time_max: "2027-04-30T13:59:59.999Z".to_string(),
            windows: vec![("tu".to_string(), "11:00:60".to_string())],
        }
    }

    fn submission() -> BookingSubmission {
        BookingSubmission {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            description: "A small engine".to_string(),
            sizing: "5cm".to_string(),
            placement: "Inner left forearm".to_string(),
            references: vec![ReferenceFile {
                file_name: "sketch.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: vec![1, 2, 3],
            }],
            date: "2026-10-20T14:30:00+11:00".to_string(),
            calendar_id: "mara@studio".to_string(),
        }
    }

    #[tokio::test]
    async fn availability_is_decoded_from_the_query() {
        let backend = serve(Router::new().route(
            "/api/",
            get(|RawQuery(raw): RawQuery| async move {
                let raw = raw.unwrap_or_default();
                if raw.contains("calendarId=mara%40studio") && raw.contains("tu=11%3A00%3A60") {
                    r#"{"availableEvents":{"0":{"20":["11:00:60"]}}}"#
                } else {
                    "{}"
                }
            }),
        ))
        .await;

        let availability = backend.fetch_availability(&query()).await.unwrap();
        assert_eq!(availability.month(0).unwrap().slots_for(20).len(), 1);
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let backend = serve(
            Router::new().route(
                "/api/",
                get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") })
                    .post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            ),
        )
        .await;

        assert!(matches!(
            backend.fetch_availability(&query()).await,
            Err(BackendError::Status(StatusCode::BAD_GATEWAY))
        ));
        assert!(matches!(
            backend.submit(submission()).await,
            Err(BackendError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        ));
    }

    #[tokio::test]
    async fn ok_without_available_events_is_rejected() {
        let backend = serve(Router::new().route("/api/", get(|| async { "{}" }))).await;

        assert!(matches!(
            backend.fetch_availability(&query()).await,
            Err(BackendError::Rejected(AvailabilityError::MissingEvents))
        ));
    }

    #[tokio::test]
    async fn submission_is_posted_once() {
        let backend =
            serve(Router::new().route("/api/", axum::routing::post(|| async { "ok" }))).await;
        backend.submit(submission()).await.unwrap();
    }

    #[tokio::test]
    async fn visitor_message_hides_backend_details() {
        let backend = serve(
            Router::new().route("/api/", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "") })),
        )
        .await;

        let err = backend.fetch_availability(&query()).await.unwrap_err();
        assert!(err.to_string().contains("503"));
        let message = err.visitor_message();
        assert!(!message.contains(backend.base_url()));
        assert!(!message.contains("mara"));
    }
}
