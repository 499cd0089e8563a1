use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A recurring weekly opening, e.g. Mondays from 10:00 for 180 minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub hour: u32,
    pub minute: u32,
    pub duration: u32,
}

impl AvailabilityWindow {
    /// `HH:MM:duration`, the form the backend expects per weekday.
    pub fn to_param(&self) -> String {
        format!("{:02}:{:02}:{}", self.hour, self.minute, self.duration)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyAvailability {
    pub su: Vec<AvailabilityWindow>,
    pub mo: Vec<AvailabilityWindow>,
    pub tu: Vec<AvailabilityWindow>,
    pub we: Vec<AvailabilityWindow>,
    pub th: Vec<AvailabilityWindow>,
    pub fr: Vec<AvailabilityWindow>,
    pub sa: Vec<AvailabilityWindow>,
}

impl WeeklyAvailability {
    /// Every window as a `(weekday key, HH:MM:duration)` pair, Sunday first.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        [
            ("su", &self.su),
            ("mo", &self.mo),
            ("tu", &self.tu),
            ("we", &self.we),
            ("th", &self.th),
            ("fr", &self.fr),
            ("sa", &self.sa),
        ]
        .into_iter()
        .flat_map(|(key, windows)| {
            windows
                .iter()
                .map(move |window| (key.to_string(), window.to_param()))
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub name: String,
    pub calendar_id: String,
    #[serde(default)]
    pub available_times: WeeklyAvailability,
}

/// Read-only list of bookable artists, loaded once at startup.
///
/// Serialized as a plain array. Deserializing goes through
/// [`ArtistCatalog::new`], so every decoded catalog is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Artist>", into = "Vec<Artist>")]
pub struct ArtistCatalog {
    artists: Vec<Artist>,
}

impl TryFrom<Vec<Artist>> for ArtistCatalog {
    type Error = CatalogError;

    fn try_from(artists: Vec<Artist>) -> Result<Self, Self::Error> {
        Self::new(artists)
    }
}

impl From<ArtistCatalog> for Vec<Artist> {
    fn from(catalog: ArtistCatalog) -> Self {
        catalog.artists
    }
}

impl ArtistCatalog {
    pub fn new(artists: Vec<Artist>) -> Result<Self, CatalogError> {
        if artists.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for artist in &artists {
            if artist.name.trim().is_empty() {
                return Err(CatalogError::BlankName);
            }
            if artist.calendar_id.trim().is_empty() {
                return Err(CatalogError::MissingCalendarId(artist.name.clone()));
            }
            if !seen.insert(artist.name.as_str()) {
                return Err(CatalogError::DuplicateName(artist.name.clone()));
            }
        }

        Ok(Self { artists })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str::<Vec<Artist>>(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            artists = catalog.len(),
            "loaded artist catalog"
        );
        Ok(catalog)
    }

    /// Exact, case-sensitive name match.
    pub fn find(&self, name: &str) -> Option<&Artist> {
        self.artists.iter().find(|artist| artist.name == name)
    }

    pub fn find_by_calendar_id(&self, calendar_id: &str) -> Option<&Artist> {
        self.artists
            .iter()
            .find(|artist| artist.calendar_id == calendar_id)
    }

    pub fn first(&self) -> Option<&Artist> {
        self.artists.first()
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}
