use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    #[schema(example = -6.2)]
    pub latitude: f64,
    #[schema(example = 106.816666)]
    pub longitude: f64,
    /// metres, as reported by the browser
    #[schema(example = 12.5)]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GeoError {
    #[strum(serialize = "Pengguna menolak permintaan Geolocation")]
    PermissionDenied,
    #[strum(serialize = "Informasi lokasi tidak tersedia")]
    PositionUnavailable,
    #[strum(serialize = "Request timeout")]
    Timeout,
    #[strum(serialize = "Error tidak diketahui")]
    Unknown,
    #[strum(serialize = "Geolocation tidak didukung browser ini")]
    Unsupported,
}

/// Outcome posted back by the browser script.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum LocationReport {
    Located(Coordinates),
    Failed { error: GeoError },
}

/// A location request as seen across polls.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocationState {
    Pending,
    Error { reason: GeoError, message: String },
    Success { coords: Coordinates },
}

impl From<LocationReport> for LocationState {
    fn from(report: LocationReport) -> Self {
        match report {
            LocationReport::Located(coords) => LocationState::Success { coords },
            LocationReport::Failed { error } => LocationState::Error {
                reason: error,
                message: error.to_string(),
            },
        }
    }
}

impl LocationState {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationState::Success { coords } => Some(*coords),
            _ => None,
        }
    }
}

/// Options handed to `navigator.geolocation.getCurrentPosition`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: u32,
    pub maximum_age: u32,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: 10_000,
            maximum_age: 0,
        }
    }
}
