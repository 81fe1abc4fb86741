#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod form;
pub mod geocode;
pub mod i18n;
pub mod location;
pub mod model;
pub mod stats;
pub mod store;
pub mod sync;
pub mod verify;
pub mod view;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use app::{App, Model};
pub use capabilities::{Capabilities, Effect};
pub use config::Config;
pub use event::Event;
pub use view::ViewModel;

pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_CONTACT_DIGITS: usize = 10;
pub const MAX_NEEDS_CHARS: usize = 270;
pub const MAX_TOWN_CHARS: usize = 50;

pub const DEFAULT_MAP_CENTER: (f64, f64) = (7.8731, 80.7718);
pub const DEFAULT_MAP_ZOOM: f64 = 8.0;
pub const PICKER_MAP_ZOOM: f64 = 9.0;
pub const LOCATED_ZOOM: f64 = 14.0;
pub const MIN_MAP_ZOOM: f64 = 7.0;
/// South-west and north-east corners the main map may not be panned past.
pub const MAP_BOUNDS: [(f64, f64); 2] = [(5.8, 79.5), (9.9, 82.0)];

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    RateLimited,
    Location,
    LocationPermissionDenied,
    Configuration,
    Serialization,
    Deserialization,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTH_ERROR",
            Self::Authorization => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RateLimited => "RATE_LIMITED",
            Self::Location => "LOCATION_ERROR",
            Self::LocationPermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::Configuration => "CONFIGURATION_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Text shown to the user. Store-originated errors keep the store's own
    /// message; transport and platform failures get a generic sentence.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Location => {
                "Unable to determine your location. Please check your GPS settings.".into()
            }
            ErrorKind::LocationPermissionDenied => {
                "Location access is required. Please enable location permissions.".into()
            }
            ErrorKind::Configuration => {
                "The app is not configured correctly. Please contact the organisers.".into()
            }
            ErrorKind::Serialization | ErrorKind::Deserialization => {
                "A data error occurred. Please try again.".into()
            }
            ErrorKind::Validation
            | ErrorKind::Authentication
            | ErrorKind::Authorization
            | ErrorKind::NotFound
            | ErrorKind::Conflict
            | ErrorKind::RateLimited
            | ErrorKind::Internal
            | ErrorKind::Unknown => format!("Error: {}", self.message),
        }
    }

    /// Maps a non-success store response into an error, keeping the
    /// store's `message` field when the body carries one.
    #[must_use]
    pub fn from_http_status(status: u16, body: Option<&[u8]>) -> Self {
        let kind = match status {
            400 | 422 => ErrorKind::Validation,
            401 => ErrorKind::Authentication,
            403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            429 => ErrorKind::RateLimited,
            408 | 504 => ErrorKind::Timeout,
            500..=599 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        };

        let parsed = body.and_then(|b| serde_json::from_slice::<StoreErrorBody>(b).ok());
        let message = parsed
            .as_ref()
            .and_then(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error: {status}"));

        let mut error = Self::new(kind, message).with_context("http_status", status.to_string());
        if let Some(code) = parsed.and_then(|e| e.code) {
            error = error.with_context("store_code", code);
        }
        error
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

/// Error body returned by the store's REST layer.
#[derive(Debug, Clone, Deserialize)]
struct StoreErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

pub type AppResult<T> = Result<T, AppError>;

impl From<capabilities::LocationError> for AppError {
    fn from(e: capabilities::LocationError) -> Self {
        use capabilities::LocationError;

        let kind = match e {
            LocationError::PermissionDenied => ErrorKind::LocationPermissionDenied,
            LocationError::Unavailable | LocationError::Timeout => ErrorKind::Location,
        };
        AppError::new(kind, e.to_string())
    }
}

/// Milliseconds since the Unix epoch, as seen by the core.
#[must_use]
pub fn current_time_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_keeps_store_message() {
        let body = br#"{"code":"23502","message":"null value in column \"town\"","details":null,"hint":null}"#;
        let error = AppError::from_http_status(400, Some(body));
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.message, "null value in column \"town\"");
        assert_eq!(error.context.get("store_code").map(String::as_str), Some("23502"));
        assert_eq!(
            error.user_facing_message(),
            "Error: null value in column \"town\""
        );
    }

    #[test]
    fn test_from_http_status_without_body() {
        let error = AppError::from_http_status(503, None);
        assert_eq!(error.kind, ErrorKind::Internal);
        assert_eq!(error.message, "HTTP error: 503");
        assert_eq!(error.context.get("http_status").map(String::as_str), Some("503"));
    }

    #[test]
    fn test_from_http_status_garbage_body() {
        let error = AppError::from_http_status(401, Some(b"<html>nope</html>"));
        assert_eq!(error.kind, ErrorKind::Authentication);
        assert_eq!(error.message, "HTTP error: 401");
    }

    #[test]
    fn test_gateway_timeout_gets_generic_text() {
        let error = AppError::from_http_status(504, Some(b"upstream"));
        assert_eq!(error.kind, ErrorKind::Timeout);
        assert_eq!(
            error.user_facing_message(),
            "The request timed out. Please try again."
        );
    }

    #[test]
    fn test_location_errors() {
        let error = AppError::from(capabilities::LocationError::PermissionDenied);
        assert_eq!(error.kind, ErrorKind::LocationPermissionDenied);
        assert_eq!(error.code(), "LOCATION_PERMISSION_DENIED");
        let error = AppError::from(capabilities::LocationError::Timeout);
        assert_eq!(error.kind, ErrorKind::Location);
    }

    #[test]
    fn test_display_includes_internal() {
        let error = AppError::new(ErrorKind::Internal, "boom").with_internal("stack");
        assert_eq!(error.to_string(), "[INTERNAL_ERROR] boom (internal: stack)");
    }
}
