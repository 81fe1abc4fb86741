use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier assigned by the backing store. Kept opaque: numeric and
/// textual ids are both accepted and held as text.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    #[default]
    Moderate,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Moderate, Severity::Low];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sev| sev.as_str() == s)
    }

    /// Colour of the map marker for this severity.
    #[must_use]
    pub const fn marker_color(self) -> MarkerColor {
        match self {
            Self::Critical => MarkerColor::Red,
            Self::Moderate => MarkerColor::Orange,
            Self::Low => MarkerColor::Blue,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Red,
    Orange,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Active,
    Completed,
}

impl RequestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!((self, to), (Self::Active, Self::Completed))
    }

    pub fn validate_transition(self, to: Self) -> Result<(), TransitionError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError::NotAllowed { from: self, to })
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot move a request from {from} to {to}")]
    NotAllowed {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error("request {0} is not in the current snapshot")]
    UnknownRequest(RequestId),
}

macro_rules! districts {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Administrative districts a request can be filed under.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum District {
            $(#[serde(rename = $name)] $variant),+
        }

        impl District {
            pub const ALL: &'static [District] = &[$(District::$variant),+];

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(District::$variant => $name),+
                }
            }
        }
    };
}

districts! {
    Colombo => "Colombo",
    Gampaha => "Gampaha",
    Kalutara => "Kalutara",
    Kandy => "Kandy",
    Matale => "Matale",
    NuwaraEliya => "Nuwara Eliya",
    Galle => "Galle",
    Matara => "Matara",
    Hambantota => "Hambantota",
    Jaffna => "Jaffna",
    Kilinochchi => "Kilinochchi",
    Mannar => "Mannar",
    Vavuniya => "Vavuniya",
    Mullaitivu => "Mullaitivu",
    Batticaloa => "Batticaloa",
    Ampara => "Ampara",
    Trincomalee => "Trincomalee",
    Kurunegala => "Kurunegala",
    Puttalam => "Puttalam",
    Anuradhapura => "Anuradhapura",
    Polonnaruwa => "Polonnaruwa",
    Badulla => "Badulla",
    Monaragala => "Monaragala",
    Ratnapura => "Ratnapura",
    Kegalle => "Kegalle",
}

impl District {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.name() == name)
    }
}

impl Default for District {
    fn default() -> Self {
        Self::Colombo
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }
}

/// One row of the request table as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AidRequest {
    pub id: RequestId,
    pub name: String,
    pub contact_number: String,
    pub needs: String,
    pub district: District,
    pub town: String,
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl AidRequest {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RequestStatus::Active
    }

    /// `tel:` link for the device dialer.
    #[must_use]
    pub fn dial_link(&self) -> String {
        format!("tel:{}", self.contact_number)
    }

    /// Turn-by-turn directions to the request in an external map app.
    #[must_use]
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.latitude, self.longitude
        )
    }
}

/// Insert payload. Only obtainable from a validated form, so it always has
/// coordinates and always starts out active.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAidRequest {
    pub name: String,
    pub contact_number: String,
    pub needs: String,
    pub district: District,
    pub town: String,
    pub severity: Severity,
    pub latitude: f64,
    pub longitude: f64,
    pub status: RequestStatus,
}

impl NewAidRequest {
    pub(crate) fn new(
        name: String,
        contact_number: String,
        needs: String,
        district: District,
        town: String,
        severity: Severity,
        point: Coordinate,
    ) -> Self {
        Self {
            name,
            contact_number,
            needs,
            district,
            town,
            severity,
            latitude: point.lat(),
            longitude: point.lon(),
            status: RequestStatus::Active,
        }
    }
}
