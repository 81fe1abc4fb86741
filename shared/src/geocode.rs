//! Reverse geocoding of a picked point into one of the known districts.

use crux_http::RequestBuilder;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::capabilities::{AppHttp, HttpResult};
use crate::config::GeocoderConfig;
use crate::event::Event;
use crate::model::{Coordinate, District};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ReverseGeocodeResponse {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Address {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Why a lookup did not produce a district. None of these reach the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("geocoder URL is invalid: {0}")]
    InvalidUrl(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("geocoder returned HTTP {0}")]
    Status(u16),
    #[error("unreadable response: {0}")]
    Body(String),
    #[error("response carries no address")]
    NoAddress,
    #[error("no district matches '{0}'")]
    NoMatch(String),
}

pub fn reverse_url(config: &GeocoderConfig, point: Coordinate) -> Result<Url, GeocodeError> {
    let mut url =
        Url::parse(&config.reverse_url).map_err(|e| GeocodeError::InvalidUrl(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("lat", &point.lat().to_string())
        .append_pair("lon", &point.lon().to_string());
    Ok(url)
}

pub fn reverse_request(
    http: &AppHttp,
    config: &GeocoderConfig,
    point: Coordinate,
) -> Result<RequestBuilder<Event>, GeocodeError> {
    let url = reverse_url(config, point)?;
    Ok(http.get(url.as_str()).header("Accept", "application/json"))
}

/// First non-empty of state, district, city.
#[must_use]
pub fn detected_name(address: &Address) -> Option<&str> {
    [&address.state, &address.district, &address.city]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .find(|name| !name.trim().is_empty())
}

/// First district whose name appears anywhere in `name`.
#[must_use]
pub fn match_district(name: &str) -> Option<District> {
    District::ALL
        .iter()
        .copied()
        .find(|district| name.contains(district.name()))
}

pub fn resolve_district(result: HttpResult) -> Result<District, GeocodeError> {
    let mut response = result.map_err(|e| GeocodeError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(GeocodeError::Status(u16::from(status)));
    }
    let body = response.take_body().unwrap_or_default();
    let parsed: ReverseGeocodeResponse =
        serde_json::from_slice(&body).map_err(|e| GeocodeError::Body(e.to_string()))?;
    let address = parsed.address.ok_or(GeocodeError::NoAddress)?;
    let name = detected_name(&address).ok_or(GeocodeError::NoAddress)?;
    match_district(name).ok_or_else(|| GeocodeError::NoMatch(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_http::testing::ResponseBuilder;

    fn ok(body: &[u8]) -> HttpResult {
        Ok(ResponseBuilder::ok().body(body.to_vec()).build())
    }

    #[test]
    fn test_reverse_url() {
        let point = Coordinate::new(6.9271, 79.8612).unwrap();
        let url = reverse_url(&GeocoderConfig::default(), point).unwrap();
        assert_eq!(
            url.as_str(),
            "https://nominatim.openstreetmap.org/reverse?format=json&lat=6.9271&lon=79.8612"
        );
    }

    #[test]
    fn test_detected_name_order() {
        let address = Address {
            state: None,
            district: Some("Kandy District".into()),
            city: Some("Kandy".into()),
        };
        assert_eq!(detected_name(&address), Some("Kandy District"));
        assert_eq!(detected_name(&Address::default()), None);
    }

    #[test]
    fn test_detected_name_skips_empty_parts() {
        let address = Address {
            state: Some(String::new()),
            district: Some("  ".into()),
            city: Some("Matara".into()),
        };
        assert_eq!(detected_name(&address), Some("Matara"));

        let body = br#"{"address":{"state":"","district":"Ratnapura District"}}"#;
        assert_eq!(resolve_district(ok(body)), Ok(District::Ratnapura));
    }

    #[test]
    fn test_match_district_by_containment() {
        assert_eq!(match_district("Colombo District"), Some(District::Colombo));
        assert_eq!(match_district("Nuwara Eliya"), Some(District::NuwaraEliya));
        assert_eq!(match_district("Western Province"), None);
    }

    #[test]
    fn test_resolve_district_from_body() {
        let body = br#"{"place_id":1,"address":{"city":"Galle","state":"Southern Province"}}"#;
        // state wins, and "Southern Province" names no district
        assert_eq!(
            resolve_district(ok(body)),
            Err(GeocodeError::NoMatch("Southern Province".into()))
        );

        let body = br#"{"address":{"district":"Galle District"}}"#;
        assert_eq!(resolve_district(ok(body)), Ok(District::Galle));
    }

    #[test]
    fn test_resolve_district_failures() {
        assert_eq!(resolve_district(ok(b"{}")), Err(GeocodeError::NoAddress));
        assert!(matches!(
            resolve_district(ok(b"<html>")),
            Err(GeocodeError::Body(_))
        ));
    }
}
