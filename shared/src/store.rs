//! Request builders and response readers for the store's REST interface.
//!
//! The store speaks PostgREST: the table lives at `/rest/v1/<table>`, filters
//! are query parameters (`id=eq.42`), and every call carries the anon key both
//! as `apikey` and as a bearer token.

use crux_http::RequestBuilder;
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::capabilities::{AppHttp, HttpResult};
use crate::config::Config;
use crate::event::Event;
use crate::model::{AidRequest, NewAidRequest, RequestId, RequestStatus};
use crate::{AppError, AppResult, ErrorKind};

fn table_url(config: &Config) -> AppResult<Url> {
    let invalid = |reason: String| {
        AppError::new(ErrorKind::Configuration, "store URL is invalid")
            .with_internal(reason)
            .with_context("url", config.store.url.clone())
    };

    let mut url = Url::parse(&config.store.url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("store URL cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(["rest", "v1", config.store.table.as_str()]);
    Ok(url)
}

fn authorised(builder: RequestBuilder<Event>, config: &Config) -> RequestBuilder<Event> {
    builder
        .header("apikey", config.store.anon_key.as_str())
        .header("Authorization", &format!("Bearer {}", config.store.anon_key))
        .header("Accept", "application/json")
}

fn with_json<T: Serialize>(
    builder: RequestBuilder<Event>,
    body: &T,
) -> AppResult<RequestBuilder<Event>> {
    builder
        .header("Prefer", "return=minimal")
        .body_json(body)
        .map_err(|e| {
            AppError::new(ErrorKind::Serialization, "could not encode request body")
                .with_internal(e.to_string())
        })
}

/// Whole table, newest first.
pub fn fetch_all(http: &AppHttp, config: &Config) -> AppResult<RequestBuilder<Event>> {
    let mut url = table_url(config)?;
    url.query_pairs_mut()
        .append_pair("select", "*")
        .append_pair("order", "created_at.desc");
    Ok(authorised(http.get(url.as_str()), config))
}

pub fn insert(
    http: &AppHttp,
    config: &Config,
    request: &NewAidRequest,
) -> AppResult<RequestBuilder<Event>> {
    let url = table_url(config)?;
    with_json(authorised(http.post(url.as_str()), config), &[request])
}

#[derive(Serialize)]
struct StatusPatch {
    status: RequestStatus,
}

pub fn mark_completed(
    http: &AppHttp,
    config: &Config,
    id: &RequestId,
) -> AppResult<RequestBuilder<Event>> {
    let mut url = table_url(config)?;
    url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
    with_json(
        authorised(http.patch(url.as_str()), config),
        &StatusPatch {
            status: RequestStatus::Completed,
        },
    )
}

/// Body of a 2xx response. Anything else becomes an error carrying the
/// store's own text when it sent one.
fn success_body(result: HttpResult) -> AppResult<Vec<u8>> {
    let mut response = result.map_err(|e| {
        AppError::new(ErrorKind::Network, "request failed").with_internal(e.to_string())
    })?;
    let status = response.status();
    let body = response.take_body().unwrap_or_default();
    if status.is_success() {
        Ok(body)
    } else {
        Err(AppError::from_http_status(u16::from(status), Some(&body)))
    }
}

/// Maps a write response to success or an error carrying the store's text.
pub fn expect_success(result: HttpResult) -> AppResult<()> {
    success_body(result).map(drop)
}

/// Reads a fetch response. Rows that do not decode are skipped so one bad
/// row cannot blank the whole map.
pub fn read_requests(result: HttpResult) -> AppResult<Vec<AidRequest>> {
    let body = success_body(result)?;
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&body).map_err(|e| {
        AppError::new(ErrorKind::Deserialization, "unexpected response from the store")
            .with_internal(e.to_string())
    })?;

    let total = rows.len();
    let requests: Vec<AidRequest> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<AidRequest>(row) {
            Ok(request) => Some(request),
            Err(e) => {
                warn!(error = %e, "skipping malformed request row");
                None
            }
        })
        .collect();

    if requests.len() < total {
        warn!(
            skipped = total - requests.len(),
            total, "fetched rows partially decoded"
        );
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_http::testing::ResponseBuilder;

    fn ok(body: &[u8]) -> HttpResult {
        Ok(ResponseBuilder::ok().body(body.to_vec()).build())
    }

    #[test]
    fn test_table_url_with_trailing_slash() {
        let url = table_url(&Config::new("https://demo.supabase.co/", "k")).unwrap();
        assert_eq!(url.as_str(), "https://demo.supabase.co/rest/v1/aid_requests");
    }

    #[test]
    fn test_table_url_rejects_garbage() {
        let error = table_url(&Config::new("not a url", "k")).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_read_requests_skips_bad_rows() {
        let body = br#"[
            {"id":1,"name":"A","contact_number":"1","needs":"x","district":"Kandy","town":"t",
             "severity":"low","latitude":7.2,"longitude":80.6,"status":"active",
             "created_at":"2025-11-28T10:00:00Z"},
            {"id":2,"name":"B","district":"Atlantis"}
        ]"#;
        let requests = read_requests(ok(body)).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, RequestId::new("1"));
    }

    #[test]
    fn test_read_requests_rejects_non_array() {
        let error = read_requests(ok(br#"{"message":"oops"}"#)).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Deserialization);
    }

    #[test]
    fn test_empty_write_response_is_success() {
        assert!(expect_success(ok(b"")).is_ok());
    }
}
