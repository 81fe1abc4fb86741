#![allow(dead_code)]

use crux_core::testing::{AppTester, Update};
use crux_core::Request;
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use serde_json::json;

use shared::capabilities::{GeolocationOperation, LaunchOperation, RealtimeOperation};
use shared::{App, Config, Effect, Event, Model};

pub type Tester = AppTester<App, Effect>;

pub fn config() -> Config {
    Config::new("https://demo.supabase.co", "anon-key")
}

pub fn row(id: u64, severity: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Person {id}"),
        "contact_number": "0771234567",
        "needs": "Food and water",
        "district": "Gampaha",
        "town": "Wattala",
        "severity": severity,
        "latitude": 6.99,
        "longitude": 79.89,
        "status": status,
        "created_at": "2025-11-29T08:00:00+00:00"
    })
}

/// Answers an HTTP effect the way the shell would.
pub fn respond(
    app: &Tester,
    request: &mut Request<HttpRequest>,
    status: u16,
    body: &[u8],
) -> Update<Effect, Event> {
    let response = HttpResponse::status(status).body(body.to_vec()).build();
    app.resolve(request, HttpResult::Ok(response))
        .expect("resolve http request")
}

pub fn respond_json(
    app: &Tester,
    request: &mut Request<HttpRequest>,
    status: u16,
    body: &serde_json::Value,
) -> Update<Effect, Event> {
    let bytes = serde_json::to_vec(body).expect("serialise body");
    respond(app, request, status, &bytes)
}

pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
        .map(|header| header.value.as_str())
}

pub fn http_requests(update: Update<Effect, Event>) -> Vec<Request<HttpRequest>> {
    update
        .effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn realtime_requests(update: &mut Update<Effect, Event>) -> Vec<Request<RealtimeOperation>> {
    let (realtime, rest): (Vec<_>, Vec<_>) = update
        .effects
        .drain(..)
        .partition(|effect| matches!(effect, Effect::Realtime(_)));
    update.effects = rest;
    realtime
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Realtime(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn geolocation_request(update: Update<Effect, Event>) -> Option<Request<GeolocationOperation>> {
    update.effects.into_iter().find_map(|effect| match effect {
        Effect::Geolocation(request) => Some(request),
        _ => None,
    })
}

pub fn launch_operations(update: Update<Effect, Event>) -> Vec<LaunchOperation> {
    update
        .effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Launcher(request) => Some(request.operation),
            _ => None,
        })
        .collect()
}

pub fn renders(update: &Update<Effect, Event>) -> bool {
    update
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::Render(_)))
}

/// Feeds every event produced by an effect resolution back into the app.
pub fn replay(
    app: &Tester,
    update: Update<Effect, Event>,
    model: &mut Model,
) -> Vec<Update<Effect, Event>> {
    update
        .events
        .into_iter()
        .map(|event| app.update(event, model))
        .collect()
}

/// Starts the app, answers the initial fetch with `rows` and returns the
/// open change-feed subscription.
pub fn start_with(
    app: &Tester,
    model: &mut Model,
    rows: Vec<serde_json::Value>,
) -> Request<RealtimeOperation> {
    let mut update = app.update(Event::AppStarted(Box::new(config())), model);
    let subscription = realtime_requests(&mut update)
        .into_iter()
        .next()
        .expect("subscription effect");

    let mut fetch = http_requests(update).into_iter().next().expect("fetch effect");
    let resolved = respond_json(app, &mut fetch, 200, &json!(rows));
    replay(app, resolved, model);
    subscription
}
