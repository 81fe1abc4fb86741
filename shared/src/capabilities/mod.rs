mod geolocation;
mod launcher;
mod realtime;

pub use self::geolocation::{
    GeoPosition, Geolocation, GeolocationOperation, LocationError, LocationResult,
};
pub use self::launcher::{LaunchOperation, Launcher};
pub use self::realtime::{
    ChangeKind, ChangeNotification, Realtime, RealtimeError, RealtimeOperation, RealtimeOutput,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

/// What an HTTP call hands back to the core. Status codes are checked by
/// whoever reads the response.
pub type HttpResult = crux_http::Result<crux_http::Response<Vec<u8>>>;

pub type AppHttp = Http<Event>;
pub type AppRender = Render<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub realtime: Realtime<Event>,
    pub geolocation: Geolocation<Event>,
    pub launcher: Launcher<Event>,
}
