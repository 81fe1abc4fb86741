use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, LocationError, LocationResult};
use crate::config::Config;
use crate::event::Event;
use crate::form::RequestForm;
use crate::i18n::{strings, Language, Strings};
use crate::location::{LocationPicker, Ticket};
use crate::model::{Coordinate, RequestId, TransitionError};
use crate::sync::SyncState;
use crate::verify::{VerificationError, VerificationGate};
use crate::view::ViewModel;
use crate::{current_time_ms, geocode, store, AppError, ErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastMessage {
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: i64,
    pub duration_ms: u64,
}

impl ToastMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at_ms: current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }
}

/// A message the user has to acknowledge before carrying on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Set once the shell has started the app with a valid config.
    pub config: Option<Config>,
    pub language: Language,
    pub form_open: bool,
    pub form: RequestForm,
    pub picker: LocationPicker,
    pub submitting: bool,
    pub verification: VerificationGate,
    pub sync: SyncState,
    pub alert: Option<Alert>,
    pub toast: Option<ToastMessage>,
}

impl Model {
    #[must_use]
    pub fn strings(&self) -> &'static Strings {
        strings(self.language)
    }

    pub fn show_alert(&mut self, message: impl Into<String>, kind: AlertKind) {
        self.alert = Some(Alert {
            message: message.into(),
            kind,
        });
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(ToastMessage::new(message, kind));
    }

    fn show_error(&mut self, error: &AppError) {
        self.show_alert(error.user_facing_message(), AlertKind::Error);
    }
}

#[derive(Default)]
pub struct App;

impl App {
    fn fetch_requests(model: &mut Model, caps: &Capabilities) {
        let Some(config) = model.config.as_ref() else {
            return;
        };
        match store::fetch_all(&caps.http, config) {
            Ok(builder) => {
                let seq = model.sync.next_fetch();
                builder.send(move |result| Event::RequestsFetched {
                    seq,
                    result: Box::new(result),
                });
            }
            Err(e) => warn!(error = %e, "could not build fetch request"),
        }
    }

    fn geocode(model: &Model, caps: &Capabilities, point: Coordinate, ticket: Ticket) {
        let Some(config) = model.config.as_ref() else {
            return;
        };
        match geocode::reverse_request(&caps.http, &config.geocoder, point) {
            Ok(builder) => builder.send(move |result| Event::DistrictGeocoded {
                ticket,
                result: Box::new(result),
            }),
            Err(e) => debug!(error = %e, "could not build geocode request"),
        }
    }

    fn select_point(model: &mut Model, caps: &Capabilities, lat: f64, lon: f64) {
        if !model.form_open {
            debug!("map interaction outside the form ignored");
            return;
        }
        match Coordinate::new(lat, lon) {
            Ok(point) => {
                let ticket = model.picker.select(point);
                Self::geocode(model, caps, point, ticket);
            }
            Err(e) => warn!(error = %e, "ignoring invalid map position"),
        }
    }

    fn handle_located(
        model: &mut Model,
        caps: &Capabilities,
        ticket: Ticket,
        result: LocationResult,
    ) {
        let result = result.and_then(|position| {
            Coordinate::new(position.latitude, position.longitude)
                .map_err(|_| LocationError::Unavailable)
        });

        match result {
            Ok(point) => match model.picker.apply_fix(ticket, point) {
                Some(geocode_ticket) => {
                    model.show_toast(model.strings().loc_found, ToastKind::Success);
                    Self::geocode(model, caps, point, geocode_ticket);
                }
                None => debug!(ticket, "discarding stale GPS fix"),
            },
            Err(e) => {
                if !model.picker.fail_locate(ticket) {
                    debug!(ticket, "discarding stale GPS error");
                    return;
                }
                let error = AppError::from(e);
                warn!(error = %error, "GPS lookup failed");
                let text = if error.kind == ErrorKind::LocationPermissionDenied {
                    model.strings().location_denied
                } else {
                    model.strings().location_unavailable
                };
                model.show_toast(text, ToastKind::Warning);
            }
        }
    }

    fn submit(model: &mut Model, caps: &Capabilities) {
        if model.submitting {
            debug!("submit already in flight");
            return;
        }

        let payload = match model.form.validate(model.picker.point()) {
            Ok(payload) => payload,
            Err(e) => {
                debug!(error = %e, "form rejected");
                let text = model.strings().form_error(&e);
                model.show_alert(text, AlertKind::Error);
                return;
            }
        };

        let Some(config) = model.config.as_ref() else {
            warn!("submit before start");
            return;
        };

        match store::insert(&caps.http, config, &payload) {
            Ok(builder) => {
                info!(
                    district = %payload.district,
                    severity = %payload.severity,
                    "submitting aid request"
                );
                model.submitting = true;
                builder.send(|result| Event::SubmitResponse(Box::new(result)));
            }
            Err(e) => model.show_error(&e),
        }
    }

    fn open_verification(model: &mut Model, id: &RequestId) {
        let result = model
            .sync
            .find(id)
            .ok_or_else(|| TransitionError::UnknownRequest(id.clone()))
            .and_then(|request| model.verification.open(request));

        match result {
            Ok(()) => {}
            Err(TransitionError::NotAllowed { .. }) => {
                model.show_alert(model.strings().already_completed, AlertKind::Info);
            }
            Err(e @ TransitionError::UnknownRequest(_)) => {
                warn!(error = %e, "mark helped for unknown request");
            }
        }
    }

    fn submit_verification(model: &mut Model, caps: &Capabilities) {
        let id = match model.verification.check() {
            Ok(id) => id,
            Err(VerificationError::IncorrectCode) => {
                model.show_alert(model.strings().incorrect_code, AlertKind::Error);
                return;
            }
            Err(e) => {
                debug!(error = %e, "verification submit ignored");
                return;
            }
        };

        let Some(config) = model.config.as_ref() else {
            return;
        };

        match store::mark_completed(&caps.http, config, &id) {
            Ok(builder) => {
                info!(id = %id, "marking request as helped");
                model.verification.begin_submit();
                builder.send(move |result| Event::CompletionResponse {
                    id,
                    result: Box::new(result),
                });
            }
            Err(e) => model.verification.fail(e.user_facing_message()),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user = event.is_user_initiated(),
            "handling event"
        );

        match event {
            Event::AppStarted(config) => {
                if let Err(e) = config.validate() {
                    warn!(error = %e, "rejected configuration");
                    model.show_error(&AppError::from(e));
                    caps.render.render();
                    return;
                }
                if model.sync.stop() {
                    if let Some(previous) = model.config.as_ref() {
                        caps.realtime.unsubscribe(previous.realtime_channel.clone());
                    }
                }

                model.sync.begin_subscribe();
                caps.realtime.subscribe(
                    config.realtime_channel.clone(),
                    config.store.schema.clone(),
                    config.store.table.clone(),
                    Event::ChangeFeed,
                );
                model.config = Some(*config);
                Self::fetch_requests(model, caps);
                caps.render.render();
            }

            Event::AppStopped => {
                if model.sync.stop() {
                    if let Some(config) = model.config.as_ref() {
                        caps.realtime.unsubscribe(config.realtime_channel.clone());
                    }
                }
                caps.render.render();
            }

            Event::ToggleLanguage => {
                model.language = model.language.toggle();
                caps.render.render();
            }

            Event::OpenForm => {
                model.form_open = true;
                caps.render.render();
            }

            Event::CloseForm => {
                model.form_open = false;
                model.picker.cancel_pending();
                caps.render.render();
            }

            Event::FormFieldChanged { field, value } => {
                if let Err(e) = model.form.set_field(field, value) {
                    warn!(error = %e, "ignoring form input");
                }
                caps.render.render();
            }

            Event::MapClicked { lat, lon } | Event::MarkerDragged { lat, lon } => {
                Self::select_point(model, caps, lat, lon);
                caps.render.render();
            }

            Event::LocateRequested => {
                if !model.form_open {
                    debug!("locate outside the form ignored");
                    return;
                }
                let ticket = model.picker.begin_locate();
                caps.geolocation
                    .current_position(move |result| Event::Located { ticket, result });
                caps.render.render();
            }

            Event::Located { ticket, result } => {
                Self::handle_located(model, caps, ticket, result);
                caps.render.render();
            }

            Event::DistrictGeocoded { ticket, result } => {
                if !model.picker.is_current_geocode(ticket) {
                    debug!(ticket, "discarding stale geocode");
                    return;
                }
                match geocode::resolve_district(*result) {
                    Ok(district) => {
                        model.form.district = district;
                        caps.render.render();
                    }
                    Err(e) => debug!(error = %e, "district not detected"),
                }
            }

            Event::SubmitRequested => {
                Self::submit(model, caps);
                caps.render.render();
            }

            Event::SubmitResponse(result) => {
                model.submitting = false;
                match store::expect_success(*result) {
                    Ok(()) => {
                        info!("aid request stored");
                        model.show_alert(model.strings().request_added, AlertKind::Success);
                        model.form_open = false;
                        model.form.reset();
                        model.picker.clear();
                    }
                    Err(e) => {
                        warn!(error = %e, "storing aid request failed");
                        model.show_error(&e);
                    }
                }
                caps.render.render();
            }

            Event::RequestsFetched { seq, result } => {
                model.sync.apply(seq, store::read_requests(*result));
                caps.render.render();
            }

            Event::ChangeFeed(output) => {
                if model.sync.on_realtime(output) {
                    Self::fetch_requests(model, caps);
                }
                caps.render.render();
            }

            Event::MarkHelpedRequested { id } => {
                Self::open_verification(model, &id);
                caps.render.render();
            }

            Event::VerificationInputChanged { value } => {
                model.verification.set_input(value);
                caps.render.render();
            }

            Event::VerificationCancelled => {
                model.verification.cancel();
                caps.render.render();
            }

            Event::VerificationSubmitted => {
                Self::submit_verification(model, caps);
                caps.render.render();
            }

            Event::CompletionResponse { id, result } => {
                match store::expect_success(*result) {
                    Ok(()) => {
                        info!(id = %id, "request marked as helped");
                        model.sync.mark_completed(&id);
                        if model.verification.is_for(&id) {
                            model.verification.cancel();
                        }
                        model.show_alert(model.strings().status_updated, AlertKind::Success);
                    }
                    Err(e) => {
                        warn!(id = %id, error = %e, "marking request as helped failed");
                        if model.verification.is_for(&id) {
                            model.verification.fail(e.user_facing_message());
                        } else {
                            model.show_error(&e);
                        }
                    }
                }
                caps.render.render();
            }

            Event::CallRequested { id } => match model.sync.find(&id) {
                Some(request) => caps.launcher.dial(request.contact_number.clone()),
                None => warn!(id = %id, "call for unknown request"),
            },

            Event::NavigateRequested { id } => match model.sync.find(&id) {
                Some(request) => caps.launcher.open_url(request.directions_url()),
                None => warn!(id = %id, "directions for unknown request"),
            },

            Event::DismissAlert => {
                model.alert = None;
                caps.render.render();
            }

            Event::DismissToast => {
                model.toast = None;
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::build(model)
    }
}
