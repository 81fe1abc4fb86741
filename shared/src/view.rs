use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::app::{Alert, AlertKind, Model, ToastKind, ToastMessage};
use crate::form::FormField;
use crate::i18n::{Language, Strings};
use crate::model::{AidRequest, District, MarkerColor, RequestId, Severity};
use crate::stats::RequestStats;
use crate::{
    DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, LOCATED_ZOOM, MAP_BOUNDS, MIN_MAP_ZOOM, PICKER_MAP_ZOOM,
    TILE_ATTRIBUTION, TILE_URL_TEMPLATE,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub language: Language,
    /// Label of the language switch button.
    pub language_toggle: String,
    pub title: String,
    pub request_button: String,
    pub map: MapView,
    pub markers: Vec<MarkerView>,
    pub stats: StatsView,
    pub form: Option<FormView>,
    pub verification: Option<VerificationView>,
    pub alert: Option<AlertView>,
    pub toast: Option<ToastView>,
    /// Non-blocking notice about the data feed.
    pub sync_banner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    pub min_zoom: f64,
    /// `[[south, west], [north, east]]`
    pub bounds: [[f64; 2]; 2],
    pub tile_url: String,
    pub attribution: String,
}

impl MapView {
    fn main() -> Self {
        let [(south, west), (north, east)] = MAP_BOUNDS;
        Self {
            center_lat: DEFAULT_MAP_CENTER.0,
            center_lon: DEFAULT_MAP_CENTER.1,
            zoom: DEFAULT_MAP_ZOOM,
            min_zoom: MIN_MAP_ZOOM,
            bounds: [[south, west], [north, east]],
            tile_url: TILE_URL_TEMPLATE.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerView {
    pub id: RequestId,
    pub lat: f64,
    pub lon: f64,
    pub color: MarkerColor,
    pub severity: Severity,
    pub needs: String,
    pub name: String,
    /// `"<district> - <town>"`
    pub place: String,
    pub contact_number: String,
    pub call_label: String,
    pub dial_link: String,
    pub navigate_label: String,
    pub directions_url: String,
    pub mark_helped_label: String,
    /// RFC 3339 in UTC. The shell renders it in the device's local time.
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsView {
    pub active: usize,
    pub critical: usize,
    pub moderate: usize,
    pub low: usize,
    pub completed: usize,
    pub active_label: String,
    pub completed_label: String,
    pub critical_label: String,
    pub moderate_label: String,
    pub low_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextFieldView {
    pub field: FormField,
    pub label: String,
    pub value: String,
    pub placeholder: Option<String>,
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectView {
    pub field: FormField,
    pub label: String,
    pub selected: String,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickerView {
    pub label: String,
    pub hint: String,
    pub gps_label: String,
    pub locating: bool,
    pub selected_lat: Option<f64>,
    pub selected_lon: Option<f64>,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormView {
    pub title: String,
    pub name: TextFieldView,
    pub contact_number: TextFieldView,
    pub district: SelectView,
    pub town: TextFieldView,
    pub needs: TextFieldView,
    pub severity: SelectView,
    pub picker: PickerView,
    pub submit_label: String,
    pub cancel_label: String,
    pub submitting: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationView {
    pub request_id: RequestId,
    pub title: String,
    pub description: String,
    pub input: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertView {
    pub message: String,
    pub kind: AlertKind,
}

impl From<&Alert> for AlertView {
    fn from(a: &Alert) -> Self {
        Self {
            message: a.message.clone(),
            kind: a.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastView {
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&ToastMessage> for ToastView {
    fn from(t: &ToastMessage) -> Self {
        Self {
            message: t.message.clone(),
            kind: t.kind,
            duration_ms: t.duration_ms,
        }
    }
}

impl ViewModel {
    #[must_use]
    pub fn build(model: &Model) -> Self {
        let s = model.strings();
        let requests = model.sync.requests();

        let sync_banner = if model.sync.last_error().is_some() {
            Some(s.sync_failed.to_string())
        } else if model.sync.is_paused() {
            Some(s.live_paused.to_string())
        } else {
            None
        };

        Self {
            language: model.language,
            language_toggle: s.language.to_string(),
            title: s.title.to_string(),
            request_button: s.request_btn.to_string(),
            map: MapView::main(),
            markers: requests
                .iter()
                .filter(|r| r.is_active())
                .map(|r| marker(r, s))
                .collect(),
            stats: stats(&RequestStats::from_requests(requests), s),
            form: model.form_open.then(|| form(model, s)),
            verification: verification(model, s),
            alert: model.alert.as_ref().map(AlertView::from),
            toast: model.toast.as_ref().map(ToastView::from),
            sync_banner,
        }
    }
}

fn marker(request: &AidRequest, s: &Strings) -> MarkerView {
    MarkerView {
        id: request.id.clone(),
        lat: request.latitude,
        lon: request.longitude,
        color: request.severity.marker_color(),
        severity: request.severity,
        needs: request.needs.clone(),
        name: request.name.clone(),
        place: format!("{} - {}", request.district, request.town),
        contact_number: request.contact_number.clone(),
        call_label: s.call.to_string(),
        dial_link: request.dial_link(),
        navigate_label: s.nav_google.to_string(),
        directions_url: request.directions_url(),
        mark_helped_label: s.mark_helped.to_string(),
        created_at: request
            .created_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

fn stats(stats: &RequestStats, s: &Strings) -> StatsView {
    StatsView {
        active: stats.active,
        critical: stats.critical,
        moderate: stats.moderate,
        low: stats.low,
        completed: stats.completed,
        active_label: s.stats_active.to_string(),
        completed_label: s.stats_completed.to_string(),
        critical_label: s.sev_critical.to_string(),
        moderate_label: s.sev_moderate.to_string(),
        low_label: s.sev_low.to_string(),
    }
}

fn text_field(
    model: &Model,
    s: &Strings,
    field: FormField,
    placeholder: Option<&str>,
) -> TextFieldView {
    TextFieldView {
        field,
        label: s.field_label(field).to_string(),
        value: model.form.value(field).to_string(),
        placeholder: placeholder.map(str::to_string),
        max_chars: field.max_chars(),
    }
}

fn form(model: &Model, s: &Strings) -> FormView {
    let picker = &model.picker;
    let point = picker.point();
    let (center, zoom) = match picker.fly_to() {
        Some(target) => ((target.lat(), target.lon()), LOCATED_ZOOM),
        None => (DEFAULT_MAP_CENTER, PICKER_MAP_ZOOM),
    };

    FormView {
        title: s.form_title.to_string(),
        name: text_field(model, s, FormField::Name, None),
        contact_number: text_field(model, s, FormField::ContactNumber, None),
        district: SelectView {
            field: FormField::District,
            label: s.district.to_string(),
            selected: model.form.district.name().to_string(),
            options: District::ALL
                .iter()
                .map(|d| OptionView {
                    value: d.name().to_string(),
                    label: d.name().to_string(),
                })
                .collect(),
        },
        town: text_field(model, s, FormField::Town, None),
        needs: text_field(model, s, FormField::Needs, Some(s.needs_placeholder)),
        severity: SelectView {
            field: FormField::Severity,
            label: s.severity.to_string(),
            selected: model.form.severity.as_str().to_string(),
            options: Severity::ALL
                .iter()
                .map(|sev| OptionView {
                    value: sev.as_str().to_string(),
                    label: s.severity_label(*sev).to_string(),
                })
                .collect(),
        },
        picker: PickerView {
            label: s.loc_label.to_string(),
            hint: s.loc_desc.to_string(),
            gps_label: s.get_gps.to_string(),
            locating: picker.is_locating(),
            selected_lat: point.map(|p| p.lat()),
            selected_lon: point.map(|p| p.lon()),
            center_lat: center.0,
            center_lon: center.1,
            zoom,
        },
        submit_label: s.submit.to_string(),
        cancel_label: s.cancel.to_string(),
        submitting: model.submitting,
    }
}

fn verification(model: &Model, s: &Strings) -> Option<VerificationView> {
    let gate = &model.verification;
    gate.target().map(|id| VerificationView {
        request_id: id.clone(),
        title: s.verify_title.to_string(),
        description: s.verify_desc.to_string(),
        input: gate.input().to_string(),
        confirm_label: s.confirm.to_string(),
        cancel_label: s.cancel.to_string(),
        submitting: gate.in_flight(),
        error: gate.error().map(str::to_string),
    })
}
