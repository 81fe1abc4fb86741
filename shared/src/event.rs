use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpResult, LocationResult, RealtimeOutput};
use crate::config::Config;
use crate::form::FormField;
use crate::location::Ticket;
use crate::model::RequestId;

/// Everything the core reacts to: user input forwarded by the shell, and the
/// results of effects it asked the shell to run. Large payloads are boxed to
/// keep the enum small. HTTP results only ever come from the core's own
/// requests, so they never cross the FFI boundary.
#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    // Lifecycle
    AppStarted(Box<Config>),
    AppStopped,

    ToggleLanguage,

    // Submission form
    OpenForm,
    CloseForm,
    FormFieldChanged {
        field: FormField,
        value: String,
    },
    MapClicked {
        lat: f64,
        lon: f64,
    },
    MarkerDragged {
        lat: f64,
        lon: f64,
    },
    LocateRequested,
    Located {
        ticket: Ticket,
        result: LocationResult,
    },
    #[serde(skip)]
    DistrictGeocoded {
        ticket: Ticket,
        result: Box<HttpResult>,
    },
    SubmitRequested,
    #[serde(skip)]
    SubmitResponse(Box<HttpResult>),

    // Data sync
    #[serde(skip)]
    RequestsFetched {
        seq: u64,
        result: Box<HttpResult>,
    },
    ChangeFeed(RealtimeOutput),

    // Verification
    MarkHelpedRequested {
        id: RequestId,
    },
    VerificationInputChanged {
        value: String,
    },
    VerificationCancelled,
    VerificationSubmitted,
    #[serde(skip)]
    CompletionResponse {
        id: RequestId,
        result: Box<HttpResult>,
    },

    // Marker popup
    CallRequested {
        id: RequestId,
    },
    NavigateRequested {
        id: RequestId,
    },

    DismissAlert,
    DismissToast,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted(_) => "app_started",
            Self::AppStopped => "app_stopped",
            Self::ToggleLanguage => "toggle_language",
            Self::OpenForm => "open_form",
            Self::CloseForm => "close_form",
            Self::FormFieldChanged { .. } => "form_field_changed",
            Self::MapClicked { .. } => "map_clicked",
            Self::MarkerDragged { .. } => "marker_dragged",
            Self::LocateRequested => "locate_requested",
            Self::Located { .. } => "located",
            Self::DistrictGeocoded { .. } => "district_geocoded",
            Self::SubmitRequested => "submit_requested",
            Self::SubmitResponse(_) => "submit_response",
            Self::RequestsFetched { .. } => "requests_fetched",
            Self::ChangeFeed(_) => "change_feed",
            Self::MarkHelpedRequested { .. } => "mark_helped_requested",
            Self::VerificationInputChanged { .. } => "verification_input_changed",
            Self::VerificationCancelled => "verification_cancelled",
            Self::VerificationSubmitted => "verification_submitted",
            Self::CompletionResponse { .. } => "completion_response",
            Self::CallRequested { .. } => "call_requested",
            Self::NavigateRequested { .. } => "navigate_requested",
            Self::DismissAlert => "dismiss_alert",
            Self::DismissToast => "dismiss_toast",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::ToggleLanguage
                | Self::OpenForm
                | Self::CloseForm
                | Self::FormFieldChanged { .. }
                | Self::MapClicked { .. }
                | Self::MarkerDragged { .. }
                | Self::LocateRequested
                | Self::SubmitRequested
                | Self::MarkHelpedRequested { .. }
                | Self::VerificationInputChanged { .. }
                | Self::VerificationCancelled
                | Self::VerificationSubmitted
                | Self::CallRequested { .. }
                | Self::NavigateRequested { .. }
                | Self::DismissAlert
                | Self::DismissToast
        )
    }
}
