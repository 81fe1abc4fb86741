//! Two-language label tables.
//!
//! Every label the view shows comes from a single [`Strings`] table selected
//! by the current [`Language`], so a toggle swaps all of them at once.

use serde::{Deserialize, Serialize};

use crate::form::{FormError, FormField};
use crate::model::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Sinhala,
}

impl Language {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::English => Self::Sinhala,
            Self::Sinhala => Self::English,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Strings {
    pub title: &'static str,
    pub request_btn: &'static str,
    pub form_title: &'static str,
    pub name: &'static str,
    pub phone: &'static str,
    pub district: &'static str,
    pub town: &'static str,
    pub needs: &'static str,
    pub needs_placeholder: &'static str,
    pub severity: &'static str,
    pub sev_critical: &'static str,
    pub sev_moderate: &'static str,
    pub sev_low: &'static str,
    pub loc_label: &'static str,
    pub loc_desc: &'static str,
    pub submit: &'static str,
    pub cancel: &'static str,
    pub mark_helped: &'static str,
    pub verify_title: &'static str,
    pub verify_desc: &'static str,
    pub confirm: &'static str,
    /// Label of the language switch, written in the *other* language.
    pub language: &'static str,
    pub status_updated: &'static str,
    pub request_added: &'static str,
    pub get_gps: &'static str,
    pub nav_google: &'static str,
    pub loc_found: &'static str,
    pub call: &'static str,
    pub select_location: &'static str,
    pub incorrect_code: &'static str,
    pub already_completed: &'static str,
    pub location_denied: &'static str,
    pub location_unavailable: &'static str,
    pub stats_active: &'static str,
    pub stats_completed: &'static str,
    pub sync_failed: &'static str,
    pub live_paused: &'static str,
    pub required: &'static str,
    pub too_long: &'static str,
    pub invalid_phone: &'static str,
}

pub static EN: Strings = Strings {
    title: "SL Flood Relief",
    request_btn: "Request Help",
    form_title: "Request Help",
    name: "Your Name",
    phone: "Mobile Number",
    district: "District",
    town: "Town / Village",
    needs: "What is needed?",
    needs_placeholder: "Ex: Food, Boat, Medicine...",
    severity: "Severity",
    sev_critical: "Critical (Life Threatening)",
    sev_moderate: "Moderate (Trapped/Need Food)",
    sev_low: "Low (Property Damage)",
    loc_label: "Set Location",
    loc_desc: "Tap 'GPS' or Drag marker",
    submit: "Submit Request",
    cancel: "Cancel",
    mark_helped: "Mark as Helped",
    verify_title: "Verification",
    verify_desc: "Type 'SAVED' to complete:",
    confirm: "Confirm",
    language: "සිංහල",
    status_updated: "Status Updated!",
    request_added: "Request Added!",
    get_gps: "Use My GPS",
    nav_google: "Open in Maps",
    loc_found: "Location Found!",
    call: "Call",
    select_location: "Please select location on map",
    incorrect_code: "Incorrect code",
    already_completed: "This request has already been marked as helped",
    location_denied: "Location permission denied",
    location_unavailable: "Could not find your location",
    stats_active: "Active",
    stats_completed: "Helped",
    sync_failed: "Could not load the latest requests",
    live_paused: "Live updates paused",
    required: "is required",
    too_long: "is too long, maximum characters:",
    invalid_phone: "Mobile number must be digits only (up to 10)",
};

pub static SI: Strings = Strings {
    title: "ගංවතුර සහන",
    request_btn: "ආධාර ඉල්ලන්න",
    form_title: "ආධාර ඉල්ලුම් පත්‍රය",
    name: "ඔබගේ නම",
    phone: "දුරකථන අංකය",
    district: "දිස්ත්‍රික්කය",
    town: "නගරය / ගම්මානය",
    needs: "අවශ්‍ය දේ",
    needs_placeholder: "උදා: ආහාර, බෝට්ටු, බෙහෙත්...",
    severity: "තත්වයේ බරපතලකම",
    sev_critical: "අතිශය බරපතල (ජීවිත අවදානම්)",
    sev_moderate: "බරපතල (ආහාර/ජලය අවශ්‍ය)",
    sev_low: "සාමාන්‍ය (දේපල හානි)",
    loc_label: "ස්ථානය",
    loc_desc: "'GPS' ඔබන්න හෝ සලකුණ අදින්න",
    submit: "ඉල්ලීම යොමු කරන්න",
    cancel: "එපා",
    mark_helped: "උදව් ලැබුණි",
    verify_title: "තහවුරු කිරීම",
    verify_desc: "'SAVED' ලෙස ටයිප් කරන්න:",
    confirm: "තහවුරු කරන්න",
    language: "English",
    status_updated: "තත්වය යාවත්කාලීන කරන ලදී!",
    request_added: "ඉල්ලීම ඇතුලත් කරන ලදී!",
    get_gps: "මගේ ස්ථානය (GPS)",
    nav_google: "Google Maps යන්න",
    loc_found: "ස්ථානය හමු විය!",
    call: "අමතන්න",
    select_location: "කරුණාකර සිතියමේ ස්ථානය තෝරන්න",
    incorrect_code: "කේතය වැරදියි",
    already_completed: "මෙම ඉල්ලීමට දැනටමත් උදව් ලැබී ඇත",
    location_denied: "ස්ථාන අවසරය ප්‍රතික්ෂේප විය",
    location_unavailable: "ඔබගේ ස්ථානය සොයාගත නොහැක",
    stats_active: "සක්‍රිය",
    stats_completed: "උදව් ලැබූ",
    sync_failed: "නවතම ඉල්ලීම් ලබා ගත නොහැකි විය",
    live_paused: "සජීවී යාවත්කාලීන කිරීම් නතර වී ඇත",
    required: "අවශ්‍යයි",
    too_long: "දිග වැඩියි, උපරිම අකුරු:",
    invalid_phone: "දුරකථන අංකයේ ඉලක්කම් පමණක් (උපරිම 10) තිබිය යුතුය",
};

#[must_use]
pub fn strings(language: Language) -> &'static Strings {
    match language {
        Language::English => &EN,
        Language::Sinhala => &SI,
    }
}

impl Strings {
    #[must_use]
    pub const fn severity_label(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Critical => self.sev_critical,
            Severity::Moderate => self.sev_moderate,
            Severity::Low => self.sev_low,
        }
    }

    #[must_use]
    pub const fn field_label(&self, field: FormField) -> &'static str {
        match field {
            FormField::Name => self.name,
            FormField::ContactNumber => self.phone,
            FormField::Needs => self.needs,
            FormField::District => self.district,
            FormField::Town => self.town,
            FormField::Severity => self.severity,
        }
    }

    /// Localised text for a rejected submission.
    #[must_use]
    pub fn form_error(&self, error: &FormError) -> String {
        match error {
            FormError::Missing(field) => format!("{} {}", self.field_label(*field), self.required),
            FormError::TooLong { field, max } => {
                format!("{} {} {max}", self.field_label(*field), self.too_long)
            }
            FormError::InvalidContactNumber => self.invalid_phone.to_string(),
            FormError::UnknownDistrict(_) | FormError::UnknownSeverity(_) => {
                format!("{} {}", self.field_label(error.field()), self.required)
            }
            FormError::MissingLocation => self.select_location.to_string(),
        }
    }
}
