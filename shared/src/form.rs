use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Coordinate, District, NewAidRequest, Severity};
use crate::{MAX_CONTACT_DIGITS, MAX_NAME_CHARS, MAX_NEEDS_CHARS, MAX_TOWN_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    ContactNumber,
    Needs,
    District,
    Town,
    Severity,
}

impl FormField {
    /// Character limit for free-text fields.
    #[must_use]
    pub const fn max_chars(self) -> Option<usize> {
        match self {
            Self::Name => Some(MAX_NAME_CHARS),
            Self::ContactNumber => Some(MAX_CONTACT_DIGITS),
            Self::Needs => Some(MAX_NEEDS_CHARS),
            Self::Town => Some(MAX_TOWN_CHARS),
            Self::District | Self::Severity => None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0:?} is required")]
    Missing(FormField),

    #[error("{field:?} exceeds {max} characters")]
    TooLong { field: FormField, max: usize },

    #[error("contact number must contain digits only")]
    InvalidContactNumber,

    #[error("unknown district: {0}")]
    UnknownDistrict(String),

    #[error("unknown severity: {0}")]
    UnknownSeverity(String),

    #[error("no location selected")]
    MissingLocation,
}

impl FormError {
    /// Field the error refers to. A missing location is reported against no
    /// text field, so it maps to the closest one on screen.
    #[must_use]
    pub const fn field(&self) -> FormField {
        match self {
            Self::Missing(field) | Self::TooLong { field, .. } => *field,
            Self::InvalidContactNumber => FormField::ContactNumber,
            Self::UnknownDistrict(_) | Self::MissingLocation => FormField::District,
            Self::UnknownSeverity(_) => FormField::Severity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestForm {
    pub name: String,
    pub contact_number: String,
    pub needs: String,
    pub district: District,
    pub town: String,
    pub severity: Severity,
}

impl RequestForm {
    /// Stores raw input for one field. Text is kept exactly as typed;
    /// trimming and limits apply at [`RequestForm::validate`].
    pub fn set_field(&mut self, field: FormField, value: String) -> Result<(), FormError> {
        match field {
            FormField::Name => self.name = value,
            FormField::ContactNumber => self.contact_number = value,
            FormField::Needs => self.needs = value,
            FormField::Town => self.town = value,
            FormField::District => {
                self.district =
                    District::from_name(&value).ok_or(FormError::UnknownDistrict(value))?;
            }
            FormField::Severity => {
                self.severity = Severity::parse(&value).ok_or(FormError::UnknownSeverity(value))?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::ContactNumber => &self.contact_number,
            FormField::Needs => &self.needs,
            FormField::Town => &self.town,
            FormField::District => self.district.name(),
            FormField::Severity => self.severity.as_str(),
        }
    }

    /// Checks every field in screen order and returns the insert payload,
    /// or the first problem found.
    pub fn validate(&self, point: Option<Coordinate>) -> Result<NewAidRequest, FormError> {
        let name = required_text(FormField::Name, &self.name)?;
        let contact_number = required_text(FormField::ContactNumber, &self.contact_number)?;
        if !contact_number.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::InvalidContactNumber);
        }
        let needs = required_text(FormField::Needs, &self.needs)?;
        let town = required_text(FormField::Town, &self.town)?;
        let point = point.ok_or(FormError::MissingLocation)?;

        Ok(NewAidRequest::new(
            name.to_string(),
            contact_number.to_string(),
            needs.to_string(),
            self.district,
            town.to_string(),
            self.severity,
            point,
        ))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn required_text(field: FormField, raw: &str) -> Result<&str, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::Missing(field));
    }
    if let Some(max) = field.max_chars() {
        if value.chars().count() > max {
            return Err(FormError::TooLong { field, max });
        }
    }
    Ok(value)
}
