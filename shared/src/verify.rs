//! Rescuer confirmation before a request is marked as helped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AidRequest, RequestId, RequestStatus, TransitionError};

pub const VERIFICATION_CODE: &str = "SAVED";

/// Case-insensitive, but otherwise exact: no trimming, no prefixes.
#[must_use]
pub fn code_matches(input: &str) -> bool {
    input.to_uppercase() == VERIFICATION_CODE
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerificationError {
    #[error("incorrect verification code")]
    IncorrectCode,
    #[error("no request is awaiting verification")]
    NotOpen,
    #[error("verification already submitted")]
    InFlight,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationGate {
    target: Option<RequestId>,
    input: String,
    in_flight: bool,
    error: Option<String>,
}

impl VerificationGate {
    /// Opens the gate for `request`. Completed requests cannot be completed
    /// again, so they are turned away here.
    pub fn open(&mut self, request: &AidRequest) -> Result<(), TransitionError> {
        request.status.validate_transition(RequestStatus::Completed)?;
        *self = Self {
            target: Some(request.id.clone()),
            ..Self::default()
        };
        Ok(())
    }

    pub fn set_input(&mut self, value: String) {
        self.input = value;
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Returns the request to complete when the typed code matches.
    /// Never changes state.
    pub fn check(&self) -> Result<RequestId, VerificationError> {
        let target = self.target.as_ref().ok_or(VerificationError::NotOpen)?;
        if self.in_flight {
            return Err(VerificationError::InFlight);
        }
        if !code_matches(&self.input) {
            return Err(VerificationError::IncorrectCode);
        }
        Ok(target.clone())
    }

    pub fn begin_submit(&mut self) {
        self.in_flight = true;
        self.error = None;
    }

    /// Keeps the gate open so the rescuer can retry.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.in_flight = false;
        self.error = Some(message.into());
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn is_for(&self, id: &RequestId) -> bool {
        self.target.as_ref() == Some(id)
    }

    #[must_use]
    pub fn target(&self) -> Option<&RequestId> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
