//! Single-point location picker.
//!
//! The point can be set three ways: a map tap, a marker drag, or a GPS fix.
//! GPS lookups and reverse-geocode lookups are both asynchronous, so each one
//! is issued with a ticket and its answer is only honoured while the ticket
//! is still the latest one:
//!
//! * a tap or drag after a GPS request invalidates that request;
//! * only the newest reverse-geocode answer may change the district.

use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

pub type Ticket = u64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPicker {
    point: Option<Coordinate>,
    locate_seq: Ticket,
    geocode_seq: Ticket,
    locating: bool,
    /// Where the map should fly after a GPS fix.
    fly_to: Option<Coordinate>,
}

impl LocationPicker {
    #[must_use]
    pub const fn point(&self) -> Option<Coordinate> {
        self.point
    }

    #[must_use]
    pub const fn is_locating(&self) -> bool {
        self.locating
    }

    #[must_use]
    pub const fn fly_to(&self) -> Option<Coordinate> {
        self.fly_to
    }

    /// Direct map interaction. Replaces the point, cancels any pending GPS
    /// lookup and returns the ticket for the follow-up geocode.
    pub fn select(&mut self, point: Coordinate) -> Ticket {
        self.locate_seq += 1;
        self.locating = false;
        self.place(point)
    }

    pub fn begin_locate(&mut self) -> Ticket {
        self.locate_seq += 1;
        self.locating = true;
        self.locate_seq
    }

    /// Applies a GPS fix if `ticket` is still current. Returns the geocode
    /// ticket on success, `None` for a stale fix.
    pub fn apply_fix(&mut self, ticket: Ticket, point: Coordinate) -> Option<Ticket> {
        if ticket != self.locate_seq {
            return None;
        }
        self.locating = false;
        let geocode = self.place(point);
        self.fly_to = Some(point);
        Some(geocode)
    }

    /// Ends a failed GPS lookup. Returns whether it was still current.
    pub fn fail_locate(&mut self, ticket: Ticket) -> bool {
        if ticket != self.locate_seq {
            return false;
        }
        self.locating = false;
        true
    }

    #[must_use]
    pub fn is_current_geocode(&self, ticket: Ticket) -> bool {
        ticket == self.geocode_seq
    }

    /// Invalidates outstanding GPS and geocode lookups but keeps the point.
    pub fn cancel_pending(&mut self) {
        self.locating = false;
        self.locate_seq += 1;
        self.geocode_seq += 1;
    }

    /// Drops the point. Counters keep climbing so late answers for the old
    /// point are still recognised as stale.
    pub fn clear(&mut self) {
        self.point = None;
        self.fly_to = None;
        self.locating = false;
        self.locate_seq += 1;
        self.geocode_seq += 1;
    }

    fn place(&mut self, point: Coordinate) -> Ticket {
        self.point = Some(point);
        self.geocode_seq += 1;
        self.geocode_seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_select_replaces_point() {
        let mut picker = LocationPicker::default();
        picker.select(at(7.0, 80.0));
        picker.select(at(8.0, 81.0));
        assert_eq!(picker.point(), Some(at(8.0, 81.0)));
        assert_eq!(picker.fly_to(), None);
    }

    #[test]
    fn test_only_latest_geocode_is_current() {
        let mut picker = LocationPicker::default();
        let first = picker.select(at(7.0, 80.0));
        let second = picker.select(at(7.1, 80.1));
        assert!(!picker.is_current_geocode(first));
        assert!(picker.is_current_geocode(second));
    }

    #[test]
    fn test_gps_fix_applies_and_flies() {
        let mut picker = LocationPicker::default();
        let ticket = picker.begin_locate();
        assert!(picker.is_locating());
        let geocode = picker.apply_fix(ticket, at(6.9, 79.9)).unwrap();
        assert!(picker.is_current_geocode(geocode));
        assert_eq!(picker.point(), Some(at(6.9, 79.9)));
        assert_eq!(picker.fly_to(), Some(at(6.9, 79.9)));
        assert!(!picker.is_locating());
    }

    #[test]
    fn test_map_tap_invalidates_pending_fix() {
        let mut picker = LocationPicker::default();
        let ticket = picker.begin_locate();
        picker.select(at(8.0, 81.0));
        assert_eq!(picker.apply_fix(ticket, at(6.9, 79.9)), None);
        assert_eq!(picker.point(), Some(at(8.0, 81.0)));
        assert!(!picker.fail_locate(ticket));
    }

    #[test]
    fn test_clear_invalidates_outstanding_tickets() {
        let mut picker = LocationPicker::default();
        let geocode = picker.select(at(7.0, 80.0));
        let locate = picker.begin_locate();
        picker.clear();
        assert_eq!(picker.point(), None);
        assert!(!picker.is_current_geocode(geocode));
        assert_eq!(picker.apply_fix(locate, at(7.0, 80.0)), None);
    }

    #[test]
    fn test_cancel_pending_keeps_point() {
        let mut picker = LocationPicker::default();
        let geocode = picker.select(at(7.0, 80.0));
        let locate = picker.begin_locate();
        picker.cancel_pending();
        assert!(!picker.is_locating());
        assert!(!picker.is_current_geocode(geocode));
        assert_eq!(picker.apply_fix(locate, at(6.9, 79.9)), None);
        assert_eq!(picker.point(), Some(at(7.0, 80.0)));
    }
}
