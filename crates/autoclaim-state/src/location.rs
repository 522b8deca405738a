//! Map pin selection behind a trait so any map widget can drive it.

use autoclaim_protocol::{Location, DEFAULT_MAP_LAT, DEFAULT_MAP_LNG};

pub type PickCallback = Box<dyn Fn(&Location) + Send + Sync>;

/// Address shown before the user has dropped a pin.
pub const UNPICKED_ADDRESS: &str = "Tap map to select location";

pub trait LocationPicker {
    /// Move the marker without notifying listeners.
    fn set_marker(&mut self, lat: f64, lng: f64);

    /// Register a listener for user picks.
    fn on_location_pick(&mut self, callback: PickCallback);

    fn marker(&self) -> Option<&Location>;
}

/// `"<lat>, <lng>"` with six decimal places.
pub fn format_address(lat: f64, lng: f64) -> String {
    format!("{lat:.6}, {lng:.6}")
}

/// In-memory picker: a single pin, addressed by its coordinates.
pub struct PinDropPicker {
    center: (f64, f64),
    marker: Option<Location>,
    listeners: Vec<PickCallback>,
}

impl PinDropPicker {
    pub fn new() -> Self {
        Self::centered_at(DEFAULT_MAP_LAT, DEFAULT_MAP_LNG)
    }

    pub fn centered_at(lat: f64, lng: f64) -> Self {
        Self {
            center: (lat, lng),
            marker: None,
            listeners: Vec::new(),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }

    /// A user tap: move the pin and notify every listener.
    pub fn pick(&mut self, lat: f64, lng: f64) -> Location {
        self.set_marker(lat, lng);
        let location = Location {
            lat,
            lng,
            address: format_address(lat, lng),
        };
        tracing::debug!(lat, lng, "Location picked");
        for listener in &self.listeners {
            listener(&location);
        }
        location
    }

    pub fn address(&self) -> &str {
        self.marker
            .as_ref()
            .map(|m| m.address.as_str())
            .unwrap_or(UNPICKED_ADDRESS)
    }
}

impl Default for PinDropPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationPicker for PinDropPicker {
    fn set_marker(&mut self, lat: f64, lng: f64) {
        self.marker = Some(Location {
            lat,
            lng,
            address: format_address(lat, lng),
        });
    }

    fn on_location_pick(&mut self, callback: PickCallback) {
        self.listeners.push(callback);
    }

    fn marker(&self) -> Option<&Location> {
        self.marker.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn address_has_six_decimals() {
        assert_eq!(format_address(2.861422, 101.675189), "2.861422, 101.675189");
        assert_eq!(format_address(3.1, 101.0), "3.100000, 101.000000");
    }

    #[test]
    fn pick_notifies_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut picker = PinDropPicker::new();
        picker.on_location_pick(Box::new(move |loc| {
            sink.lock().unwrap().push(loc.address.clone());
        }));

        assert_eq!(picker.address(), UNPICKED_ADDRESS);
        picker.pick(3.0738, 101.6065);
        assert_eq!(picker.address(), "3.073800, 101.606500");
        assert_eq!(seen.lock().unwrap().as_slice(), ["3.073800, 101.606500"]);
    }

    #[test]
    fn set_marker_is_silent() {
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();
        let mut picker = PinDropPicker::new();
        picker.on_location_pick(Box::new(move |_| *sink.lock().unwrap() += 1));
        picker.set_marker(1.0, 2.0);
        assert_eq!(*seen.lock().unwrap(), 0);
        assert!(picker.marker().is_some());
    }
}
