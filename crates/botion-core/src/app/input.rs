use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::domain::entity::ButtonEvent;

/// Turns an active-low push button into one event per press.
///
/// A press is reported on the first poll that sees the line low; the line
/// must be seen high again before the next press counts.
pub struct InputMonitor<P: InputPin> {
    pin: P,
    latched: bool,
}

impl<P: InputPin> InputMonitor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, latched: false }
    }

    pub fn poll(&mut self) -> ButtonEvent {
        let pressed = match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("input: pin read failed: {:?}", e);
                false
            }
        };

        match (pressed, self.latched) {
            (true, false) => {
                self.latched = true;
                debug!("input: pressed");
                ButtonEvent::Pressed
            }
            (false, true) => {
                self.latched = false;
                ButtonEvent::Idle
            }
            _ => ButtonEvent::Idle,
        }
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }
}
