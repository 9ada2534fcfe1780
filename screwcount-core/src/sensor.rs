//! Proximity sensor reading
//!
//! The sensor is active-low: the pin idles high and drops low while a screw
//! passes. There is no debouncing here; the session machine pauses after
//! each counted pulse instead.

use screwcount_hal::InputPin;

/// How a low level turns into a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseMode {
    /// Every poll that reads low is a pulse
    #[default]
    Level,
    /// Only a high-to-low transition is a pulse
    Edge,
}

/// Wraps the sensor input pin
pub struct SensorReader<P> {
    pin: P,
    mode: PulseMode,
    last_high: bool,
}

impl<P: InputPin> SensorReader<P> {
    pub fn new(pin: P, mode: PulseMode) -> Self {
        Self {
            pin,
            mode,
            last_high: true,
        }
    }

    /// Current raw level: `true` is idle (high), `false` is triggered (low)
    pub fn read(&self) -> bool {
        self.pin.is_high()
    }

    /// Sample the pin and report whether this poll is a pulse
    pub fn pulse(&mut self) -> bool {
        let high = self.read();
        let pulse = match self.mode {
            PulseMode::Level => !high,
            PulseMode::Edge => self.last_high && !high,
        };
        self.last_high = high;
        pulse
    }

    pub fn mode(&self) -> PulseMode {
        self.mode
    }
}
