use std::fmt;
use std::fmt::Display;

use log::*;
use serde::Deserialize;

#[cfg(target_os = "espidf")]
pub use crate::esp::EspHardware;
pub use crate::hardware::Hardware;
pub use crate::hardware::Level;
pub use crate::monitor::Health;
pub use crate::monitor::Monitor;

#[cfg(target_os = "espidf")]
mod esp;
mod hardware;
mod monitor;
#[cfg(test)]
mod sim;

/// 343 m/s at room temperature
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// width of the trigger pulse
    pub pulse_width_us: u32,
    /// how long each edge of the echo is waited for
    pub timeout_us: u32,
}

impl Config {
    pub const DEFAULT: Config = Config {
        pulse_width_us: 10,
        timeout_us: 30_000,
    };
}

impl Default for Config {
    fn default() -> Self {
        Config::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Distance {
    centimeters: f32,
}

impl Distance {
    /// Distance to the object for an echo lasting `duration_us`, which
    /// covers the way there and back.
    pub fn from_micros(duration_us: u32) -> Self {
        Distance {
            centimeters: (duration_us as f32 * SPEED_OF_SOUND_CM_PER_US) / 2.0,
        }
    }

    pub fn centimeters(&self) -> f32 {
        self.centimeters
    }

    pub fn millimeters(&self) -> u16 {
        (self.centimeters * 10.0).round() as u16
    }
}

impl Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} cm", self.centimeters)
    }
}

/// Trigger/echo ranger such as the HC-SR04.
pub struct Ultrasonic<H: Hardware> {
    hardware: H,
    config: Config,
}

impl<H: Hardware> Ultrasonic<H> {
    pub fn new(hardware: H, config: Config) -> Self {
        Ultrasonic { hardware, config }
    }

    /// Fire one trigger pulse and time the echo. Busy waits for at most two
    /// timeout windows.
    pub fn measure_once(&mut self) -> Result<Distance, UltrasonicError> {
        self.hardware.set_output_level(Level::Low);
        self.hardware.set_output_level(Level::High);
        self.hardware.delay_micros(self.config.pulse_width_us);
        self.hardware.set_output_level(Level::Low);

        let triggered = self.hardware.now_micros();
        let start = self.wait_for(Level::High, triggered).map_err(|e| {
            trace!("ultrasonic: no echo");
            e
        })?;
        let end = self.wait_for(Level::Low, start).map_err(|e| {
            trace!("ultrasonic: echo never ended");
            e
        })?;

        // a clock running backwards gives a negative duration
        let duration = u32::try_from(end - start).map_err(|_| UltrasonicError::Timeout)?;
        trace!("ultrasonic: echo {duration}us");
        Ok(Distance::from_micros(duration))
    }

    // poll the echo until it reads `level`, returns when it did
    fn wait_for(&mut self, level: Level, since: i64) -> Result<i64, UltrasonicError> {
        let timeout = self.config.timeout_us as i64;
        loop {
            if self.hardware.get_input_level() == level {
                return Ok(self.hardware.now_micros());
            }
            let elapsed = self.hardware.now_micros() - since;
            if !(0..=timeout).contains(&elapsed) {
                return Err(UltrasonicError::Timeout);
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn into_inner(self) -> H {
        self.hardware
    }
}

/// Out of range, no sensor and a broken sensor all look the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UltrasonicError {
    Timeout,
}

impl Display for UltrasonicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for UltrasonicError {}
