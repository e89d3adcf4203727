use log::*;

use crate::Distance;
use crate::UltrasonicError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Ok,
    // consecutive timeouts, still below the fault threshold
    Degraded(u32),
    // consecutive timeouts, at or above the fault threshold
    Faulty(u32),
}

/// Counts consecutive timeouts so a control loop can decide when a silent
/// sensor is more likely disconnected than just looking at empty space.
#[derive(Debug, Clone)]
pub struct Monitor {
    threshold: u32,
    timeouts: u32,
}

impl Monitor {
    pub fn new(threshold: u32) -> Self {
        Monitor {
            threshold: threshold.max(1),
            timeouts: 0,
        }
    }

    pub fn record(&mut self, reading: &Result<Distance, UltrasonicError>) -> Health {
        match reading {
            Ok(_) => {
                if self.timeouts >= self.threshold {
                    info!("ultrasonic: recovered after {} timeouts", self.timeouts);
                }
                self.timeouts = 0;
                Health::Ok
            }
            Err(UltrasonicError::Timeout) => {
                self.timeouts = self.timeouts.saturating_add(1);
                if self.timeouts < self.threshold {
                    return Health::Degraded(self.timeouts);
                }
                if self.timeouts == self.threshold {
                    warn!(
                        "ultrasonic: {} consecutive timeouts, sensor may be disconnected",
                        self.timeouts
                    );
                }
                Health::Faulty(self.timeouts)
            }
        }
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts
    }
}
