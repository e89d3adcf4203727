use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::Input;
use esp_idf_hal::gpio::InputPin;
use esp_idf_hal::gpio::Output;
use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::gpio::Pull;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_sys::esp_timer_get_time;
use esp_idf_sys::EspError;

use log::*;

use crate::hardware::Hardware;
use crate::hardware::Level;

/// Trigger and echo pins of an HC-SR04 style transducer on ESP-IDF. The
/// echo pin must be a full GPIO so its pulls can be switched off.
pub struct EspHardware<'d, T: OutputPin, E: InputPin + OutputPin> {
    trigger: PinDriver<'d, T, Output>,
    echo: PinDriver<'d, E, Input>,
}

impl<'d, T: OutputPin, E: InputPin + OutputPin> EspHardware<'d, T, E> {
    pub fn new(
        trigger: impl Peripheral<P = T> + 'd,
        echo: impl Peripheral<P = E> + 'd,
    ) -> Result<Self, EspError> {
        let mut trigger = PinDriver::output(trigger)?;
        let mut echo = PinDriver::input(echo)?;
        echo.set_pull(Pull::Floating)?;
        trigger.set_low()?;
        info!(
            "ultrasonic: trigger=gpio{} echo=gpio{}",
            trigger.pin(),
            echo.pin()
        );
        Ok(EspHardware { trigger, echo })
    }
}

impl<'d, T: OutputPin, E: InputPin + OutputPin> Hardware for EspHardware<'d, T, E> {
    fn set_output_level(&mut self, level: Level) {
        let result = match level {
            Level::High => self.trigger.set_high(),
            Level::Low => self.trigger.set_low(),
        };
        // a trigger that never fires shows up as a timeout
        if let Err(e) = result {
            warn!("failed to set trigger {level:?}: {e}");
        }
    }

    fn get_input_level(&mut self) -> Level {
        self.echo.is_high().into()
    }

    fn now_micros(&mut self) -> i64 {
        unsafe { esp_timer_get_time() }
    }

    fn delay_micros(&mut self, us: u32) {
        Ets::delay_us(us);
    }
}
