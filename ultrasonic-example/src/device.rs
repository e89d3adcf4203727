use anyhow::Context;
use embedded_hal::delay::DelayUs;
use esp_idf_hal::delay::FreeRtos as delay;
use esp_idf_hal::prelude::*;
use esp_idf_sys::esp_vfs_spiffs_conf_t;
use esp_idf_sys::esp_vfs_spiffs_register;
use esp_idf_sys::{esp, EspError};
use log::*;

use ultrasonic::EspHardware;
use ultrasonic::Health;
use ultrasonic::Monitor;
use ultrasonic::Ultrasonic;

use crate::config::Config;

pub fn run() -> anyhow::Result<()> {
    esp_idf_sys::link_patches();
    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();
    info!("ultrasonic sensor starting");

    let config = match init_fs() {
        Ok(()) => Config::load_or_default("/spiffs/config.json"),
        Err(e) => {
            warn!("failed to mount SPIFFS: {e}, using defaults");
            Config::default()
        }
    };

    let peripherals = Peripherals::take().context("failed to take Peripherals")?;
    let pin_trigger = peripherals.pins.gpio18;
    let pin_echo = peripherals.pins.gpio19;

    let hardware = EspHardware::new(pin_trigger, pin_echo).context("configure ultrasonic pins")?;
    let mut sensor = Ultrasonic::new(hardware, config.sensor);
    let mut monitor = Monitor::new(config.fault_threshold);

    loop {
        let reading = sensor.measure_once();
        match (&reading, monitor.record(&reading)) {
            (Ok(distance), _) => info!("Distance: {distance}"),
            (Err(_), Health::Faulty(count)) => {
                info!("Measurement timeout or error ({count} in a row)")
            }
            (Err(_), _) => info!("Measurement timeout or error"),
        }
        delay.delay_ms(config.interval_ms);
    }
}

fn init_fs() -> Result<(), EspError> {
    info!("configuring SPIFFS");
    let spiffs_config = esp_vfs_spiffs_conf_t {
        base_path: "/spiffs\0".as_ptr() as *const _,
        partition_label: std::ptr::null(),
        max_files: 5,
        format_if_mount_failed: false,
    };
    esp!(unsafe { esp_vfs_spiffs_register(&spiffs_config) })
}
