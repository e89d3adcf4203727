#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
mod config;
#[cfg(target_os = "espidf")]
mod device;

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    device::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("ultrasonic-example only runs on an esp-idf target");
}
