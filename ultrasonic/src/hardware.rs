#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        match high {
            true => Level::High,
            false => Level::Low,
        }
    }
}

/// The pins and timing an ultrasonic transducer is driven with. An
/// implementation owns exactly one trigger output and one echo input.
pub trait Hardware {
    // drive the trigger output
    fn set_output_level(&mut self, level: Level);
    // sample the echo input
    fn get_input_level(&mut self) -> Level;
    // monotonic clock in microseconds
    fn now_micros(&mut self) -> i64;
    // busy wait, used for the trigger pulse
    fn delay_micros(&mut self, us: u32);
}
