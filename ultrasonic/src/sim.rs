use std::collections::VecDeque;

use crate::hardware::Hardware;
use crate::hardware::Level;

enum Echo {
    // high while rise_at <= now < fall_at
    Pulse {
        rise_at: Option<i64>,
        fall_at: Option<i64>,
    },
    // each sample moves the clock to its timestamp, the last level holds afterwards
    Script {
        samples: VecDeque<(i64, Level)>,
        last: Level,
    },
}

/// Simulated transducer. Every echo sample advances the clock by `step`
/// microseconds (or to the next scripted timestamp).
pub struct SimHardware {
    now: i64,
    step: i64,
    echo: Echo,
    trigger: Level,
    transitions: Vec<(i64, Level)>,
}

impl SimHardware {
    fn with_echo(echo: Echo) -> Self {
        SimHardware {
            now: 0,
            step: 1,
            echo,
            trigger: Level::Low,
            transitions: Vec::new(),
        }
    }

    pub fn pulse(rise_at: i64, fall_at: i64) -> Self {
        Self::with_echo(Echo::Pulse {
            rise_at: Some(rise_at),
            fall_at: Some(fall_at),
        })
    }

    pub fn silent() -> Self {
        Self::with_echo(Echo::Pulse {
            rise_at: None,
            fall_at: None,
        })
    }

    pub fn stuck_high(rise_at: i64) -> Self {
        Self::with_echo(Echo::Pulse {
            rise_at: Some(rise_at),
            fall_at: None,
        })
    }

    pub fn scripted(samples: &[(i64, Level)]) -> Self {
        Self::with_echo(Echo::Script {
            samples: samples.iter().copied().collect(),
            last: Level::Low,
        })
    }

    pub fn with_step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn with_trigger(mut self, level: Level) -> Self {
        self.trigger = level;
        self
    }

    /// Answer the next trigger with an echo starting `after` us from now,
    /// lasting `width` us (or forever).
    pub fn respond(&mut self, after: i64, width: Option<i64>) {
        let rise_at = self.now + after;
        self.echo = Echo::Pulse {
            rise_at: Some(rise_at),
            fall_at: width.map(|w| rise_at + w),
        };
    }

    pub fn ignore(&mut self) {
        self.echo = Echo::Pulse {
            rise_at: None,
            fall_at: None,
        };
    }

    pub fn advance(&mut self, us: i64) {
        self.now += us;
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn trigger(&self) -> Level {
        self.trigger
    }

    pub fn transitions(&self) -> &[(i64, Level)] {
        &self.transitions
    }

    // widths of every completed high phase on the trigger
    pub fn trigger_pulses(&self) -> Vec<i64> {
        let mut pulses = Vec::new();
        let mut rose = None;
        for (at, level) in &self.transitions {
            match level {
                Level::High => rose = Some(*at),
                Level::Low => {
                    if let Some(start) = rose.take() {
                        pulses.push(at - start);
                    }
                }
            }
        }
        pulses
    }
}

impl Hardware for SimHardware {
    fn set_output_level(&mut self, level: Level) {
        if level != self.trigger {
            self.transitions.push((self.now, level));
            self.trigger = level;
        }
    }

    fn get_input_level(&mut self) -> Level {
        match &mut self.echo {
            Echo::Pulse { rise_at, fall_at } => {
                self.now += self.step;
                let risen = rise_at.map_or(false, |at| self.now >= at);
                let fallen = fall_at.map_or(false, |at| self.now >= at);
                (risen && !fallen).into()
            }
            Echo::Script { samples, last } => {
                match samples.pop_front() {
                    Some((at, level)) => {
                        self.now = at;
                        *last = level;
                    }
                    None => self.now += self.step,
                }
                *last
            }
        }
    }

    fn now_micros(&mut self) -> i64 {
        self.now
    }

    fn delay_micros(&mut self, us: u32) {
        self.now += us as i64;
    }
}
