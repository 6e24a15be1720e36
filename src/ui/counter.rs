use crate::config::{CounterConfig, CounterStyle};
use crate::timers::{Millis, TimerKey, Timers};

/// One `.counter` element: counts up from 0 to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter {
    target: f64,
    decimal: bool,
    current: f64,
    done: bool,
    pub display: String,
}

impl Counter {
    /// Non-finite or negative targets count to 0.
    pub fn new(target: f64, decimal: bool) -> Self {
        let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
        Self {
            target,
            decimal,
            current: 0.0,
            done: false,
            display: "0".into(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn reset(&mut self) {
        self.current = 0.0;
        self.done = false;
        self.display = "0".into();
    }

    fn step(&mut self, style: CounterStyle) {
        if self.done {
            return;
        }
        match style {
            CounterStyle::FrameStepped { steps } => {
                self.current += self.target / steps.max(1) as f64;
                if self.current < self.target {
                    self.display = if self.decimal {
                        format!("{:.1}", self.current)
                    } else {
                        format!("{:.0}", self.current.ceil())
                    };
                } else {
                    self.finish();
                }
            }
            CounterStyle::Incremental { speed, .. } => {
                if self.current < self.target {
                    let inc = self.target / speed.max(1) as f64;
                    self.current = (self.current + inc).ceil();
                    self.display = format!("{:.0}", self.current);
                } else {
                    self.finish();
                }
            }
        }
    }

    fn finish(&mut self) {
        self.current = self.target;
        self.done = true;
        self.display = format_target(self.target);
    }
}

/// Final value as typed in the markup: "120", "4.5".
fn format_target(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

/// The stats section. `has_counted` guards the one-shot run.
#[derive(Debug)]
pub struct StatsCounters {
    config: CounterConfig,
    counters: Vec<Counter>,
    has_counted: bool,
}

impl StatsCounters {
    pub fn new(config: CounterConfig, counters: Vec<Counter>) -> Self {
        Self {
            config,
            counters,
            has_counted: false,
        }
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn has_counted(&self) -> bool {
        self.has_counted
    }

    /// Start counting unless already done. The first step is applied
    /// synchronously. Returns true if a run started.
    pub fn run(&mut self, timers: &mut Timers, now: Millis) -> bool {
        if self.has_counted {
            return false;
        }
        self.has_counted = true;
        self.advance(timers, now);
        true
    }

    /// Page re-shown: zero every display and count again.
    pub fn reset_and_run(&mut self, timers: &mut Timers, now: Millis) -> bool {
        self.has_counted = false;
        for c in &mut self.counters {
            c.reset();
        }
        timers.clear(self.timer_key());
        self.run(timers, now)
    }

    /// Stats section scrolled into view by `ratio` (0..=1).
    pub fn on_visibility(&mut self, ratio: f64, timers: &mut Timers, now: Millis) -> bool {
        if ratio >= self.config.visibility_threshold {
            self.run(timers, now)
        } else {
            false
        }
    }

    /// Frame or tick timer fired.
    pub fn on_timer(&mut self, timers: &mut Timers, now: Millis) {
        self.advance(timers, now);
    }

    pub fn all_done(&self) -> bool {
        self.counters.iter().all(Counter::is_done)
    }

    fn advance(&mut self, timers: &mut Timers, now: Millis) {
        let style = self.config.style;
        for c in &mut self.counters {
            c.step(style);
        }
        if !self.all_done() {
            let delay = match style {
                CounterStyle::FrameStepped { .. } => self.config.frame_ms,
                CounterStyle::Incremental { interval_ms, .. } => interval_ms,
            };
            timers.schedule(self.timer_key(), now, delay);
        }
    }

    fn timer_key(&self) -> TimerKey {
        match self.config.style {
            CounterStyle::FrameStepped { .. } => TimerKey::CounterFrame,
            CounterStyle::Incremental { .. } => TimerKey::CounterTick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(stats: &mut StatsCounters, timers: &mut Timers) -> usize {
        let mut frames = 0;
        while let Some(now) = timers.next_deadline() {
            timers.drain_due(now);
            stats.on_timer(timers, now);
            frames += 1;
            assert!(frames < 1000, "counters never settled");
        }
        frames
    }

    #[test]
    fn frame_stepped_reaches_target_in_sixty_frames() {
        let mut stats = StatsCounters::new(
            CounterConfig::default(),
            vec![Counter::new(120.0, false), Counter::new(4.5, true)],
        );
        let mut timers = Timers::new();
        assert!(stats.run(&mut timers, Millis(0)));
        assert_eq!(stats.counters()[0].display, "2");
        assert_eq!(stats.counters()[1].display, "0.1");

        let frames = run_to_end(&mut stats, &mut timers);
        assert!((58..=60).contains(&frames), "{frames} frames");
        assert_eq!(stats.counters()[0].display, "120");
        assert_eq!(stats.counters()[1].display, "4.5");
    }

    #[test]
    fn run_is_one_shot_until_reset() {
        let mut stats = StatsCounters::new(CounterConfig::default(), vec![Counter::new(10.0, false)]);
        let mut timers = Timers::new();
        assert!(stats.run(&mut timers, Millis(0)));
        assert!(!stats.run(&mut timers, Millis(5)));
        assert!(stats.reset_and_run(&mut timers, Millis(10)));
        assert_eq!(stats.counters()[0].display, "1");
    }

    #[test]
    fn visibility_below_threshold_does_not_start() {
        let mut stats = StatsCounters::new(CounterConfig::default(), vec![Counter::new(10.0, false)]);
        let mut timers = Timers::new();
        assert!(!stats.on_visibility(0.3, &mut timers, Millis(0)));
        assert!(!stats.has_counted());
        assert!(stats.on_visibility(0.6, &mut timers, Millis(0)));
        assert!(!stats.on_visibility(1.0, &mut timers, Millis(0)));
    }

    #[test]
    fn incremental_style_ticks_every_interval() {
        let config = CounterConfig {
            style: CounterStyle::Incremental {
                speed: 50,
                interval_ms: 30,
            },
            ..CounterConfig::default()
        };
        let mut stats = StatsCounters::new(config, vec![Counter::new(500.0, false)]);
        let mut timers = Timers::new();
        stats.run(&mut timers, Millis(0));
        assert_eq!(stats.counters()[0].display, "10");
        assert_eq!(timers.deadline(TimerKey::CounterTick), Some(Millis(30)));
        run_to_end(&mut stats, &mut timers);
        assert_eq!(stats.counters()[0].display, "500");
    }

    #[test]
    fn zero_and_invalid_targets_finish_immediately() {
        let mut stats = StatsCounters::new(
            CounterConfig::default(),
            vec![Counter::new(0.0, false), Counter::new(f64::NAN, false)],
        );
        let mut timers = Timers::new();
        stats.run(&mut timers, Millis(0));
        assert!(stats.all_done());
        assert!(timers.is_empty());
        assert_eq!(stats.counters()[1].display, "0");
    }
}
