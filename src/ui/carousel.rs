use std::collections::VecDeque;

use crate::config::CarouselConfig;
use crate::timers::{Millis, TimerKey, Timers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Blog hero carousel. Items form a ring; the front item is the one shown.
///
/// A move locks the buttons until the transition ends and re-arms the
/// auto-advance timer, so the carousel only auto-advances after
/// `auto_next_ms` without a move.
#[derive(Debug)]
pub struct BlogCarousel {
    config: CarouselConfig,
    items: VecDeque<String>,
    is_animating: bool,
    /// Transition class on the container while animating.
    direction: Option<Direction>,
    /// When the running-time bar last restarted.
    progress_started: Millis,
}

impl BlogCarousel {
    pub fn new(config: CarouselConfig, items: Vec<String>) -> Self {
        Self {
            config,
            items: items.into(),
            is_animating: false,
            direction: None,
            progress_started: Millis(0),
        }
    }

    /// Arm the first auto-advance and start the progress bar.
    pub fn start(&mut self, timers: &mut Timers, now: Millis) {
        timers.schedule(TimerKey::CarouselAutoNext, now, self.config.auto_next_ms);
        self.progress_started = now;
    }

    pub fn items(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn current(&self) -> Option<&str> {
        self.items.front().map(String::as_str)
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Next button. Ignored while a transition runs; returns whether it moved.
    pub fn next(&mut self, timers: &mut Timers, now: Millis) -> bool {
        self.show(Direction::Next, timers, now)
    }

    pub fn prev(&mut self, timers: &mut Timers, now: Millis) -> bool {
        self.show(Direction::Prev, timers, now)
    }

    pub fn on_transition_end(&mut self) {
        self.is_animating = false;
        self.direction = None;
    }

    /// Auto-advance fired. If a transition is still running the advance
    /// is retried after another full interval.
    pub fn on_auto_next(&mut self, timers: &mut Timers, now: Millis) -> bool {
        if self.next(timers, now) {
            return true;
        }
        timers.schedule(TimerKey::CarouselAutoNext, now, self.config.auto_next_ms);
        false
    }

    /// Running-time bar fill, 0..=1.
    pub fn progress(&self, now: Millis) -> f64 {
        if self.config.auto_next_ms == 0 {
            return 1.0;
        }
        let elapsed = now.0.saturating_sub(self.progress_started.0) as f64;
        (elapsed / self.config.auto_next_ms as f64).min(1.0)
    }

    fn show(&mut self, direction: Direction, timers: &mut Timers, now: Millis) -> bool {
        if self.is_animating || self.items.is_empty() {
            return false;
        }
        self.is_animating = true;
        match direction {
            Direction::Next => self.items.rotate_left(1),
            Direction::Prev => self.items.rotate_right(1),
        }
        self.direction = Some(direction);
        timers.schedule(TimerKey::CarouselTransition, now, self.config.transition_ms);
        timers.schedule(TimerKey::CarouselAutoNext, now, self.config.auto_next_ms);
        self.progress_started = now;
        log::debug!("carousel {:?} -> {:?}", direction, self.current());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel() -> BlogCarousel {
        let items = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        BlogCarousel::new(CarouselConfig::default(), items)
    }

    #[test]
    fn next_and_prev_rotate_the_ring() {
        let mut c = carousel();
        let mut timers = Timers::new();
        assert!(c.next(&mut timers, Millis(0)));
        assert_eq!(c.items().collect::<Vec<_>>(), vec!["b", "c", "d", "a"]);
        c.on_transition_end();
        assert!(c.prev(&mut timers, Millis(600)));
        c.on_transition_end();
        assert!(c.prev(&mut timers, Millis(1200)));
        assert_eq!(c.current(), Some("d"));
    }

    #[test]
    fn clicks_during_transition_are_ignored() {
        let mut c = carousel();
        let mut timers = Timers::new();
        c.next(&mut timers, Millis(0));
        assert!(!c.next(&mut timers, Millis(100)));
        assert!(!c.prev(&mut timers, Millis(200)));
        assert_eq!(c.current(), Some("b"));
        assert_eq!(c.direction(), Some(Direction::Next));
        assert_eq!(
            timers.deadline(TimerKey::CarouselTransition),
            Some(Millis(500))
        );
    }

    #[test]
    fn each_move_rearms_auto_advance() {
        let mut c = carousel();
        let mut timers = Timers::new();
        c.start(&mut timers, Millis(0));
        assert_eq!(timers.deadline(TimerKey::CarouselAutoNext), Some(Millis(7000)));
        c.next(&mut timers, Millis(3000));
        assert_eq!(
            timers.deadline(TimerKey::CarouselAutoNext),
            Some(Millis(10_000))
        );
        assert!((c.progress(Millis(6500)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn auto_next_while_locked_retries() {
        let mut c = carousel();
        let mut timers = Timers::new();
        c.next(&mut timers, Millis(0));
        assert!(!c.on_auto_next(&mut timers, Millis(100)));
        assert_eq!(timers.deadline(TimerKey::CarouselAutoNext), Some(Millis(7100)));
    }

    #[test]
    fn empty_carousel_never_animates() {
        let mut c = BlogCarousel::new(CarouselConfig::default(), Vec::new());
        let mut timers = Timers::new();
        assert!(!c.next(&mut timers, Millis(0)));
        assert!(!c.is_animating());
        assert_eq!(c.current(), None);
    }
}
