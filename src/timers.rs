use std::collections::HashMap;

/// Site clock in milliseconds since page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(pub u64);

impl Millis {
    pub fn after(self, delay_ms: u64) -> Millis {
        Millis(self.0.saturating_add(delay_ms))
    }
}

/// Deferred work a widget asked for. Fired by `Timers::pop_due`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKey {
    /// Next animation frame for the stats counters.
    CounterFrame,
    /// Incremental counter tick (30 ms cadence).
    CounterTick,
    /// Pending navbar scroll frame.
    NavbarFrame,
    /// Blog carousel transition end.
    CarouselTransition,
    /// Blog carousel auto-advance.
    CarouselAutoNext,
    /// Listing submit finishes processing.
    ListingProcessed,
    /// Admin notification after a listing submit.
    ListingAdminNotice,
    /// Hide the client toast.
    ClientToastHide,
    /// Hide the admin toast.
    AdminToastHide,
    /// Chat bot reply delivery.
    ChatReply,
    /// Focus the chat input after opening.
    ChatFocus,
    /// Map intro fly-in.
    MapIntro,
    /// Reveal the map UI after the intro.
    MapUiReveal,
}

/// Shortest delay a timer can have. A zero delay still lands on a later
/// tick, so a handler that re-arms itself cannot stall the clock.
pub const MIN_DELAY_MS: u64 = 1;

/// Named one-shot timers. Scheduling under an existing key replaces the
/// pending deadline (clear-then-set).
#[derive(Debug, Default)]
pub struct Timers {
    pending: HashMap<TimerKey, Millis>,
}

impl Timers {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    pub fn schedule(&mut self, key: TimerKey, now: Millis, delay_ms: u64) {
        self.pending
            .insert(key, now.after(delay_ms.max(MIN_DELAY_MS)));
    }

    pub fn clear(&mut self, key: TimerKey) {
        self.pending.remove(&key);
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    pub fn deadline(&self, key: TimerKey) -> Option<Millis> {
        self.pending.get(&key).copied()
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.values().min().copied()
    }

    /// Remove and return the earliest timer due at `now`. Equal deadlines
    /// come out in `TimerKey` declaration order. Callers fire one key and
    /// ask again, so a handler that reschedules a due key replaces it.
    pub fn pop_due(&mut self, now: Millis) -> Option<TimerKey> {
        let (at, key) = self
            .pending
            .iter()
            .map(|(k, at)| (*at, *k))
            .filter(|(at, _)| *at <= now)
            .min()?;
        log::trace!("timer {:?} due at {} ms", key, at.0);
        self.pending.remove(&key);
        Some(key)
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Millis) -> Vec<TimerKey> {
        std::iter::from_fn(|| self.pop_due(now)).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
