use std::collections::VecDeque;

use crate::calculator::CalcMode;
use crate::chat::Sender;
use crate::map::MapCommand;
use crate::timers::Millis;
use crate::ui::{ThemeMode, ToastKind};

/// Everything observable the site did. Every variant includes `at: Millis`.
#[derive(Debug, Clone)]
pub enum SiteEvent {
    Map {
        command: MapCommand,
        at: Millis,
    },
    ThemeChanged {
        mode: ThemeMode,
        at: Millis,
    },
    NavbarHidden {
        hidden: bool,
        at: Millis,
    },
    CountersStarted {
        at: Millis,
    },
    Calculated {
        mode: CalcMode,
        ok: bool,
        at: Millis,
    },
    ChatMessage {
        sender: Sender,
        text: String,
        at: Millis,
    },
    ToastShown {
        kind: ToastKind,
        message: String,
        at: Millis,
    },
    ListingSubmitted {
        at: Millis,
    },
    AudioUnlocked {
        at: Millis,
    },
}

impl SiteEvent {
    pub fn at(&self) -> Millis {
        match self {
            SiteEvent::Map { at, .. }
            | SiteEvent::ThemeChanged { at, .. }
            | SiteEvent::NavbarHidden { at, .. }
            | SiteEvent::CountersStarted { at }
            | SiteEvent::Calculated { at, .. }
            | SiteEvent::ChatMessage { at, .. }
            | SiteEvent::ToastShown { at, .. }
            | SiteEvent::ListingSubmitted { at }
            | SiteEvent::AudioUnlocked { at } => *at,
        }
    }
}

/// Bounded log of site events. Once full, each push drops the oldest entry.
pub struct EventLog {
    entries: VecDeque<SiteEvent>,
    capacity: usize,
}

impl EventLog {
    /// Capacity is clamped to at least one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Room for 1,000 events, enough for a long console session.
    pub fn default_capacity() -> Self {
        Self::new(1_000)
    }

    pub fn push(&mut self, event: SiteEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SiteEvent> {
        self.entries.iter()
    }

    /// The last `n` events, newest last.
    pub fn recent(&self, n: usize) -> Vec<&SiteEvent> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).collect()
    }

    /// Map commands in the log, oldest first.
    pub fn map_commands(&self) -> impl Iterator<Item = &MapCommand> {
        self.iter().filter_map(|e| match e {
            SiteEvent::Map { command, .. } => Some(command),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(at: u64) -> SiteEvent {
        SiteEvent::AudioUnlocked { at: Millis(at) }
    }

    fn times<'a>(events: impl Iterator<Item = &'a SiteEvent>) -> Vec<u64> {
        events.map(|e| e.at().0).collect()
    }

    #[test]
    fn iter_is_oldest_first() {
        let mut log = EventLog::new(10);
        log.push(audio(0));
        log.push(audio(1));
        log.push(audio(2));

        assert_eq!(times(log.iter()), vec![0, 1, 2]);
    }

    #[test]
    fn full_log_drops_oldest() {
        let mut log = EventLog::new(3);
        for at in 0..5 {
            log.push(audio(at));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(times(log.iter()), vec![2, 3, 4]);
    }

    #[test]
    fn recent_after_drops() {
        let mut log = EventLog::new(3);
        for at in 0..7 {
            log.push(audio(at));
        }

        assert_eq!(times(log.recent(2).into_iter()), vec![5, 6]);
    }

    #[test]
    fn recent_caps_at_len() {
        let mut log = EventLog::new(10);
        log.push(audio(0));
        log.push(audio(1));

        let recent = log.recent(100);
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn zero_capacity_clamped_to_one() {
        let mut log = EventLog::new(0);
        assert_eq!(log.capacity, 1);
        log.push(audio(1));
        log.push(audio(2));
        assert_eq!(times(log.iter()), vec![2]);
    }

    #[test]
    fn map_commands_skip_other_events() {
        let mut log = EventLog::default_capacity();
        log.push(audio(0));
        log.push(SiteEvent::Map {
            command: MapCommand::ClosePopup,
            at: Millis(1),
        });
        log.push(SiteEvent::ListingSubmitted { at: Millis(2) });

        let cmds: Vec<&MapCommand> = log.map_commands().collect();
        assert_eq!(cmds, vec![&MapCommand::ClosePopup]);
    }
}
