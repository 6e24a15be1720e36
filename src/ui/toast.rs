use crate::timers::{Millis, TimerKey, Timers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Client-facing `#client-toast`.
    Success,
    /// Simulated back-office `#admin-toast`.
    Admin,
}

impl ToastKind {
    fn hide_key(self) -> TimerKey {
        match self {
            ToastKind::Success => TimerKey::ClientToastHide,
            ToastKind::Admin => TimerKey::AdminToastHide,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub visible: bool,
}

/// The two toast slots. Showing a toast again restarts its hide timer.
#[derive(Debug)]
pub struct Toasts {
    client: Toast,
    admin: Toast,
    visible_ms: u64,
}

impl Toasts {
    pub fn new(visible_ms: u64) -> Self {
        Self {
            client: Toast::default(),
            admin: Toast::default(),
            visible_ms,
        }
    }

    pub fn show(&mut self, kind: ToastKind, message: &str, timers: &mut Timers, now: Millis) {
        let toast = self.slot_mut(kind);
        toast.message = message.to_string();
        toast.visible = true;
        timers.schedule(kind.hide_key(), now, self.visible_ms);
    }

    pub fn hide(&mut self, kind: ToastKind) {
        self.slot_mut(kind).visible = false;
    }

    pub fn get(&self, kind: ToastKind) -> &Toast {
        match kind {
            ToastKind::Success => &self.client,
            ToastKind::Admin => &self.admin,
        }
    }

    fn slot_mut(&mut self, kind: ToastKind) -> &mut Toast {
        match kind {
            ToastKind::Success => &mut self.client,
            ToastKind::Admin => &mut self.admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_hide_after_delay() {
        let mut toasts = Toasts::new(3000);
        let mut timers = Timers::new();
        toasts.show(ToastKind::Admin, "hello", &mut timers, Millis(100));
        assert!(toasts.get(ToastKind::Admin).visible);
        assert!(!toasts.get(ToastKind::Success).visible);
        assert_eq!(timers.deadline(TimerKey::AdminToastHide), Some(Millis(3100)));

        toasts.hide(ToastKind::Admin);
        assert!(!toasts.get(ToastKind::Admin).visible);
        assert_eq!(toasts.get(ToastKind::Admin).message, "hello");
    }

    #[test]
    fn reshow_restarts_hide_timer() {
        let mut toasts = Toasts::new(3000);
        let mut timers = Timers::new();
        toasts.show(ToastKind::Success, "one", &mut timers, Millis(0));
        toasts.show(ToastKind::Success, "two", &mut timers, Millis(2000));
        assert_eq!(timers.deadline(TimerKey::ClientToastHide), Some(Millis(5000)));
        assert_eq!(toasts.get(ToastKind::Success).message, "two");
    }
}
