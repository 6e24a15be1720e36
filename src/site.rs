//! The whole site: every controller, the clock, pending timers and the
//! event log. Front ends feed user input and the passage of time in here.

use std::rc::Rc;

use crate::calculator::{CalcError, CalculatorForm, FormFields, FormOutput};
use crate::chat::{ChatWidget, Responder, Sender};
use crate::config::SiteConfig;
use crate::events::{EventLog, SiteEvent};
use crate::map::{MapController, MapError, MarkerId};
use crate::registry::{ProjectId, ProjectRegistry, RegionFilter};
use crate::timers::{Millis, TimerKey, Timers};
use crate::ui::listing::{self, ListingForm};
use crate::ui::slider::{self, Slider};
use crate::ui::{
    Accordion, BlogCarousel, Counter, CylinderGallery, Media, Navbar, StatsCounters,
    ThemeController, ThemeStore, ThemeView, ToastKind, Toasts,
};

/// Animation frame length for the navbar scroll handler.
pub const FRAME_MS: u64 = 16;

/// Desktop width used until the front end reports one.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1440.0;

/// Figures on the home page stats strip.
pub fn default_counters() -> Vec<Counter> {
    vec![
        Counter::new(56.0, false),
        Counter::new(15.0, false),
        Counter::new(4.9, true),
        Counter::new(12000.0, false),
    ]
}

fn default_blog_posts() -> Vec<String> {
    [
        "Why the New Capital keeps climbing",
        "North Coast: buying off-plan in 2025",
        "Installments vs. mortgage: what fits you",
        "Sheikh Zayed's new compounds",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// FAQ panel content heights in px.
const FAQ_HEIGHTS: [f64; 5] = [96.0, 120.0, 72.0, 144.0, 96.0];

pub struct Site<S: ThemeStore> {
    pub config: SiteConfig,
    now: Millis,
    pub timers: Timers,
    pub events: EventLog,
    pub theme: ThemeController<S>,
    pub navbar: Navbar,
    pub counters: StatsCounters,
    pub calculator: CalculatorForm,
    pub map: MapController,
    pub slider: Slider,
    pub gallery: CylinderGallery,
    pub carousel: BlogCarousel,
    pub accordion: Accordion,
    pub listing: ListingForm,
    pub toasts: Toasts,
    pub media: Media,
    pub chat: ChatWidget,
}

impl<S: ThemeStore> Site<S> {
    pub fn new(config: SiteConfig, registry: ProjectRegistry, store: S) -> Self {
        let slides = slider::default_slides();
        Self {
            now: Millis(0),
            timers: Timers::new(),
            events: EventLog::default_capacity(),
            theme: ThemeController::load(store),
            navbar: Navbar::new(config.navbar.clone()),
            counters: StatsCounters::new(config.counters.clone(), default_counters()),
            calculator: CalculatorForm::new(config.calculator.clone()),
            map: MapController::new(Rc::new(registry), config.map.clone()),
            gallery: CylinderGallery::new(config.gallery.clone(), &slides),
            slider: Slider::new(config.slider.clone(), slides, DEFAULT_VIEWPORT_WIDTH),
            carousel: BlogCarousel::new(config.carousel.clone(), default_blog_posts()),
            accordion: Accordion::new(&FAQ_HEIGHTS),
            listing: ListingForm::new(config.listing.clone(), listing::default_pill_groups()),
            toasts: Toasts::new(config.listing.toast_ms),
            media: Media::new(1),
            chat: ChatWidget::new(Responder::new(), config.chat.clone()),
            config,
        }
    }

    /// Page load: render every project, start the map intro and the blog
    /// auto-advance.
    pub fn boot(&mut self) {
        let registry = Rc::clone(self.map.registry());
        let all = registry.filter_by_region(RegionFilter::All);
        self.map.render_projects(&all);
        self.map.start_intro(&mut self.timers, self.now);
        self.carousel.start(&mut self.timers, self.now);
        self.flush_map_commands();
        log::info!(
            "site ready: {} projects, theme {}",
            registry.len(),
            self.theme.mode().as_str()
        );
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move the clock to `to`, firing every timer due on the way in
    /// deadline order. Time never runs backwards.
    pub fn advance(&mut self, to: Millis) {
        if to < self.now {
            return;
        }
        while let Some(at) = self.timers.next_deadline()
            && at <= to
        {
            self.now = self.now.max(at);
            while let Some(key) = self.timers.pop_due(at) {
                self.fire(key);
            }
        }
        self.now = to;
    }

    pub fn advance_by(&mut self, delay_ms: u64) {
        self.advance(self.now.after(delay_ms));
    }

    fn fire(&mut self, key: TimerKey) {
        let now = self.now;
        match key {
            TimerKey::CounterFrame | TimerKey::CounterTick => {
                self.counters.on_timer(&mut self.timers, now);
            }
            TimerKey::NavbarFrame => {
                if let Some(hidden) = self.navbar.on_frame() {
                    self.events.push(SiteEvent::NavbarHidden { hidden, at: now });
                }
            }
            TimerKey::CarouselTransition => self.carousel.on_transition_end(),
            TimerKey::CarouselAutoNext => {
                self.carousel.on_auto_next(&mut self.timers, now);
            }
            TimerKey::ListingProcessed => {
                self.listing
                    .on_processed(&mut self.toasts, &mut self.timers, now);
                self.record_toast(ToastKind::Success);
            }
            TimerKey::ListingAdminNotice => {
                self.listing
                    .on_admin_notice(&mut self.toasts, &mut self.timers, now);
                self.record_toast(ToastKind::Admin);
            }
            TimerKey::ClientToastHide => self.toasts.hide(ToastKind::Success),
            TimerKey::AdminToastHide => self.toasts.hide(ToastKind::Admin),
            TimerKey::ChatReply => {
                for text in self.chat.on_reply_timer(&mut self.timers, now) {
                    self.events.push(SiteEvent::ChatMessage {
                        sender: Sender::Bot,
                        text: text.to_string(),
                        at: now,
                    });
                }
            }
            TimerKey::ChatFocus => self.chat.on_focus_timer(),
            TimerKey::MapIntro => self.map.on_intro(&mut self.timers, now),
            TimerKey::MapUiReveal => self.map.on_ui_reveal(),
        }
        self.flush_map_commands();
    }

    fn flush_map_commands(&mut self) {
        for command in self.map.take_commands() {
            self.events.push(SiteEvent::Map {
                command,
                at: self.now,
            });
        }
    }

    fn record_toast(&mut self, kind: ToastKind) {
        let message = self.toasts.get(kind).message.clone();
        self.events.push(SiteEvent::ToastShown {
            kind,
            message,
            at: self.now,
        });
    }

    pub fn toggle_theme(&mut self) -> ThemeView {
        let view = self.theme.toggle();
        self.events.push(SiteEvent::ThemeChanged {
            mode: self.theme.mode(),
            at: self.now,
        });
        view
    }

    pub fn scroll(&mut self, scroll_top: f64) {
        if self.navbar.on_scroll(scroll_top) {
            self.timers.schedule(TimerKey::NavbarFrame, self.now, FRAME_MS);
        }
    }

    /// The stats section intersects the viewport by `ratio`.
    pub fn stats_visible(&mut self, ratio: f64) {
        if self.counters.on_visibility(ratio, &mut self.timers, self.now) {
            self.events.push(SiteEvent::CountersStarted { at: self.now });
        }
    }

    /// The page holding the counters was shown again.
    pub fn stats_page_shown(&mut self) {
        if self.counters.reset_and_run(&mut self.timers, self.now) {
            self.events.push(SiteEvent::CountersStarted { at: self.now });
        }
    }

    pub fn calculate(&mut self, fields: &FormFields) -> Result<FormOutput, CalcError> {
        let result = self.calculator.calculate(fields);
        if let Err(e) = &result {
            log::warn!("calculation rejected: {}", e);
        }
        self.events.push(SiteEvent::Calculated {
            mode: self.calculator.mode,
            ok: result.is_ok(),
            at: self.now,
        });
        result
    }

    /// Filter chip by tag. Unknown tags are ignored; returns whether the
    /// filter applied.
    pub fn filter_map(&mut self, tag: &str) -> bool {
        let Some(filter) = RegionFilter::parse(tag) else {
            log::warn!("unknown region filter {:?}", tag);
            return false;
        };
        self.map.filter_by(filter);
        self.flush_map_commands();
        true
    }

    pub fn click_marker(&mut self, id: MarkerId) -> Result<(), MapError> {
        let result = self.map.click_marker(id);
        self.flush_map_commands();
        result
    }

    pub fn click_card(&mut self, index: usize) -> Result<(), MapError> {
        let result = self.map.click_card(index);
        self.flush_map_commands();
        result
    }

    pub fn enter_master_plan(&mut self, id: ProjectId) -> Result<(), MapError> {
        let result = self.map.enter_master_plan(id).map(|_| ());
        self.flush_map_commands();
        result
    }

    pub fn exit_master_plan(&mut self) {
        self.map.exit_master_plan();
        self.flush_map_commands();
    }

    pub fn close_popup(&mut self) {
        self.map.close_popup();
        self.flush_map_commands();
    }

    pub fn carousel_next(&mut self) -> bool {
        self.carousel.next(&mut self.timers, self.now)
    }

    pub fn carousel_prev(&mut self) -> bool {
        self.carousel.prev(&mut self.timers, self.now)
    }

    pub fn submit_listing(&mut self) -> bool {
        let started = self.listing.submit(&mut self.timers, self.now);
        if started {
            self.events.push(SiteEvent::ListingSubmitted { at: self.now });
        }
        started
    }

    /// Any click or touch on the document.
    pub fn user_interaction(&mut self) {
        if self.media.on_user_interaction() {
            self.events.push(SiteEvent::AudioUnlocked { at: self.now });
        }
    }

    pub fn toggle_chat(&mut self, focus: bool) {
        self.chat.toggle(focus, &mut self.timers, self.now);
    }

    pub fn send_chat(&mut self, text: &str) {
        let sent = self.chat.send(text, &mut self.timers, self.now);
        self.record_user_message(sent);
    }

    pub fn send_chat_from_bottom_bar(&mut self, text: &str) {
        let sent = self
            .chat
            .send_from_bottom_bar(text, &mut self.timers, self.now);
        self.record_user_message(sent);
    }

    pub fn focus_chat_bottom_bar(&mut self) {
        self.chat.focus_bottom_bar(&mut self.timers, self.now);
    }

    pub fn send_chat_option(&mut self, option: &str) {
        self.chat.send_option(option, &mut self.timers, self.now);
        self.record_user_message(Some(option.to_string()));
    }

    fn record_user_message(&mut self, text: Option<String>) {
        if let Some(text) = text {
            self.events.push(SiteEvent::ChatMessage {
                sender: Sender::User,
                text,
                at: self.now,
            });
        }
    }
}
