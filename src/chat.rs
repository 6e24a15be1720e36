//! Scripted FAQ chat: an ordered rule list plus the chat widget state.

use std::collections::VecDeque;

use smallvec::{SmallVec, smallvec};

use crate::config::ChatConfig;
use crate::timers::{Millis, TimerKey, Timers};

/// One scripted answer. Fires when the lower-cased input contains any of
/// its keywords. Rules are tried in list order; the first match wins.
#[derive(Debug, Clone)]
pub struct Rule {
    pub topic: Topic,
    pub keywords: SmallVec<[&'static str; 3]>,
    pub response: &'static str,
}

impl Rule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Greeting,
    Projects,
    Prices,
    Selling,
    Contact,
    Location,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<Rule>,
    fallback: &'static str,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder {
    pub fn new() -> Self {
        let rule = |topic, keywords, response| Rule {
            topic,
            keywords,
            response,
        };
        Self {
            rules: vec![
                rule(
                    Topic::Greeting,
                    smallvec!["hello", "hi"],
                    "Welcome to SkyPioneers! Buying, selling, or exploring?",
                ),
                rule(
                    Topic::Projects,
                    smallvec!["project", "residential"],
                    "Check out <a href='projects.html'>Sky City</a> and <a href='projects.html'>Blue Horizon</a>.",
                ),
                rule(
                    Topic::Prices,
                    smallvec!["price", "cost"],
                    "Units start from 2.5M EGP (8 years installments). Use our <a href='calculator.html'>Calculator</a>.",
                ),
                rule(
                    Topic::Selling,
                    smallvec!["sell"],
                    "List your unit directly on our <a href='sell.html'>Sell Unit</a> page.",
                ),
                rule(
                    Topic::Contact,
                    smallvec!["contact", "number", "call"],
                    "You can reach our sales team at 19900.",
                ),
                rule(
                    Topic::Location,
                    smallvec!["location", "map"],
                    "Located in New Capital and North Coast. View our <a href='map.html'>Map</a>.",
                ),
            ],
            fallback: "Please choose an option or ask about 'Projects', 'Prices', or 'Selling'.",
        }
    }

    pub fn with_rules(rules: Vec<Rule>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    /// Matched topic and the reply text.
    pub fn respond(&self, input: &str) -> (Topic, &'static str) {
        let lowered = input.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map(|r| (r.topic, r.response))
            .unwrap_or((Topic::Fallback, self.fallback))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

/// The floating chat window and the bottom input bar.
pub struct ChatWidget {
    responder: Responder,
    config: ChatConfig,
    pub open: bool,
    pub input_focused: bool,
    pub history: Vec<ChatMessage>,
    /// User messages awaiting a bot reply with their reply deadline,
    /// oldest first. The typing indicator shows while this is non-empty.
    pending: VecDeque<(Millis, String)>,
}

impl ChatWidget {
    pub fn new(responder: Responder, config: ChatConfig) -> Self {
        Self {
            responder,
            config,
            open: false,
            input_focused: false,
            history: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Open or close the window. Opening with `focus` focuses the input
    /// after a short delay.
    pub fn toggle(&mut self, focus: bool, timers: &mut Timers, now: Millis) {
        self.open = !self.open;
        if !self.open {
            self.input_focused = false;
        } else if focus {
            timers.schedule(TimerKey::ChatFocus, now, self.config.focus_delay_ms);
        }
    }

    pub fn on_focus_timer(&mut self) {
        if self.open {
            self.input_focused = true;
        }
    }

    /// Enter or send button in the chat window. Returns the posted text.
    pub fn send(&mut self, raw: &str, timers: &mut Timers, now: Millis) -> Option<String> {
        let msg = raw.trim();
        if msg.is_empty() {
            return None;
        }
        self.post(msg, timers, now);
        Some(msg.to_string())
    }

    /// Bottom bar send: always opens the window (without stealing focus),
    /// then posts the message if there is one.
    pub fn send_from_bottom_bar(
        &mut self,
        raw: &str,
        timers: &mut Timers,
        now: Millis,
    ) -> Option<String> {
        if !self.open {
            self.toggle(false, timers, now);
        }
        self.send(raw, timers, now)
    }

    /// Focusing the bottom bar opens the window without focusing it.
    pub fn focus_bottom_bar(&mut self, timers: &mut Timers, now: Millis) {
        if !self.open {
            self.toggle(false, timers, now);
        }
    }

    /// Quick-reply option buttons post their label verbatim.
    pub fn send_option(&mut self, option: &str, timers: &mut Timers, now: Millis) {
        self.post(option, timers, now);
    }

    fn post(&mut self, msg: &str, timers: &mut Timers, now: Millis) {
        self.history.push(ChatMessage {
            sender: Sender::User,
            text: msg.to_string(),
        });
        let due = now.after(self.config.typing_delay_ms);
        self.pending.push_back((due, msg.to_string()));
        // The reply timer always tracks the oldest queued message.
        if !timers.is_pending(TimerKey::ChatReply) {
            timers.schedule(TimerKey::ChatReply, now, self.config.typing_delay_ms);
        }
    }

    /// Reply timer fired: answer every message whose typing delay has run
    /// out and re-arm for the next one.
    pub fn on_reply_timer(&mut self, timers: &mut Timers, now: Millis) -> Vec<&'static str> {
        let mut replies = Vec::new();
        while let Some(due) = self.pending.front().map(|(due, _)| *due)
            && due <= now
        {
            if let Some((_, msg)) = self.pending.pop_front() {
                replies.push(self.responder.respond(&msg).1);
            }
        }
        for r in &replies {
            self.history.push(ChatMessage {
                sender: Sender::Bot,
                text: (*r).to_string(),
            });
        }
        if let Some((due, _)) = self.pending.front() {
            timers.schedule(TimerKey::ChatReply, now, due.0.saturating_sub(now.0));
        }
        replies
    }

    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ChatWidget {
        ChatWidget::new(Responder::new(), ChatConfig::default())
    }

    #[test]
    fn every_rule_keyword_routes_to_its_topic() {
        let responder = Responder::new();
        for rule in responder.rules() {
            for kw in &rule.keywords {
                // Prefix with a neutral word so earlier rules can't match.
                let input = format!("about {kw}");
                let (topic, _) = responder.respond(&input);
                let earlier = responder
                    .rules()
                    .iter()
                    .take_while(|r| r.topic != rule.topic)
                    .any(|r| r.matches(&input));
                if !earlier {
                    assert_eq!(topic, rule.topic, "keyword {kw}");
                }
            }
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let (topic, _) = Responder::new().respond("What is the PRICE?");
        assert_eq!(topic, Topic::Prices);
    }

    #[test]
    fn earlier_rules_win() {
        // "hi" is a substring of "this", so the greeting fires first.
        let (topic, _) = Responder::new().respond("this project");
        assert_eq!(topic, Topic::Greeting);
        let (topic, _) = Responder::new().respond("sell my unit, call me");
        assert_eq!(topic, Topic::Selling);
    }

    #[test]
    fn unknown_input_falls_back() {
        let (topic, text) = Responder::new().respond("weather tomorrow?");
        assert_eq!(topic, Topic::Fallback);
        assert!(text.contains("Projects"));
    }

    #[test]
    fn custom_rules_replace_defaults() {
        let responder = Responder::with_rules(
            vec![Rule {
                topic: Topic::Contact,
                keywords: smallvec!["whatsapp"],
                response: "Message us on WhatsApp.",
            }],
            "?",
        );
        assert_eq!(responder.respond("WhatsApp?").1, "Message us on WhatsApp.");
        assert_eq!(responder.respond("hello").1, "?");
    }

    #[test]
    fn send_ignores_blank_input() {
        let mut chat = widget();
        let mut timers = Timers::new();
        assert!(chat.send("   ", &mut timers, Millis(0)).is_none());
        assert!(chat.history.is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn reply_arrives_after_typing_delay() {
        let mut chat = widget();
        let mut timers = Timers::new();
        chat.send("  where is the map? ", &mut timers, Millis(0));
        assert!(chat.is_typing());
        assert_eq!(chat.history[0].text, "where is the map?");
        assert_eq!(timers.deadline(TimerKey::ChatReply), Some(Millis(1000)));

        timers.drain_due(Millis(1000));
        let replies = chat.on_reply_timer(&mut timers, Millis(1000));
        assert_eq!(replies.len(), 1);
        assert!(timers.is_empty());
        assert!(!chat.is_typing());
        assert_eq!(chat.history[1].sender, Sender::Bot);
        assert!(chat.history[1].text.contains("Map"));
    }

    #[test]
    fn each_message_waits_its_own_delay() {
        let mut chat = widget();
        let mut timers = Timers::new();
        chat.send("hello", &mut timers, Millis(0));
        chat.send("price?", &mut timers, Millis(900));
        assert_eq!(timers.deadline(TimerKey::ChatReply), Some(Millis(1000)));

        timers.drain_due(Millis(1000));
        let first = chat.on_reply_timer(&mut timers, Millis(1000));
        assert_eq!(first.len(), 1);
        assert!(first[0].starts_with("Welcome"));
        assert!(chat.is_typing());
        assert_eq!(timers.deadline(TimerKey::ChatReply), Some(Millis(1900)));

        timers.drain_due(Millis(1900));
        let second = chat.on_reply_timer(&mut timers, Millis(1900));
        assert!(second[0].contains("2.5M EGP"));
        assert!(!chat.is_typing());
        assert!(timers.is_empty());
    }

    #[test]
    fn bottom_bar_opens_without_focus() {
        let mut chat = widget();
        let mut timers = Timers::new();
        chat.send_from_bottom_bar("", &mut timers, Millis(0));
        assert!(chat.open);
        assert!(!timers.is_pending(TimerKey::ChatFocus));
        assert!(chat.history.is_empty());
    }

    #[test]
    fn toggle_with_focus_schedules_focus() {
        let mut chat = widget();
        let mut timers = Timers::new();
        chat.toggle(true, &mut timers, Millis(10));
        assert_eq!(timers.deadline(TimerKey::ChatFocus), Some(Millis(310)));
        chat.on_focus_timer();
        assert!(chat.input_focused);
        chat.toggle(true, &mut timers, Millis(400));
        assert!(!chat.open && !chat.input_focused);
    }
}
