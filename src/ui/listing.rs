use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::ListingConfig;
use crate::timers::{Millis, TimerKey, Timers};
use crate::ui::toast::{ToastKind, Toasts};

pub const SUBMIT_LABEL: &str = "Submit Listing";
pub const PROCESSING_LABEL: &str = "Processing...";
pub const SUCCESS_MESSAGE: &str = "Ad submitted successfully! Under review.";
pub const ADMIN_MESSAGE: &str = "New Ad Submission Received (Admin)";

/// A row of mutually exclusive pill buttons (unit type, finishing, ...).
#[derive(Debug, Clone)]
pub struct PillGroup {
    pub name: String,
    pub options: Vec<String>,
    active: Option<usize>,
}

impl PillGroup {
    pub fn new(name: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.options[i].as_str())
    }
}

/// A file picked in the upload input.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub id: u32,
    pub name: String,
    pub data_url: String,
}

/// Sell-your-unit form.
#[derive(Debug)]
pub struct ListingForm {
    config: ListingConfig,
    groups: Vec<PillGroup>,
    pub fields: HashMap<String, String>,
    previews: Vec<Preview>,
    next_preview_id: u32,
    processing: bool,
}

impl ListingForm {
    pub fn new(config: ListingConfig, groups: Vec<PillGroup>) -> Self {
        Self {
            config,
            groups,
            fields: HashMap::new(),
            previews: Vec::new(),
            next_preview_id: 0,
            processing: false,
        }
    }

    pub fn groups(&self) -> &[PillGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&PillGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Activate one pill, deactivating the rest of its group.
    /// Returns false for an unknown group or option.
    pub fn select_pill(&mut self, group: &str, option: usize) -> bool {
        match self.groups.iter_mut().find(|g| g.name == group) {
            Some(g) if option < g.options.len() => {
                g.active = Some(option);
                true
            }
            _ => false,
        }
    }

    /// Add previews for the image files; anything else is skipped.
    /// Returns how many previews were added.
    pub fn add_files(&mut self, files: &[SelectedFile]) -> usize {
        let mut added = 0;
        for file in files {
            if !file.mime.starts_with("image/") {
                log::debug!("skipping non-image upload {} ({})", file.name, file.mime);
                continue;
            }
            let data_url = format!("data:{};base64,{}", file.mime, STANDARD.encode(&file.bytes));
            self.previews.push(Preview {
                id: self.next_preview_id,
                name: file.name.clone(),
                data_url,
            });
            self.next_preview_id += 1;
            added += 1;
        }
        added
    }

    pub fn remove_preview(&mut self, id: u32) -> bool {
        let before = self.previews.len();
        self.previews.retain(|p| p.id != id);
        self.previews.len() != before
    }

    pub fn previews(&self) -> &[Preview] {
        &self.previews
    }

    pub fn button_label(&self) -> &'static str {
        if self.processing {
            PROCESSING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    pub fn button_disabled(&self) -> bool {
        self.processing
    }

    /// Start the simulated upload. Ignored while one is in flight.
    pub fn submit(&mut self, timers: &mut Timers, now: Millis) -> bool {
        if self.processing {
            return false;
        }
        self.processing = true;
        timers.schedule(TimerKey::ListingProcessed, now, self.config.processing_ms);
        true
    }

    /// Upload finished: restore the button, confirm, reset the form and
    /// queue the admin notification.
    pub fn on_processed(&mut self, toasts: &mut Toasts, timers: &mut Timers, now: Millis) {
        self.processing = false;
        toasts.show(ToastKind::Success, SUCCESS_MESSAGE, timers, now);
        timers.schedule(TimerKey::ListingAdminNotice, now, self.config.admin_notice_ms);
        self.reset();
    }

    pub fn on_admin_notice(&mut self, toasts: &mut Toasts, timers: &mut Timers, now: Millis) {
        toasts.show(ToastKind::Admin, ADMIN_MESSAGE, timers, now);
        log::info!("new listing submission received");
    }

    fn reset(&mut self) {
        self.fields.clear();
        self.previews.clear();
        for g in &mut self.groups {
            g.active = None;
        }
    }
}

/// Pill groups on the sell page.
pub fn default_pill_groups() -> Vec<PillGroup> {
    vec![
        PillGroup::new("type", &["Apartment", "Villa", "Townhouse", "Chalet"]),
        PillGroup::new("finishing", &["Core & Shell", "Semi-Finished", "Fully Finished"]),
        PillGroup::new("payment", &["Cash", "Installments"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ListingForm {
        ListingForm::new(ListingConfig::default(), default_pill_groups())
    }

    fn file(name: &str, mime: &str, bytes: &[u8]) -> SelectedFile {
        SelectedFile {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn one_active_pill_per_group() {
        let mut f = form();
        assert!(f.select_pill("type", 0));
        assert!(f.select_pill("type", 2));
        assert!(f.select_pill("payment", 1));
        assert_eq!(f.group("type").and_then(PillGroup::active), Some("Townhouse"));
        assert_eq!(f.group("payment").and_then(PillGroup::active), Some("Installments"));
        assert!(!f.select_pill("type", 9));
        assert!(!f.select_pill("nope", 0));
    }

    #[test]
    fn only_images_become_previews() {
        let mut f = form();
        let added = f.add_files(&[
            file("a.png", "image/png", b"hi"),
            file("b.pdf", "application/pdf", b"%PDF"),
            file("c.jpg", "image/jpeg", &[]),
        ]);
        assert_eq!(added, 2);
        assert_eq!(f.previews()[0].data_url, "data:image/png;base64,aGk=");
        assert_eq!(f.previews()[1].data_url, "data:image/jpeg;base64,");

        let id = f.previews()[0].id;
        assert!(f.remove_preview(id));
        assert!(!f.remove_preview(id));
        assert_eq!(f.previews().len(), 1);
    }

    #[test]
    fn submit_timeline() {
        let mut f = form();
        let mut toasts = Toasts::new(3000);
        let mut timers = Timers::new();
        f.select_pill("type", 1);
        f.fields.insert("price".into(), "4.5M".into());
        f.add_files(&[file("a.png", "image/png", b"x")]);

        assert!(f.submit(&mut timers, Millis(0)));
        assert_eq!(f.button_label(), PROCESSING_LABEL);
        assert!(f.button_disabled());
        assert!(!f.submit(&mut timers, Millis(10)));
        assert_eq!(timers.deadline(TimerKey::ListingProcessed), Some(Millis(1500)));

        timers.drain_due(Millis(1500));
        f.on_processed(&mut toasts, &mut timers, Millis(1500));
        assert_eq!(f.button_label(), SUBMIT_LABEL);
        assert_eq!(toasts.get(ToastKind::Success).message, SUCCESS_MESSAGE);
        assert!(f.previews().is_empty() && f.fields.is_empty());
        assert!(f.groups().iter().all(|g| g.active().is_none()));
        assert_eq!(timers.deadline(TimerKey::ListingAdminNotice), Some(Millis(3500)));

        f.on_admin_notice(&mut toasts, &mut timers, Millis(3500));
        assert!(toasts.get(ToastKind::Admin).visible);
        assert_eq!(timers.deadline(TimerKey::AdminToastHide), Some(Millis(6500)));
    }
}
