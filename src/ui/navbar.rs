use crate::config::NavbarConfig;

/// Scroll-hide navbar and the mobile menu.
///
/// Scroll events only record the latest offset; the hide/show decision runs
/// once per animation frame. `frame_pending` is set while a frame is
/// requested.
#[derive(Debug)]
pub struct Navbar {
    config: NavbarConfig,
    pub hidden: bool,
    pub mobile_menu_open: bool,
    last_scroll_top: f64,
    latest_scroll_top: f64,
    frame_pending: bool,
}

impl Navbar {
    pub fn new(config: NavbarConfig) -> Self {
        Self {
            config,
            hidden: false,
            mobile_menu_open: false,
            last_scroll_top: 0.0,
            latest_scroll_top: 0.0,
            frame_pending: false,
        }
    }

    /// Record a scroll event. Returns true when the caller must request an
    /// animation frame (none is pending yet).
    pub fn on_scroll(&mut self, scroll_top: f64) -> bool {
        self.latest_scroll_top = scroll_top;
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Animation frame: apply the latest offset. Returns the new hidden
    /// state when it changed.
    pub fn on_frame(&mut self) -> Option<bool> {
        self.frame_pending = false;
        let top = self.latest_scroll_top;
        let hide = top > self.last_scroll_top && top > self.config.hide_after_px;
        self.last_scroll_top = top.max(0.0);
        if hide != self.hidden {
            self.hidden = hide;
            Some(hide)
        } else {
            None
        }
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    /// Project sublinks in the mobile menu show only while it is open.
    pub fn sublinks_visible(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }
}
