use crate::config::SliderConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub img: String,
    pub title: String,
}

impl Slide {
    pub fn new(img: &str, title: &str) -> Self {
        Self {
            img: img.to_string(),
            title: title.to_string(),
        }
    }
}

/// Home page showcase slides.
pub fn default_slides() -> Vec<Slide> {
    const LOBBY: &str = "https://images.unsplash.com/photo-1600210492486-724fe5c67fb0?q=80&w=800&auto=format&fit=crop";
    const AERIAL: &str = "https://images.unsplash.com/photo-1613490493576-7fde63acd811?q=80&w=800&auto=format&fit=crop";
    const WING: &str = "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?q=80&w=800&auto=format&fit=crop";
    vec![
        Slide::new(AERIAL, "Aerial View"),
        Slide::new(LOBBY, "Grand Lobby"),
        Slide::new(AERIAL, "Rear Facade"),
        Slide::new(WING, "Left Wing"),
        Slide::new(AERIAL, "Night Mode"),
        Slide::new(LOBBY, "Main Hall"),
        Slide::new(AERIAL, "Detailing"),
        Slide::new(WING, "Entrance"),
        Slide::new(
            "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?q=80&w=800&auto=format&fit=crop",
            "Living Space",
        ),
        Slide::new(
            "https://images.unsplash.com/photo-1600566753190-17f0baa2a6c3?q=80&w=800&auto=format&fit=crop",
            "Garden",
        ),
    ]
}

/// Flat responsive slider with one dot per slide.
#[derive(Debug)]
pub struct Slider {
    config: SliderConfig,
    slides: Vec<Slide>,
    index: usize,
    per_view: usize,
    touch_start_x: Option<f64>,
}

impl Slider {
    pub fn new(config: SliderConfig, slides: Vec<Slide>, viewport_width: f64) -> Self {
        let per_view = slides_per_view(&config, viewport_width);
        Self {
            config,
            slides,
            index: 0,
            per_view,
            touch_start_x: None,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn per_view(&self) -> usize {
        self.per_view
    }

    /// Step by `direction`, wrapping at both ends.
    pub fn move_by(&mut self, direction: isize) {
        let len = self.slides.len();
        if len == 0 {
            return;
        }
        self.index = (self.index as isize + direction).rem_euclid(len as isize) as usize;
    }

    /// Dot click. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.slides.len() {
            self.index = index;
        }
    }

    /// Track `translateX` in percent (zero or negative).
    pub fn translate_percent(&self) -> f64 {
        -(self.index as f64) * (100.0 / self.per_view as f64)
    }

    pub fn dots(&self) -> Vec<bool> {
        (0..self.slides.len()).map(|i| i == self.index).collect()
    }

    /// Returns true when the layout changed.
    pub fn resize(&mut self, viewport_width: f64) -> bool {
        let per_view = slides_per_view(&self.config, viewport_width);
        if per_view == self.per_view {
            return false;
        }
        self.per_view = per_view;
        self.index = self.index.min(self.slides.len().saturating_sub(1));
        true
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start_x = Some(x);
    }

    /// Swipe left goes forward, swipe right goes back.
    pub fn touch_end(&mut self, x: f64) {
        let Some(start) = self.touch_start_x.take() else {
            return;
        };
        let threshold = self.config.swipe_threshold_px;
        if x < start - threshold {
            self.move_by(1);
        } else if x > start + threshold {
            self.move_by(-1);
        }
    }
}

fn slides_per_view(config: &SliderConfig, width: f64) -> usize {
    if width <= config.mobile_max_width {
        1
    } else if width <= config.tablet_max_width {
        2
    } else {
        config.desktop_per_view.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider(width: f64) -> Slider {
        Slider::new(SliderConfig::default(), default_slides(), width)
    }

    #[test]
    fn breakpoints_pick_slides_per_view() {
        assert_eq!(slider(375.0).per_view(), 1);
        assert_eq!(slider(768.0).per_view(), 1);
        assert_eq!(slider(900.0).per_view(), 2);
        assert_eq!(slider(1440.0).per_view(), 3);
    }

    #[test]
    fn move_wraps_both_ways() {
        let mut s = slider(1440.0);
        s.move_by(-1);
        assert_eq!(s.index(), 9);
        s.move_by(1);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn translate_and_dots_follow_index() {
        let mut s = slider(900.0);
        s.go_to(3);
        assert!((s.translate_percent() + 150.0).abs() < 1e-9);
        let dots = s.dots();
        assert_eq!(dots.len(), 10);
        assert_eq!(dots.iter().position(|d| *d), Some(3));
        s.go_to(42);
        assert_eq!(s.index(), 3);
    }

    #[test]
    fn resize_only_reports_breakpoint_changes() {
        let mut s = slider(1440.0);
        assert!(!s.resize(1300.0));
        assert!(s.resize(500.0));
        assert_eq!(s.per_view(), 1);
    }

    #[test]
    fn swipe_needs_fifty_pixels() {
        let mut s = slider(375.0);
        s.touch_start(200.0);
        s.touch_end(160.0);
        assert_eq!(s.index(), 0);
        s.touch_start(200.0);
        s.touch_end(140.0);
        assert_eq!(s.index(), 1);
        s.touch_start(100.0);
        s.touch_end(200.0);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn empty_slider_ignores_moves() {
        let mut s = Slider::new(SliderConfig::default(), Vec::new(), 1440.0);
        s.move_by(1);
        s.resize(300.0);
        assert_eq!(s.index(), 0);
        assert!(s.dots().is_empty());
    }
}
