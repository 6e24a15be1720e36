use crate::config::GalleryConfig;
use crate::ui::slider::Slide;

/// Placement of one card on the cylinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub rotate_y_deg: f64,
    pub translate_z: f64,
    pub opacity: f64,
    pub active: bool,
}

/// 3D cylinder gallery. The base items are repeated around the cylinder
/// so it stays full with few images.
#[derive(Debug)]
pub struct CylinderGallery {
    config: GalleryConfig,
    cells: Vec<Slide>,
    radius: f64,
    theta: f64,
    /// Unbounded rotation step; the active cell is this modulo the count.
    selected: isize,
    touch_start_x: Option<f64>,
}

impl CylinderGallery {
    pub fn new(config: GalleryConfig, base: &[Slide]) -> Self {
        let cells: Vec<Slide> = (0..config.repeat.max(1))
            .flat_map(|_| base.iter().cloned())
            .collect();
        let n = cells.len();
        let theta = if n == 0 { 0.0 } else { 360.0 / n as f64 };
        let radius = if n < 3 {
            0.0
        } else {
            ((config.cell_width + config.gap) / (2.0 * (std::f64::consts::PI / n as f64).tan()))
                .round()
        };
        Self {
            config,
            cells,
            radius,
            theta,
            selected: 0,
            touch_start_x: None,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Slide] {
        &self.cells
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn selected(&self) -> isize {
        self.selected
    }

    pub fn active_index(&self) -> usize {
        let n = self.cells.len() as isize;
        if n == 0 {
            0
        } else {
            self.selected.rem_euclid(n) as usize
        }
    }

    pub fn rotate(&mut self, direction: isize) {
        self.selected += direction;
    }

    /// Rotate so `index` faces front, going the short way round.
    pub fn click_card(&mut self, index: usize) {
        let n = self.cells.len() as isize;
        if index as isize >= n {
            return;
        }
        let mut diff = index as isize - self.active_index() as isize;
        if diff > n / 2 {
            diff -= n;
        } else if diff < -(n / 2) {
            diff += n;
        }
        self.selected += diff;
    }

    /// Track transform: `translateZ(-radius) rotateY(angle)`.
    pub fn track_transform(&self) -> (f64, f64) {
        (-self.radius, -self.theta * self.selected as f64)
    }

    pub fn card_transforms(&self) -> Vec<CardTransform> {
        let active = self.active_index();
        (0..self.cells.len())
            .map(|i| {
                let is_active = i == active;
                CardTransform {
                    rotate_y_deg: self.theta * i as f64,
                    translate_z: self.radius,
                    opacity: if is_active {
                        self.config.active_opacity
                    } else {
                        self.config.inactive_opacity
                    },
                    active: is_active,
                }
            })
            .collect()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.touch_start_x = Some(x);
    }

    pub fn touch_end(&mut self, x: f64) {
        let Some(start) = self.touch_start_x.take() else {
            return;
        };
        let threshold = self.config.swipe_threshold_px;
        if x < start - threshold {
            self.rotate(1);
        } else if x > start + threshold {
            self.rotate(-1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::slider::default_slides;

    fn gallery(base: usize) -> CylinderGallery {
        let slides: Vec<Slide> = default_slides().into_iter().take(base).collect();
        CylinderGallery::new(GalleryConfig::default(), &slides)
    }

    #[test]
    fn geometry_for_twelve_cells() {
        let g = gallery(6);
        assert_eq!(g.cell_count(), 12);
        assert!((g.theta() - 30.0).abs() < 1e-9);
        // 350 / (2 * tan(15deg)) = 653.1
        assert_eq!(g.radius(), 653.0);
    }

    #[test]
    fn active_index_wraps_negative_rotation() {
        let mut g = gallery(5);
        g.rotate(-1);
        assert_eq!(g.active_index(), 9);
        let cards = g.card_transforms();
        assert!(cards[9].active);
        assert_eq!(cards[9].opacity, 1.0);
        assert_eq!(cards[0].opacity, 0.6);
        let (z, angle) = g.track_transform();
        assert_eq!(z, -g.radius());
        assert!((angle - 36.0).abs() < 1e-9);
    }

    #[test]
    fn click_takes_shortest_path() {
        let mut g = gallery(5);
        g.click_card(9);
        assert_eq!(g.selected(), -1);
        g.click_card(2);
        assert_eq!(g.selected(), 2);
        g.click_card(99);
        assert_eq!(g.selected(), 2);
    }

    #[test]
    fn swipe_rotates_one_step() {
        let mut g = gallery(5);
        g.touch_start(300.0);
        g.touch_end(200.0);
        assert_eq!(g.selected(), 1);
        g.touch_start(100.0);
        g.touch_end(130.0);
        assert_eq!(g.selected(), 1);
    }

    #[test]
    fn tiny_gallery_has_flat_radius() {
        let g = gallery(1);
        assert_eq!(g.cell_count(), 2);
        assert_eq!(g.radius(), 0.0);
        assert_eq!(gallery(0).active_index(), 0);
    }
}
