use serde::{Deserialize, Serialize};

use crate::registry::{LatLng, RegionFilter};

/// Every tunable the widgets read, loaded from `data/site.ron`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub map: MapConfig,
    pub calculator: CalculatorConfig,
    pub navbar: NavbarConfig,
    pub counters: CounterConfig,
    pub slider: SliderConfig,
    pub gallery: GalleryConfig,
    pub carousel: CarouselConfig,
    pub listing: ListingConfig,
    pub chat: ChatConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub street_tiles: String,
    pub satellite_tiles: String,
    /// Initial camera before the intro fly-in.
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    /// Home view used by the intro and by `exit_master_plan`.
    pub default_center: LatLng,
    pub default_zoom: f64,
    pub project_zoom: f64,
    pub marker_fly_secs: f64,
    pub filter_fly_secs: f64,
    pub master_plan_fly_secs: f64,
    pub master_plan_max_zoom: f64,
    pub overlay_opacity: f64,
    pub intro_delay_ms: u64,
    pub intro_fly_secs: f64,
    pub ui_reveal_delay_ms: u64,
    /// Camera preset per filter chip.
    pub region_presets: Vec<RegionPreset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPreset {
    pub filter: RegionFilter,
    pub center: LatLng,
    pub zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        use crate::registry::Region;
        let preset = |filter, lat, lng, zoom| RegionPreset {
            filter,
            center: LatLng::new(lat, lng),
            zoom,
        };
        Self {
            street_tiles: "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png"
                .into(),
            satellite_tiles: "http://{s}.google.com/vt/lyrs=y&x={x}&y={y}&z={z}".into(),
            initial_center: LatLng::new(15.0, 10.0),
            initial_zoom: 2.5,
            default_center: LatLng::new(28.5, 31.0),
            default_zoom: 6.5,
            project_zoom: 16.0,
            marker_fly_secs: 1.5,
            filter_fly_secs: 2.0,
            master_plan_fly_secs: 1.5,
            master_plan_max_zoom: 18.0,
            overlay_opacity: 0.9,
            intro_delay_ms: 600,
            intro_fly_secs: 4.0,
            ui_reveal_delay_ms: 3500,
            region_presets: vec![
                preset(RegionFilter::All, 28.5, 31.0, 6.5),
                preset(RegionFilter::Only(Region::Nac), 30.0, 31.74, 12.0),
                preset(RegionFilter::Only(Region::NewCairo), 30.03, 31.47, 12.0),
                preset(RegionFilter::Only(Region::Zayed), 30.05, 30.98, 12.0),
                preset(RegionFilter::Only(Region::NorthCoast), 30.95, 28.8, 10.0),
                preset(RegionFilter::Only(Region::Sokhna), 29.65, 32.35, 11.0),
                preset(RegionFilter::Only(Region::October), 29.95, 30.93, 12.0),
            ],
        }
    }
}

impl MapConfig {
    /// Camera preset for a chip; falls back to the home view.
    pub fn preset_for(&self, filter: RegionFilter) -> RegionPreset {
        self.region_presets
            .iter()
            .find(|p| p.filter == filter)
            .copied()
            .unwrap_or(RegionPreset {
                filter,
                center: self.default_center,
                zoom: self.default_zoom,
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Share of monthly income usable for the installment.
    pub affordability_ratio: f64,
    /// Unit suffix on every displayed amount.
    pub currency: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            affordability_ratio: 0.4,
            currency: "EGP".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Scroll offset (px) past which scrolling down hides the navbar.
    pub hide_after_px: f64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            hide_after_px: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CounterStyle {
    /// `target / steps` per animation frame.
    FrameStepped { steps: u32 },
    /// `target / speed` every `interval_ms`.
    Incremental { speed: u32, interval_ms: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub style: CounterStyle,
    /// Animation frame length used to schedule frame-stepped counters.
    pub frame_ms: u64,
    /// Intersection ratio of the stats section that starts the counters.
    pub visibility_threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            style: CounterStyle::FrameStepped { steps: 60 },
            frame_ms: 16,
            visibility_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Widths at or below this show one slide.
    pub mobile_max_width: f64,
    /// Widths at or below this show two slides.
    pub tablet_max_width: f64,
    pub desktop_per_view: usize,
    pub swipe_threshold_px: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: 768.0,
            tablet_max_width: 1024.0,
            desktop_per_view: 3,
            swipe_threshold_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub cell_width: f64,
    pub gap: f64,
    /// The base item list is repeated this many times around the cylinder.
    pub repeat: usize,
    pub active_opacity: f64,
    pub inactive_opacity: f64,
    pub swipe_threshold_px: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            cell_width: 320.0,
            gap: 30.0,
            repeat: 2,
            active_opacity: 1.0,
            inactive_opacity: 0.6,
            swipe_threshold_px: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub transition_ms: u64,
    pub auto_next_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            transition_ms: 500,
            auto_next_ms: 7000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub processing_ms: u64,
    pub admin_notice_ms: u64,
    pub toast_ms: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            processing_ms: 1500,
            admin_notice_ms: 2000,
            toast_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub typing_delay_ms: u64,
    pub focus_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: 1000,
            focus_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// File backing the persisted theme flag (console binary only).
    pub store_path: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            store_path: "data/preferences.ron".into(),
        }
    }
}
