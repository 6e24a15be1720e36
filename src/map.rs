//! Interactive project map: markers, list cards, region filter chips and
//! the master-plan overlay.
//!
//! The tile renderer itself is an external collaborator. This controller
//! owns what is on the map and emits [`MapCommand`]s for the renderer to
//! replay. Camera moves are fire-and-forget: the viewport is updated to the
//! destination immediately and no completion callback is consumed.

use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::config::MapConfig;
use crate::registry::{Bounds, LatLng, Project, ProjectId, ProjectRegistry, RegionFilter};
use crate::timers::{Millis, TimerKey, Timers};

new_key_type! {
    /// Handle to a rendered marker. Invalidated by the next render.
    pub struct MarkerId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLayer {
    Street,
    Satellite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
}

/// Instruction for the tile renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    FlyTo {
        center: LatLng,
        zoom: f64,
        /// `None` uses the renderer's default duration.
        duration_secs: Option<f64>,
    },
    FlyToBounds {
        bounds: Bounds,
        max_zoom: f64,
        duration_secs: f64,
    },
    SetBaseLayer {
        layer: BaseLayer,
        tiles: String,
    },
    ClearMarkers,
    AddMarker(MarkerId),
    OpenPopup(MarkerId),
    ClosePopup,
    ClearOverlay,
    AddOverlay(MasterPlanOverlay),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipDirection {
    Top,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub permanent: bool,
    pub direction: TooltipDirection,
    pub offset: (i32, i32),
}

/// Popup body: thumbnail, title, and the "view master plan" action.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub thumb_url: String,
    pub title: String,
    pub master_plan_action: ProjectId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub project: ProjectId,
    pub position: LatLng,
    /// Text inside the price pin, e.g. "9.5M".
    pub price_label: String,
    pub tooltip: Tooltip,
    pub popup: Popup,
}

/// Sidebar summary for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub project: ProjectId,
    pub marker: MarkerId,
    pub thumb_url: String,
    pub name: String,
    /// Upper-cased region tag, e.g. "NEW_CAIRO".
    pub region_label: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MasterPlanOverlay {
    pub project: ProjectId,
    pub image_url: String,
    pub bounds: Bounds,
    pub opacity: f64,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MapError {
    #[error("no project with id {0}")]
    UnknownProject(ProjectId),
    #[error("marker is no longer rendered")]
    StaleMarker,
    #[error("no project card at index {0}")]
    NoCard(usize),
}

pub struct MapController {
    registry: Rc<ProjectRegistry>,
    config: MapConfig,
    markers: SlotMap<MarkerId, Marker>,
    cards: Vec<ProjectCard>,
    base_layer: BaseLayer,
    viewport: Viewport,
    overlay: Option<MasterPlanOverlay>,
    open_popup: Option<MarkerId>,
    active_filter: RegionFilter,
    close_button_visible: bool,
    filter_menu_open: bool,
    sidebar_open: bool,
    ui_visible: bool,
    commands: Vec<MapCommand>,
}

impl MapController {
    pub fn new(registry: Rc<ProjectRegistry>, config: MapConfig) -> Self {
        let viewport = Viewport {
            center: config.initial_center,
            zoom: config.initial_zoom,
        };
        Self {
            registry,
            config,
            markers: SlotMap::with_key(),
            cards: Vec::new(),
            base_layer: BaseLayer::Street,
            viewport,
            overlay: None,
            open_popup: None,
            active_filter: RegionFilter::All,
            close_button_visible: false,
            filter_menu_open: false,
            sidebar_open: false,
            ui_visible: false,
            commands: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Rc<ProjectRegistry> {
        &self.registry
    }

    /// Replace every marker and card with one per project, in input order.
    pub fn render_projects(&mut self, projects: &[&Project]) {
        self.markers.clear();
        self.cards.clear();
        self.open_popup = None;
        self.commands.push(MapCommand::ClearMarkers);

        for p in projects {
            let marker = Marker {
                project: p.id,
                position: p.position,
                price_label: p.price.clone(),
                tooltip: Tooltip {
                    text: p.name.clone(),
                    permanent: true,
                    direction: TooltipDirection::Top,
                    offset: (0, -35),
                },
                popup: Popup {
                    thumb_url: p.thumb_url.clone(),
                    title: p.name.clone(),
                    master_plan_action: p.id,
                },
            };
            let id = self.markers.insert(marker);
            self.commands.push(MapCommand::AddMarker(id));
            self.cards.push(ProjectCard {
                project: p.id,
                marker: id,
                thumb_url: p.thumb_url.clone(),
                name: p.name.clone(),
                region_label: p.region.tag().to_uppercase(),
                price: p.price.clone(),
            });
        }
        log::debug!("rendered {} projects", self.cards.len());
    }

    /// Filter chip click: fly to the region preset, highlight the chip,
    /// re-render and close the mobile filter menu.
    pub fn filter_by(&mut self, filter: RegionFilter) {
        let preset = self.config.preset_for(filter);
        self.fly_to(
            preset.center,
            preset.zoom,
            Some(self.config.filter_fly_secs),
        );
        self.active_filter = filter;

        let registry = Rc::clone(&self.registry);
        let filtered = registry.filter_by_region(filter);
        self.render_projects(&filtered);
        self.filter_menu_open = false;
        log::info!("filter {} -> {} projects", filter.tag(), filtered.len());
    }

    pub fn click_marker(&mut self, id: MarkerId) -> Result<(), MapError> {
        let position = self.markers.get(id).ok_or(MapError::StaleMarker)?.position;
        self.fly_to(
            position,
            self.config.project_zoom,
            Some(self.config.marker_fly_secs),
        );
        self.open_popup(id);
        Ok(())
    }

    pub fn click_card(&mut self, index: usize) -> Result<(), MapError> {
        let card = self.cards.get(index).ok_or(MapError::NoCard(index))?;
        let marker_id = card.marker;
        let position = self
            .markers
            .get(marker_id)
            .ok_or(MapError::StaleMarker)?
            .position;
        self.fly_to(position, self.config.project_zoom, None);
        self.open_popup(marker_id);
        Ok(())
    }

    /// Drill into a project: satellite tiles, camera on the bounds, and the
    /// master-plan image clipped to them. Unknown ids change nothing.
    pub fn enter_master_plan(&mut self, id: ProjectId) -> Result<&MasterPlanOverlay, MapError> {
        let registry = Rc::clone(&self.registry);
        let project = registry.get(id).ok_or(MapError::UnknownProject(id))?;

        self.close_popup();
        self.set_base_layer(BaseLayer::Satellite);
        self.viewport = Viewport {
            center: project.bounds.center(),
            zoom: self.config.master_plan_max_zoom,
        };
        self.commands.push(MapCommand::FlyToBounds {
            bounds: project.bounds,
            max_zoom: self.config.master_plan_max_zoom,
            duration_secs: self.config.master_plan_fly_secs,
        });

        self.commands.push(MapCommand::ClearOverlay);
        let overlay = MasterPlanOverlay {
            project: project.id,
            image_url: project.master_plan_url.clone(),
            bounds: project.bounds,
            opacity: self.config.overlay_opacity,
            interactive: true,
        };
        self.commands.push(MapCommand::AddOverlay(overlay.clone()));
        self.close_button_visible = true;
        log::info!("master plan: {} ({})", project.name, project.id);
        Ok(&*self.overlay.insert(overlay))
    }

    /// Leave the master plan: drop the overlay, restore street tiles and the
    /// home view. Safe to call when no plan is open.
    pub fn exit_master_plan(&mut self) {
        self.overlay = None;
        self.commands.push(MapCommand::ClearOverlay);
        self.close_button_visible = false;
        self.set_base_layer(BaseLayer::Street);
        self.fly_to(self.config.default_center, self.config.default_zoom, None);
    }

    /// Schedule the opening fly-in from the world view to the home view.
    pub fn start_intro(&mut self, timers: &mut Timers, now: Millis) {
        timers.schedule(TimerKey::MapIntro, now, self.config.intro_delay_ms);
    }

    pub fn on_intro(&mut self, timers: &mut Timers, now: Millis) {
        self.fly_to(
            self.config.default_center,
            self.config.default_zoom,
            Some(self.config.intro_fly_secs),
        );
        timers.schedule(TimerKey::MapUiReveal, now, self.config.ui_reveal_delay_ms);
    }

    pub fn on_ui_reveal(&mut self) {
        self.ui_visible = true;
    }

    pub fn toggle_filter_menu(&mut self) {
        self.filter_menu_open = !self.filter_menu_open;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_popup(&mut self) {
        if self.open_popup.take().is_some() {
            self.commands.push(MapCommand::ClosePopup);
        }
    }

    fn open_popup(&mut self, id: MarkerId) {
        self.open_popup = Some(id);
        self.commands.push(MapCommand::OpenPopup(id));
    }

    fn fly_to(&mut self, center: LatLng, zoom: f64, duration_secs: Option<f64>) {
        self.viewport = Viewport { center, zoom };
        self.commands.push(MapCommand::FlyTo {
            center,
            zoom,
            duration_secs,
        });
    }

    fn set_base_layer(&mut self, layer: BaseLayer) {
        if self.base_layer == layer {
            return;
        }
        self.base_layer = layer;
        let tiles = match layer {
            BaseLayer::Street => self.config.street_tiles.clone(),
            BaseLayer::Satellite => self.config.satellite_tiles.clone(),
        };
        self.commands.push(MapCommand::SetBaseLayer { layer, tiles });
    }

    /// Commands issued since the last call, oldest first.
    pub fn take_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn cards(&self) -> &[ProjectCard] {
        &self.cards
    }

    pub fn project_count(&self) -> usize {
        self.cards.len()
    }

    pub fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn overlay(&self) -> Option<&MasterPlanOverlay> {
        self.overlay.as_ref()
    }

    pub fn open_popup_marker(&self) -> Option<MarkerId> {
        self.open_popup
    }

    pub fn active_filter(&self) -> RegionFilter {
        self.active_filter
    }

    pub fn close_button_visible(&self) -> bool {
        self.close_button_visible
    }

    pub fn filter_menu_open(&self) -> bool {
        self.filter_menu_open
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn ui_visible(&self) -> bool {
        self.ui_visible
    }
}
