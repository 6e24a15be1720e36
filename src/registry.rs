use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique project identifier, e.g. 901 for "Celia".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub u32);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of geographic zones used by the map filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Nac,
    NewCairo,
    Zayed,
    NorthCoast,
    Sokhna,
    October,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Nac,
        Region::NewCairo,
        Region::Zayed,
        Region::NorthCoast,
        Region::Sokhna,
        Region::October,
    ];

    /// Tag as written in the data file and on the filter chips.
    pub fn tag(self) -> &'static str {
        match self {
            Region::Nac => "nac",
            Region::NewCairo => "new_cairo",
            Region::Zayed => "zayed",
            Region::NorthCoast => "north_coast",
            Region::Sokhna => "sokhna",
            Region::October => "october",
        }
    }
}

impl FromStr for Region {
    type Err = String;

    /// Case-sensitive: "NAC" is not a region.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.tag() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Filter selection: every project, or one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionFilter {
    All,
    Only(Region),
}

impl RegionFilter {
    pub const ALL_TAG: &'static str = "all";

    /// Parse a chip tag. Unknown tags are `None`, never a silent "all".
    pub fn parse(tag: &str) -> Option<Self> {
        if tag == Self::ALL_TAG {
            return Some(RegionFilter::All);
        }
        tag.parse().ok().map(RegionFilter::Only)
    }

    pub fn tag(self) -> &'static str {
        match self {
            RegionFilter::All => Self::ALL_TAG,
            RegionFilter::Only(r) => r.tag(),
        }
    }

    pub fn matches(self, region: Region) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(r) => r == region,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Two-corner bounding box. Corners are normalized so `south_west` holds the
/// minimum of each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub region: Region,
    /// Display string such as "9.5M". Never parsed as money.
    pub price: String,
    pub position: LatLng,
    pub bounds: Bounds,
    pub thumb_url: String,
    pub master_plan_url: String,
}

/// Why a project record was refused by the registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate project id {0}")]
    DuplicateId(ProjectId),
    #[error("project {0}: position lies outside its bounds")]
    PositionOutsideBounds(ProjectId),
    #[error("project {0}: coordinates are not finite")]
    NonFiniteCoordinate(ProjectId),
}

/// Immutable list of projects, in data-file order.
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    index: HashMap<ProjectId, usize>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a registry, rejecting the whole list on the first bad record.
    pub fn from_projects(projects: Vec<Project>) -> Result<Self, RegistryError> {
        let mut reg = Self::new();
        for p in projects {
            reg.insert(p)?;
        }
        Ok(reg)
    }

    /// Validate and append a record. Only the loader calls this; once the
    /// registry is handed to the map it is never mutated.
    pub(crate) fn insert(&mut self, project: Project) -> Result<(), RegistryError> {
        validate_project(&project)?;
        if self.index.contains_key(&project.id) {
            return Err(RegistryError::DuplicateId(project.id));
        }
        self.index.insert(project.id, self.projects.len());
        self.projects.push(project);
        Ok(())
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.index.get(&id).map(|&i| &self.projects[i])
    }

    pub fn all(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Linear scan; the registry holds tens of records.
    pub fn filter_by_region(&self, filter: RegionFilter) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| filter.matches(p.region))
            .collect()
    }

    /// Tag-based variant of `filter_by_region`. An unknown tag matches nothing.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&Project> {
        match RegionFilter::parse(tag) {
            Some(filter) => self.filter_by_region(filter),
            None => Vec::new(),
        }
    }
}

/// Coordinates must be finite and the position must sit inside the bounds.
pub fn validate_project(p: &Project) -> Result<(), RegistryError> {
    let coords = [
        p.position.lat,
        p.position.lng,
        p.bounds.south_west.lat,
        p.bounds.south_west.lng,
        p.bounds.north_east.lat,
        p.bounds.north_east.lng,
    ];
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(RegistryError::NonFiniteCoordinate(p.id));
    }
    if !p.bounds.contains(p.position) {
        return Err(RegistryError::PositionOutsideBounds(p.id));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_project(id: u32, region: Region, lat: f64, lng: f64) -> Project {
    Project {
        id: ProjectId(id),
        name: format!("Project {id}"),
        region,
        price: "5M".into(),
        position: LatLng::new(lat, lng),
        bounds: Bounds::from_corners(
            LatLng::new(lat - 0.005, lng - 0.005),
            LatLng::new(lat + 0.005, lng + 0.005),
        ),
        thumb_url: format!("https://example.com/{id}.png"),
        master_plan_url: format!("https://example.com/{id}-plan.jpg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_registry() -> ProjectRegistry {
        ProjectRegistry::from_projects(vec![
            sample_project(901, Region::Nac, 29.985, 31.72),
            sample_project(801, Region::NewCairo, 30.023, 31.47),
            sample_project(902, Region::Nac, 30.005, 31.75),
            sample_project(101, Region::NorthCoast, 30.96, 28.9),
        ])
        .unwrap()
    }

    #[test]
    fn test_registry_lookup() {
        let reg = small_registry();
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.get(ProjectId(801)).unwrap().region, Region::NewCairo);
        assert!(reg.get(ProjectId(999)).is_none());
    }

    #[test]
    fn test_filter_all_returns_everything_in_order() {
        let reg = small_registry();
        let ids: Vec<u32> = reg
            .filter_by_region(RegionFilter::All)
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![901, 801, 902, 101]);
    }

    #[test]
    fn test_filter_by_region_exact_match() {
        let reg = small_registry();
        let nac = reg.filter_by_region(RegionFilter::Only(Region::Nac));
        assert_eq!(nac.len(), 2);
        assert!(nac.iter().all(|p| p.region == Region::Nac));
    }

    #[test]
    fn test_filter_by_tag_is_case_sensitive() {
        let reg = small_registry();
        assert_eq!(reg.filter_by_tag("nac").len(), 2);
        assert!(reg.filter_by_tag("NAC").is_empty());
        assert!(reg.filter_by_tag("mars").is_empty());
        assert_eq!(reg.filter_by_tag("all").len(), 4);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ProjectRegistry::from_projects(vec![
            sample_project(1, Region::Zayed, 30.0, 31.0),
            sample_project(1, Region::Zayed, 30.1, 31.1),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId(ProjectId(1)));
    }

    #[test]
    fn test_position_outside_bounds_rejected() {
        let mut p = sample_project(7, Region::Sokhna, 29.62, 32.38);
        p.position = LatLng::new(31.0, 32.38);
        assert_eq!(
            validate_project(&p),
            Err(RegistryError::PositionOutsideBounds(ProjectId(7)))
        );
    }

    #[test]
    fn test_nan_coordinate_rejected() {
        let mut p = sample_project(8, Region::October, 29.96, 30.92);
        p.position.lat = f64::NAN;
        assert_eq!(
            validate_project(&p),
            Err(RegistryError::NonFiniteCoordinate(ProjectId(8)))
        );
    }

    #[test]
    fn test_bounds_normalize_corners() {
        let b = Bounds::from_corners(LatLng::new(30.0, 31.5), LatLng::new(29.0, 31.0));
        assert_eq!(b.south_west, LatLng::new(29.0, 31.0));
        assert_eq!(b.north_east, LatLng::new(30.0, 31.5));
        assert!(b.contains(b.center()));
    }

    #[test]
    fn test_region_tags_round_trip() {
        for r in Region::ALL {
            assert_eq!(r.tag().parse::<Region>(), Ok(r));
        }
        assert_eq!(RegionFilter::parse("all"), Some(RegionFilter::All));
        assert_eq!(RegionFilter::parse("All"), None);
    }
}
