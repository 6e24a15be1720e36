use crate::config::SiteConfig;
use crate::registry::{Bounds, LatLng, Project, ProjectId, ProjectRegistry, Region, RegistryError};

/// Why a data file or one of its records could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid KDL: {0}")]
    Kdl(#[from] kdl::KdlError),
    #[error("invalid RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("{record}: missing or malformed `{field}`")]
    MissingField { record: String, field: &'static str },
    #[error("{record}: unknown region {region:?}")]
    UnknownRegion { record: String, region: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn read_file(path: &str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })
}

/// Parse a KDL file and return the document. Logs a warning and returns None on failure.
fn parse_kdl_file(path: &str) -> Option<kdl::KdlDocument> {
    let content = match read_file(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}", e);
            return None;
        }
    };
    match content.parse::<kdl::KdlDocument>() {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("failed to parse KDL {}: {}", path, e);
            None
        }
    }
}

/// Helper to get a string value from a child node's first argument.
fn child_str<'a>(children: &'a kdl::KdlDocument, key: &str) -> Option<&'a str> {
    children.get_arg(key)?.as_string()
}

fn value_f64(val: &kdl::KdlValue) -> Option<f64> {
    val.as_float().or_else(|| val.as_integer().map(|i| i as f64))
}

/// All positional arguments of a child node as numbers. Accepts both float
/// and integer values; `None` if any argument is not a number.
fn child_f64s(children: &kdl::KdlDocument, key: &str) -> Option<Vec<f64>> {
    children
        .get(key)?
        .entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| value_f64(e.value()))
        .collect()
}

fn project_nodes(doc: &kdl::KdlDocument) -> impl Iterator<Item = &kdl::KdlNode> {
    doc.nodes()
        .iter()
        .filter(|n| n.name().to_string() == "project")
}

/// Turn one `project <id> { ... }` node into a record.
pub fn parse_project_node(node: &kdl::KdlNode) -> Result<Project, LoadError> {
    let missing = |record: &str, field| LoadError::MissingField {
        record: record.to_string(),
        field,
    };

    let id = node
        .get(0)
        .and_then(|v| v.as_integer())
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| missing("project", "id"))?;
    let record = format!("project {id}");

    let children = node.children().ok_or_else(|| missing(&record, "name"))?;
    let name = child_str(children, "name").ok_or_else(|| missing(&record, "name"))?;
    let region_tag = child_str(children, "region").ok_or_else(|| missing(&record, "region"))?;
    let region: Region = region_tag
        .parse()
        .map_err(|region| LoadError::UnknownRegion {
            record: record.clone(),
            region,
        })?;
    let price = child_str(children, "price").ok_or_else(|| missing(&record, "price"))?;

    let position = match child_f64s(children, "position").as_deref() {
        Some(&[lat, lng]) => LatLng::new(lat, lng),
        _ => return Err(missing(&record, "position")),
    };
    let bounds = match child_f64s(children, "bounds").as_deref() {
        Some(&[lat1, lng1, lat2, lng2]) => {
            Bounds::from_corners(LatLng::new(lat1, lng1), LatLng::new(lat2, lng2))
        }
        _ => return Err(missing(&record, "bounds")),
    };

    let master_plan_url =
        child_str(children, "master_plan").ok_or_else(|| missing(&record, "master_plan"))?;

    Ok(Project {
        id: ProjectId(id),
        name: name.to_string(),
        region,
        price: price.to_string(),
        position,
        bounds,
        thumb_url: child_str(children, "thumb").unwrap_or_default().to_string(),
        master_plan_url: master_plan_url.to_string(),
    })
}

/// Strict parse: the first bad record fails the whole document.
pub fn parse_projects(content: &str) -> Result<ProjectRegistry, LoadError> {
    let doc: kdl::KdlDocument = content.parse()?;
    let mut registry = ProjectRegistry::new();
    for node in project_nodes(&doc) {
        registry.insert(parse_project_node(node)?)?;
    }
    Ok(registry)
}

/// Startup load: bad records are logged and skipped; an unreadable file
/// yields an empty registry.
pub fn load_projects(path: &str) -> ProjectRegistry {
    let mut registry = ProjectRegistry::new();
    let Some(doc) = parse_kdl_file(path) else {
        return registry;
    };

    for node in project_nodes(&doc) {
        let result = parse_project_node(node)
            .and_then(|p| registry.insert(p).map_err(LoadError::from));
        if let Err(e) = result {
            log::warn!("{}: skipping record: {}", path, e);
        }
    }

    log::info!("loaded {} projects from {}", registry.len(), path);
    registry
}

pub fn parse_site_config(content: &str) -> Result<SiteConfig, LoadError> {
    Ok(ron::from_str(content)?)
}

/// Load site configuration from a RON file, falling back to defaults.
pub fn load_site_config(path: &str) -> SiteConfig {
    let content = match read_file(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}, using default config", e);
            return SiteConfig::default();
        }
    };
    match parse_site_config(&content) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("failed to parse RON {}: {}, using default config", path, e);
            SiteConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegionFilter;

    const TWO: &str = r#"
project 1 {
    name "Alpha"
    region "zayed"
    price "4M"
    position 30.05 30.98
    bounds 30 30.97 30.1 31
    master_plan "https://example.com/a.jpg"
}
project 2 {
    name "Beta"
    region "sokhna"
    price "6.2M"
    position 29.6 32.3
    bounds 29.61 32.31 29.59 32.29
    thumb "https://example.com/b-thumb.jpg"
    master_plan "https://example.com/b.jpg"
}
"#;

    #[test]
    fn parses_records_with_integer_coordinates() {
        let reg = parse_projects(TWO).unwrap();
        assert_eq!(reg.len(), 2);
        let alpha = reg.get(ProjectId(1)).unwrap();
        assert_eq!(alpha.region, Region::Zayed);
        assert_eq!(alpha.bounds.south_west, LatLng::new(30.0, 30.97));
        assert_eq!(alpha.thumb_url, "");
        // Corners given north-east first are normalized.
        let beta = reg.get(ProjectId(2)).unwrap();
        assert_eq!(beta.bounds.south_west, LatLng::new(29.59, 32.29));
    }

    #[test]
    fn unknown_region_is_rejected() {
        let src = TWO.replace("\"zayed\"", "\"Zayed\"");
        match parse_projects(&src) {
            Err(LoadError::UnknownRegion { region, .. }) => assert_eq!(region, "Zayed"),
            other => panic!("expected UnknownRegion, got {other:?}"),
        }
    }

    #[test]
    fn short_position_is_missing_field() {
        let src = TWO.replace("position 30.05 30.98", "position 30.05");
        assert!(matches!(
            parse_projects(&src),
            Err(LoadError::MissingField { field: "position", .. })
        ));
    }

    #[test]
    fn duplicate_id_fails_strict_parse() {
        let src = TWO.replace("project 2", "project 1");
        assert!(matches!(
            parse_projects(&src),
            Err(LoadError::Registry(RegistryError::DuplicateId(ProjectId(1))))
        ));
    }

    #[test]
    fn lenient_load_skips_bad_records() {
        let path = std::env::temp_dir().join(format!(
            "skypioneers-projects-{}.kdl",
            std::process::id()
        ));
        let src = TWO.replace("position 29.6 32.3", "position 10 10");
        std::fs::write(&path, src).unwrap();
        let reg = load_projects(path.to_str().unwrap());
        assert_eq!(reg.len(), 1);
        assert!(reg.get(ProjectId(2)).is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_gives_empty_registry() {
        assert!(load_projects("data/does-not-exist.kdl").is_empty());
        let cfg = load_site_config("data/does-not-exist.ron");
        assert_eq!(cfg.map.project_zoom, 16.0);
    }

    #[test]
    fn bundled_data_loads_every_project() {
        let reg = load_projects("data/projects.kdl");
        assert_eq!(reg.len(), 56);
        assert_eq!(reg.get(ProjectId(901)).map(|p| p.name.as_str()), Some("Celia"));
        let total: usize = Region::ALL
            .iter()
            .map(|r| reg.filter_by_region(RegionFilter::Only(*r)).len())
            .sum();
        assert_eq!(total, reg.len());
    }

    #[test]
    fn bundled_site_config_parses() {
        let content = std::fs::read_to_string("data/site.ron").unwrap();
        let cfg = parse_site_config(&content).unwrap();
        assert_eq!(cfg.carousel.auto_next_ms, 7000);
        assert_eq!(cfg.counters.visibility_threshold, 0.5);
    }
}
