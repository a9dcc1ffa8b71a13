use crate::domain::model::{Cell, Flavor, Realm};
use crate::domain::ports::PortalRegistry;
use crate::utils::error::{LinkError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Anchors kept in memory, one ordered list per (realm, flavor).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRegistry {
    anchors: BTreeMap<(Realm, Flavor), Vec<Cell>>,
}

/// On-disk layout: `custom.nether = ["1,64,-3", ...]`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RegistryFile {
    custom: RealmAnchors,
    vanilla: RealmAnchors,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RealmAnchors {
    overworld: Vec<String>,
    nether: Vec<String>,
}

impl RegistryFile {
    fn section(&self, realm: Realm, flavor: Flavor) -> &[String] {
        let anchors = match flavor {
            Flavor::Custom => &self.custom,
            Flavor::Vanilla => &self.vanilla,
        };
        match realm {
            Realm::Overworld => &anchors.overworld,
            Realm::Nether => &anchors.nether,
        }
    }

    fn section_mut(&mut self, realm: Realm, flavor: Flavor) -> &mut Vec<String> {
        let anchors = match flavor {
            Flavor::Custom => &mut self.custom,
            Flavor::Vanilla => &mut self.vanilla,
        };
        match realm {
            Realm::Overworld => &mut anchors.overworld,
            Realm::Nether => &mut anchors.nether,
        }
    }
}

/// Parse an `x,y,z` anchor key.
pub fn parse_anchor(text: &str) -> Result<Cell> {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    let re = ANCHOR.get_or_init(|| {
        Regex::new(r"^\s*(-?\d+)\s*,\s*(-?\d+)\s*,\s*(-?\d+)\s*$").expect("anchor pattern is valid")
    });

    let invalid = || LinkError::InvalidCoordinatesError {
        value: text.to_string(),
    };

    let caps = re.captures(text).ok_or_else(invalid)?;
    let component = |index: usize| caps[index].parse::<i32>().map_err(|_| invalid());

    Ok(Cell::new(component(1)?, component(2)?, component(3)?))
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Load anchors, skipping entries that are not valid coordinates.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(content)?;
        let mut registry = Self::new();

        for flavor in Flavor::ALL {
            for realm in Realm::ALL {
                for entry in file.section(realm, flavor) {
                    match parse_anchor(entry) {
                        Ok(anchor) => registry.save(anchor, realm, flavor),
                        Err(e) => tracing::warn!(
                            "Skipping {} anchor in {}: {}",
                            flavor.key(),
                            realm,
                            e
                        ),
                    }
                }
            }
        }

        Ok(registry)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let mut file = RegistryFile::default();
        for ((realm, flavor), anchors) in &self.anchors {
            *file.section_mut(*realm, *flavor) = anchors.iter().map(Cell::to_string).collect();
        }
        Ok(toml::to_string_pretty(&file)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.anchors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PortalRegistry for MemoryRegistry {
    fn anchors(&self, realm: Realm, flavor: Flavor) -> Vec<Cell> {
        self.anchors
            .get(&(realm, flavor))
            .cloned()
            .unwrap_or_default()
    }

    fn save(&mut self, anchor: Cell, realm: Realm, flavor: Flavor) {
        let anchors = self.anchors.entry((realm, flavor)).or_default();
        if !anchors.contains(&anchor) {
            anchors.push(anchor);
        }
    }

    fn delete(&mut self, anchor: Cell, realm: Realm, flavor: Flavor) {
        if let Some(anchors) = self.anchors.get_mut(&(realm, flavor)) {
            anchors.retain(|known| *known != anchor);
        }
    }
}
