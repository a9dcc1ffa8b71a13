use crate::core::frame::FrameBounds;
use crate::domain::model::{Flavor, Realm};
use crate::utils::error::{LinkError, Result};
use crate::utils::validation::{
    is_namespaced_id, validate_non_negative, validate_ordered, validate_positive, validate_range,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const BACKUP_FRAME_BLOCK: &str = "minecraft:crying_obsidian";
pub const VANILLA_FRAME_BLOCK: &str = "minecraft:obsidian";

/// Immutable configuration snapshot for one engine generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub allow_floating_placement: bool,
    pub allow_forced_placement: bool,
    pub frame_blocks: FrameBlocksConfig,
    pub portal_size: PortalSizeConfig,
    pub placement_offset: PlacementOffsetConfig,
    pub realms: RealmsConfig,
    pub custom: FlavorConfig,
    pub vanilla: FlavorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameBlocksConfig {
    pub custom: String,
    pub vanilla: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: i32,
    pub max: i32,
    pub new: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSizeConfig {
    pub height: SizeBounds,
    pub width: SizeBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementOffsetConfig {
    pub horizontal: i32,
    pub vertical: i32,
}

/// How the arrival Y is chosen when travelling into a realm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrivalHeight {
    /// Map the origin height range linearly onto this realm's usable range.
    Interpolate,
    Fixed(i32),
}

impl Default for ArrivalHeight {
    fn default() -> Self {
        ArrivalHeight::Interpolate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmConfig {
    pub min_height: i32,
    pub max_height: i32,
    /// Structural ceiling below `max_height`, e.g. a bedrock roof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<i32>,
    #[serde(default)]
    pub probe_ceiling: bool,
    #[serde(default)]
    pub arrival: ArrivalHeight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmsConfig {
    pub overworld: RealmConfig,
    pub nether: RealmConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerRealm {
    pub overworld: f64,
    pub nether: f64,
}

impl PerRealm {
    pub fn get(&self, realm: Realm) -> f64 {
        match realm {
            Realm::Overworld => self.overworld,
            Realm::Nether => self.nether,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorConfig {
    /// Blocks of the base grid one cell of each realm spans.
    pub ratio: PerRealm,
    /// Search radius for existing anchors in each destination realm.
    pub min_distance: PerRealm,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_floating_placement: true,
            allow_forced_placement: true,
            frame_blocks: FrameBlocksConfig::default(),
            portal_size: PortalSizeConfig::default(),
            placement_offset: PlacementOffsetConfig::default(),
            realms: RealmsConfig::default(),
            custom: FlavorConfig::default(),
            vanilla: FlavorConfig::default(),
        }
    }
}

impl Default for FrameBlocksConfig {
    fn default() -> Self {
        Self {
            custom: BACKUP_FRAME_BLOCK.to_string(),
            vanilla: VANILLA_FRAME_BLOCK.to_string(),
        }
    }
}

impl Default for PortalSizeConfig {
    fn default() -> Self {
        Self {
            height: SizeBounds {
                min: 3,
                max: 21,
                new: 3,
            },
            width: SizeBounds {
                min: 2,
                max: 21,
                new: 2,
            },
        }
    }
}

impl Default for PlacementOffsetConfig {
    fn default() -> Self {
        Self {
            horizontal: 16,
            vertical: 16,
        }
    }
}

impl Default for RealmsConfig {
    fn default() -> Self {
        Self {
            overworld: RealmConfig {
                min_height: -64,
                max_height: 320,
                ceiling: None,
                probe_ceiling: false,
                arrival: ArrivalHeight::Fixed(64),
            },
            nether: RealmConfig {
                min_height: 0,
                max_height: 256,
                ceiling: Some(127),
                probe_ceiling: false,
                arrival: ArrivalHeight::Interpolate,
            },
        }
    }
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            ratio: PerRealm {
                overworld: 1.0,
                nether: 8.0,
            },
            min_distance: PerRealm {
                overworld: 128.0,
                nether: 16.0,
            },
        }
    }
}

impl RealmConfig {
    /// Highest usable Y: the structural ceiling when there is one.
    pub fn effective_ceiling(&self) -> i32 {
        self.ceiling.unwrap_or(self.max_height)
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LinkError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses `content` on top of [`EngineConfig::default`], so any key or
    /// table left out keeps its default value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        let parse_error = |e: toml::de::Error| LinkError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        };

        let overrides: toml::Table = toml::from_str(&processed_content).map_err(parse_error)?;
        let mut merged = match toml::Value::try_from(Self::default())? {
            toml::Value::Table(table) => table,
            _ => toml::Table::new(),
        };
        merge_tables(&mut merged, overrides);

        let mut config: Self = toml::Value::Table(merged)
            .try_into()
            .map_err(parse_error)?;
        config.normalize_frame_blocks();
        Ok(config)
    }

    /// Replaces a malformed custom frame id with the fallback material.
    fn normalize_frame_blocks(&mut self) {
        let custom = self.custom_frame_block().to_string();
        self.frame_blocks.custom = custom;
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown names are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn realm(&self, realm: Realm) -> &RealmConfig {
        match realm {
            Realm::Overworld => &self.realms.overworld,
            Realm::Nether => &self.realms.nether,
        }
    }

    pub fn realm_mut(&mut self, realm: Realm) -> &mut RealmConfig {
        match realm {
            Realm::Overworld => &mut self.realms.overworld,
            Realm::Nether => &mut self.realms.nether,
        }
    }

    pub fn flavor(&self, flavor: Flavor) -> &FlavorConfig {
        match flavor {
            Flavor::Custom => &self.custom,
            Flavor::Vanilla => &self.vanilla,
        }
    }

    /// Multiplier from `from` coordinates to `to` coordinates.
    pub fn scale_factor(&self, flavor: Flavor, from: Realm, to: Realm) -> f64 {
        let ratio = &self.flavor(flavor).ratio;
        ratio.get(from) / ratio.get(to)
    }

    pub fn min_distance(&self, flavor: Flavor, destination: Realm) -> f64 {
        self.flavor(flavor).min_distance.get(destination)
    }

    pub fn frame_bounds(&self) -> FrameBounds {
        FrameBounds {
            min_height: self.portal_size.height.min,
            max_height: self.portal_size.height.max,
            min_width: self.portal_size.width.min,
            max_width: self.portal_size.width.max,
        }
    }

    /// Material id for custom frames, falling back when the configured one is malformed.
    pub fn custom_frame_block(&self) -> &str {
        if is_namespaced_id(&self.frame_blocks.custom) {
            &self.frame_blocks.custom
        } else {
            tracing::warn!(
                "Unknown block id '{}'. Fixing to default frame block '{}'",
                self.frame_blocks.custom,
                BACKUP_FRAME_BLOCK
            );
            BACKUP_FRAME_BLOCK
        }
    }

    pub fn frame_block(&self, flavor: Flavor) -> &str {
        match flavor {
            Flavor::Custom => self.custom_frame_block(),
            Flavor::Vanilla => &self.frame_blocks.vanilla,
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        for (name, bounds) in [
            ("portal_size.height", &self.portal_size.height),
            ("portal_size.width", &self.portal_size.width),
        ] {
            validate_positive(&format!("{}.min", name), bounds.min)?;
            validate_ordered(&format!("{}.min", name), bounds.min, bounds.max)?;
            validate_range(&format!("{}.new", name), bounds.new, bounds.min, bounds.max)?;
        }

        validate_non_negative("placement_offset.horizontal", self.placement_offset.horizontal)?;
        validate_non_negative("placement_offset.vertical", self.placement_offset.vertical)?;

        for realm in Realm::ALL {
            let config = self.realm(realm);
            let prefix = format!("realms.{}", realm);

            if config.min_height >= config.max_height {
                return Err(LinkError::InvalidConfigValueError {
                    field: format!("{}.min_height", prefix),
                    value: config.min_height.to_string(),
                    reason: format!("Value must be below max_height ({})", config.max_height),
                });
            }

            if let Some(ceiling) = config.ceiling {
                validate_range(
                    &format!("{}.ceiling", prefix),
                    ceiling,
                    config.min_height + 1,
                    config.max_height,
                )?;
            }

            if let ArrivalHeight::Fixed(y) = config.arrival {
                validate_range(
                    &format!("{}.arrival", prefix),
                    y,
                    config.min_height,
                    config.effective_ceiling(),
                )?;
            }
        }

        for flavor in Flavor::ALL {
            let config = self.flavor(flavor);
            for realm in Realm::ALL {
                validate_positive(
                    &format!("{}.ratio.{}", flavor.key(), realm),
                    config.ratio.get(realm),
                )?;
                validate_non_negative(
                    &format!("{}.min_distance.{}", flavor.key(), realm),
                    config.min_distance.get(realm),
                )?;
            }
        }

        if !is_namespaced_id(&self.frame_blocks.vanilla) {
            return Err(LinkError::InvalidConfigValueError {
                field: "frame_blocks.vanilla".to_string(),
                value: self.frame_blocks.vanilla.clone(),
                reason: "Not a namespaced block id".to_string(),
            });
        }

        Ok(())
    }
}

/// Overlays `overlay` onto `base`, descending into tables present in both.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) =
            (base.get_mut(&key), &value)
        {
            merge_tables(existing, incoming.clone());
            continue;
        }
        base.insert(key, value);
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
