//! Scene configuration loaded from YAML
//!
//! Every field has a default so a partial document only overrides what it
//! names:
//!
//! ```yaml
//! ornaments:
//!   count: 300
//! morph:
//!   explode_rate: 3.0
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};
use crate::layout::{GroupKind, TreeLayer, MAX_INSTANCES};

/// Size of one particle group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub count: usize,
    /// Radius of the sphere the group scatters into
    pub scatter_radius: f32,
}

impl GroupConfig {
    pub fn defaults_for(kind: GroupKind) -> Self {
        Self {
            count: kind.default_count(),
            scatter_radius: kind.default_scatter_radius(),
        }
    }
}

/// Damping and floating parameters shared by all groups
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    /// Damping rate while moving toward the scattered layout
    pub explode_rate: f32,
    /// Damping rate while moving back to the tree
    pub assemble_rate: f32,
    /// Vertical float amplitude applied while scattered
    pub float_amplitude: f32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            explode_rate: 2.5,
            assemble_rate: 2.0,
            float_amplitude: 0.05,
        }
    }
}

impl MorphConfig {
    pub fn rate_toward(&self, exploded: bool) -> f32 {
        if exploded {
            self.explode_rate
        } else {
            self.assemble_rate
        }
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layers: Vec<TreeLayer>,
    #[serde(deserialize_with = "group::foliage")]
    pub foliage: GroupConfig,
    #[serde(deserialize_with = "group::ornaments")]
    pub ornaments: GroupConfig,
    #[serde(deserialize_with = "group::lights")]
    pub lights: GroupConfig,
    pub morph: MorphConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layers: TreeLayer::default_stack(),
            foliage: GroupConfig::defaults_for(GroupKind::Foliage),
            ornaments: GroupConfig::defaults_for(GroupKind::Ornament),
            lights: GroupConfig::defaults_for(GroupKind::Light),
            morph: MorphConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserialises to unit, not to an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn group(&self, kind: GroupKind) -> &GroupConfig {
        match kind {
            GroupKind::Foliage => &self.foliage,
            GroupKind::Ornament => &self.ornaments,
            GroupKind::Light => &self.lights,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(TreeError::NoLayers);
        }

        for (index, layer) in self.layers.iter().enumerate() {
            if !layer.is_valid() {
                return Err(TreeError::InvalidLayer {
                    index,
                    height: layer.height,
                    radius: layer.radius,
                });
            }
        }

        for kind in GroupKind::ALL {
            let group = self.group(kind);
            if group.count == 0 {
                return Err(TreeError::EmptyGroup { group: kind.name() });
            }
            if group.count > MAX_INSTANCES {
                return Err(TreeError::TooManyInstances {
                    group: kind.name(),
                    count: group.count,
                    max: MAX_INSTANCES,
                });
            }
            if !(group.scatter_radius.is_finite() && group.scatter_radius > 0.0) {
                return Err(TreeError::InvalidScatterRadius {
                    group: kind.name(),
                    radius: group.scatter_radius,
                });
            }
        }

        check_rate("explode_rate", self.morph.explode_rate)?;
        check_rate("assemble_rate", self.morph.assemble_rate)?;
        check_rate("float_amplitude", self.morph.float_amplitude)?;

        Ok(())
    }
}

fn check_rate(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidRate { name, value })
    }
}

/// Per-group deserialisers, so an omitted field takes that group's own
/// default rather than a shared one.
mod group {
    use serde::{Deserialize, Deserializer};

    use super::GroupConfig;
    use crate::layout::GroupKind;

    #[derive(Deserialize)]
    struct PartialGroup {
        count: Option<usize>,
        scatter_radius: Option<f32>,
    }

    fn with_defaults<'de, D>(deserializer: D, kind: GroupKind) -> Result<GroupConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        let partial = PartialGroup::deserialize(deserializer)?;
        let defaults = GroupConfig::defaults_for(kind);
        Ok(GroupConfig {
            count: partial.count.unwrap_or(defaults.count),
            scatter_radius: partial.scatter_radius.unwrap_or(defaults.scatter_radius),
        })
    }

    pub fn foliage<'de, D: Deserializer<'de>>(d: D) -> Result<GroupConfig, D::Error> {
        with_defaults(d, GroupKind::Foliage)
    }

    pub fn ornaments<'de, D: Deserializer<'de>>(d: D) -> Result<GroupConfig, D::Error> {
        with_defaults(d, GroupKind::Ornament)
    }

    pub fn lights<'de, D: Deserializer<'de>>(d: D) -> Result<GroupConfig, D::Error> {
        with_defaults(d, GroupKind::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
layers:
  - { y: 1.0, height: 2.0, radius: 2.0 }
  - { y: 2.5, height: 1.5, radius: 1.2 }
ornaments:
  count: 300
lights:
  count: 50
  scatter_radius: 9.0
morph:
  explode_rate: 3.0
"#;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layers.len(), 5);
        assert_eq!(config.foliage.count, 1500);
        assert_eq!(config.ornaments.count, 200);
        assert_eq!(config.lights.count, 150);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config = SceneConfig::from_yaml(SAMPLE_YAML).unwrap();
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.ornaments.count, 300);
        // Omitted fields keep the group's own default
        assert_eq!(config.ornaments.scatter_radius, 10.0);
        assert_eq!(config.lights.scatter_radius, 9.0);
        assert_eq!(config.foliage, GroupConfig::defaults_for(GroupKind::Foliage));
        assert_eq!(config.morph.explode_rate, 3.0);
        assert_eq!(config.morph.assemble_rate, 2.0);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(SceneConfig::from_yaml("  \n").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_zero_count_rejected() {
        let result = SceneConfig::from_yaml("foliage: { count: 0 }");
        assert!(matches!(result, Err(TreeError::EmptyGroup { group: "foliage" })));
    }

    #[test]
    fn test_oversized_count_rejected() {
        let result = SceneConfig::from_yaml("ornaments: { count: 18446744073709551615 }");
        assert!(matches!(
            result,
            Err(TreeError::TooManyInstances { group: "ornaments", max: MAX_INSTANCES, .. })
        ));

        let at_limit = format!("lights: {{ count: {} }}", MAX_INSTANCES);
        assert!(SceneConfig::from_yaml(&at_limit).is_ok());
    }

    #[test]
    fn test_empty_layers_rejected() {
        let result = SceneConfig::from_yaml("layers: []");
        assert!(matches!(result, Err(TreeError::NoLayers)));
    }

    #[test]
    fn test_bad_layer_rejected() {
        let result = SceneConfig::from_yaml("layers: [{ y: 1.0, height: 0.0, radius: 1.0 }]");
        assert!(matches!(result, Err(TreeError::InvalidLayer { index: 0, .. })));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = SceneConfig::from_yaml("morph: { assemble_rate: -1.0 }");
        assert!(matches!(
            result,
            Err(TreeError::InvalidRate { name: "assemble_rate", .. })
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = SceneConfig::from_yaml("layers: [oops");
        assert!(matches!(result, Err(TreeError::Yaml(_))));
    }

    #[test]
    fn test_rate_toward() {
        let morph = MorphConfig::default();
        assert_eq!(morph.rate_toward(true), 2.5);
        assert_eq!(morph.rate_toward(false), 2.0);
    }
}
