//! Application state shared between the control panel and the scene
//!
//! The state is a plain value. UI actions produce a [`StateUpdate`] which is
//! merged into the current state by [`AppState::reduce`], yielding a new
//! state; nothing mutates the state in place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Ornament colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Gold,
    Silver,
    Ruby,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 3] = [ThemeColor::Gold, ThemeColor::Silver, ThemeColor::Ruby];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeColor::Gold => "gold",
            ThemeColor::Silver => "silver",
            ThemeColor::Ruby => "ruby",
        }
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeColor {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(ThemeColor::Gold),
            "silver" => Ok(ThemeColor::Silver),
            "ruby" => Ok(ThemeColor::Ruby),
            _ => Err(TreeError::UnknownTheme(s.to_string())),
        }
    }
}

/// Everything the control panel can change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub lights_on: bool,
    /// Auto-rotation speed, never negative
    pub rotation_speed: f32,
    /// Bloom strength used while the lights are on, never negative
    pub bloom_intensity: f32,
    pub theme_color: ThemeColor,
    pub is_exploded: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            lights_on: true,
            rotation_speed: 0.3,
            bloom_intensity: 1.5,
            theme_color: ThemeColor::Gold,
            is_exploded: false,
        }
    }
}

/// A partial state: only the fields that are `Some` are overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateUpdate {
    pub lights_on: Option<bool>,
    pub rotation_speed: Option<f32>,
    pub bloom_intensity: Option<f32>,
    pub theme_color: Option<ThemeColor>,
    pub is_exploded: Option<bool>,
}

impl StateUpdate {
    /// Parse a patch such as `{ is_exploded: true }`.
    ///
    /// YAML flow maps are a superset of JSON objects, so the JavaScript side
    /// can pass either.
    pub fn from_yaml(patch: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(patch)?)
    }

    pub fn lights_on(value: bool) -> Self {
        Self { lights_on: Some(value), ..Default::default() }
    }

    pub fn rotation_speed(value: f32) -> Self {
        Self { rotation_speed: Some(value), ..Default::default() }
    }

    pub fn bloom_intensity(value: f32) -> Self {
        Self { bloom_intensity: Some(value), ..Default::default() }
    }

    pub fn theme_color(value: ThemeColor) -> Self {
        Self { theme_color: Some(value), ..Default::default() }
    }

    pub fn exploded(value: bool) -> Self {
        Self { is_exploded: Some(value), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AppState {
    /// Merge a partial update into this state.
    ///
    /// Non-finite numbers are ignored and negative ones clamp to zero, so the
    /// result always satisfies the field constraints.
    pub fn reduce(self, update: StateUpdate) -> Self {
        Self {
            lights_on: update.lights_on.unwrap_or(self.lights_on),
            rotation_speed: merge_non_negative(self.rotation_speed, update.rotation_speed),
            bloom_intensity: merge_non_negative(self.bloom_intensity, update.bloom_intensity),
            theme_color: update.theme_color.unwrap_or(self.theme_color),
            is_exploded: update.is_exploded.unwrap_or(self.is_exploded),
        }
    }

    /// Morph target: 1.0 when scattered, 0.0 when assembled
    pub fn morph_target(&self) -> f32 {
        if self.is_exploded {
            1.0
        } else {
            0.0
        }
    }

    /// Bloom actually applied by the post-processing pass
    pub fn effective_bloom(&self) -> f32 {
        if self.lights_on {
            self.bloom_intensity
        } else {
            0.5
        }
    }
}

fn merge_non_negative(current: f32, update: Option<f32>) -> f32 {
    match update {
        Some(v) if v.is_finite() => v.max(0.0),
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert!(state.lights_on);
        assert_eq!(state.rotation_speed, 0.3);
        assert_eq!(state.bloom_intensity, 1.5);
        assert_eq!(state.theme_color, ThemeColor::Gold);
        assert!(!state.is_exploded);
    }

    #[test]
    fn test_reduce_overwrites_only_given_fields() {
        let state = AppState::default();
        let next = state.reduce(StateUpdate::exploded(true));

        assert!(next.is_exploded);
        assert_eq!(next.lights_on, state.lights_on);
        assert_eq!(next.rotation_speed, state.rotation_speed);
        assert_eq!(next.theme_color, state.theme_color);
        // The original value is untouched
        assert!(!state.is_exploded);
    }

    #[test]
    fn test_empty_update_is_identity() {
        let state = AppState::default().reduce(StateUpdate::theme_color(ThemeColor::Ruby));
        assert!(StateUpdate::default().is_empty());
        assert_eq!(state.reduce(StateUpdate::default()), state);
    }

    #[test]
    fn test_reduce_clamps_numbers() {
        let state = AppState::default();
        assert_eq!(state.reduce(StateUpdate::rotation_speed(-1.0)).rotation_speed, 0.0);
        assert_eq!(state.reduce(StateUpdate::bloom_intensity(f32::NAN)).bloom_intensity, 1.5);
        assert_eq!(state.reduce(StateUpdate::rotation_speed(f32::INFINITY)).rotation_speed, 0.3);
    }

    #[test]
    fn test_morph_target() {
        let state = AppState::default();
        assert_eq!(state.morph_target(), 0.0);
        assert_eq!(state.reduce(StateUpdate::exploded(true)).morph_target(), 1.0);
    }

    #[test]
    fn test_effective_bloom_dims_without_lights() {
        let state = AppState::default().reduce(StateUpdate::bloom_intensity(2.0));
        assert_eq!(state.effective_bloom(), 2.0);
        assert_eq!(state.reduce(StateUpdate::lights_on(false)).effective_bloom(), 0.5);
    }

    #[test]
    fn test_patch_from_yaml_and_json() {
        let patch = StateUpdate::from_yaml("{ is_exploded: true, theme_color: ruby }").unwrap();
        assert_eq!(patch.is_exploded, Some(true));
        assert_eq!(patch.theme_color, Some(ThemeColor::Ruby));
        assert_eq!(patch.lights_on, None);

        let patch = StateUpdate::from_yaml(r#"{"rotation_speed": 1.2}"#).unwrap();
        assert_eq!(patch.rotation_speed, Some(1.2));
    }

    #[test]
    fn test_bad_patch() {
        assert!(StateUpdate::from_yaml("{ theme_color: emerald }").is_err());
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Silver".parse::<ThemeColor>().unwrap(), ThemeColor::Silver);
        assert!(matches!(
            "emerald".parse::<ThemeColor>(),
            Err(TreeError::UnknownTheme(_))
        ));
        for theme in ThemeColor::ALL {
            assert_eq!(theme.as_str().parse::<ThemeColor>().unwrap(), theme);
        }
    }
}
