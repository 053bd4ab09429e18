//! Scene-wide switches read from scene metadata.

use super::item::{is_true, keys, Metadata};
use serde::{Deserialize, Serialize};

/// Default overlay color when the scene does not set one.
pub const DEFAULT_FOW_COLOR: &str = "#000000";

/// Toggles that steer a visibility pass.
///
/// A flag is on only when its metadata value is JSON `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub vision_enabled: bool,
    pub autodetect_enabled: bool,
    pub persistence_enabled: bool,
    pub fow_enabled: bool,
    pub fow_color: String,
}

impl SceneSettings {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        let fow_color = metadata
            .get(keys::FOW_COLOR)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_FOW_COLOR)
            .to_string();

        Self {
            vision_enabled: is_true(metadata.get(keys::VISION_ENABLED)),
            autodetect_enabled: is_true(metadata.get(keys::AUTODETECT_ENABLED)),
            persistence_enabled: is_true(metadata.get(keys::PERSISTENCE_ENABLED)),
            fow_enabled: is_true(metadata.get(keys::FOW_ENABLED)),
            fow_color,
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from_metadata(&Metadata::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_off() {
        let s = SceneSettings::default();
        assert!(!s.vision_enabled);
        assert!(!s.fow_enabled);
        assert_eq!(s.fow_color, DEFAULT_FOW_COLOR);
    }

    #[test]
    fn test_only_true_counts() {
        let mut metadata = Metadata::new();
        metadata.insert(keys::VISION_ENABLED.into(), json!(true));
        metadata.insert(keys::FOW_ENABLED.into(), json!("true"));
        metadata.insert(keys::PERSISTENCE_ENABLED.into(), json!(1));
        metadata.insert(keys::FOW_COLOR.into(), json!("#ff0000"));

        let s = SceneSettings::from_metadata(&metadata);
        assert!(s.vision_enabled);
        assert!(!s.fow_enabled);
        assert!(!s.persistence_enabled);
        assert_eq!(s.fow_color, "#ff0000");
    }
}
