use std::fs;
use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

use crate::interaction::InteractionConfig;
use crate::physics::{ForceSet, SimulationConfig};

/// Layout tunables, read from an optional JSON file. Every field falls back
/// to its default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub simulation: SimulationConfig,
    pub interaction: InteractionConfig,
    /// Replaces the built-in force set when present.
    pub forces: Option<ForceSet>,
    /// Ring radius bills orbit on when bills are shown with the built-in
    /// forces.
    pub bill_ring_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            interaction: InteractionConfig::default(),
            forces: None,
            bill_ring_radius: 160.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let interaction = &self.interaction;
        ensure!(
            interaction.has_valid_zoom_limits(),
            "zoom limits must satisfy 0 < min_zoom <= max_zoom, got {}..{}",
            interaction.min_zoom,
            interaction.max_zoom
        );
        ensure!(
            interaction.zoom_sensitivity.is_finite(),
            "zoom_sensitivity must be finite"
        );
        ensure!(
            self.bill_ring_radius.is_finite() && self.bill_ring_radius >= 0.0,
            "bill_ring_radius must be a non-negative number"
        );
        Ok(())
    }

    pub fn forces_for(&self, include_bills: bool) -> ForceSet {
        match &self.forces {
            Some(forces) => forces.clone(),
            None if include_bills => ForceSet::bill_orbit(self.bill_ring_radius),
            None => ForceSet::default(),
        }
    }
}

pub fn load_layout_config(path: &Path) -> anyhow::Result<LayoutConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout config {}", path.display()))?;
    let config: LayoutConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse layout config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid layout config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::DragMode;
    use crate::physics::{Force, RebindPolicy};

    #[test]
    fn empty_object_is_the_default() {
        let config: LayoutConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn nested_sections_are_partial() {
        let config: LayoutConfig = serde_json::from_str(
            r#"{
                "simulation": {"rebind_policy": "skip_unchanged"},
                "interaction": {"mode": "release"},
                "forces": [
                    {"name": "link", "kind": "link", "distance": 45.0},
                    {"name": "repulsion", "kind": "repulsion", "strength": 60.0}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.simulation.rebind_policy, RebindPolicy::SkipUnchanged);
        assert_eq!(config.interaction.mode, DragMode::Release);
        let forces = config.forces_for(true);
        assert_eq!(forces.len(), 2);
        assert!(matches!(forces.get("link"), Some(Force::Link(link)) if link.distance == 45.0));
        assert!(forces.get("radial").is_none());
    }

    #[test]
    fn inverted_zoom_limits_are_rejected() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"interaction": {"min_zoom": 5.0, "max_zoom": 2.0}}"#).unwrap();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("min_zoom"));
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn bills_get_a_radial_force_by_default() {
        let config = LayoutConfig::default();
        assert!(matches!(config.forces_for(true).get("radial"), Some(Force::Radial(_))));
        assert!(config.forces_for(false).get("radial").is_none());
    }
}
