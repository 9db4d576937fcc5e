use serde::{Deserialize, Serialize};

/// Whether binding a graph identical to the one already bound reheats the
/// layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebindPolicy {
    #[default]
    Always,
    SkipUnchanged,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// The layout counts as settled once alpha falls below this.
    pub alpha_min: f32,
    /// Fraction of the distance to the alpha target covered each step.
    pub alpha_decay: f32,
    /// Velocity multiplier applied every step.
    pub velocity_damping: f32,
    pub bind_alpha: f32,
    pub reheat_alpha: f32,
    /// Radius of the jitter around the center where new nodes appear.
    pub initial_spread: f32,
    pub rebind_policy: RebindPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_min: 0.001,
            // (1 - 0.0228)^300 < 0.001: a cold start settles within 300 steps.
            alpha_decay: 0.0228,
            velocity_damping: 0.6,
            bind_alpha: 1.0,
            reheat_alpha: 0.3,
            initial_spread: 30.0,
            rebind_policy: RebindPolicy::Always,
        }
    }
}
